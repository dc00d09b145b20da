//! Contact verification and the KYC badge.
//!
//! A six-digit code is sent to the user's phone or email through a [`CodeSender`]. Only a SHA-256
//! digest of the code is kept, so the code itself is never readable from client state. A matching
//! code entered before expiry issues a badge; a session can be verified exactly once.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use jamii_types::UnknownVariant;
use jamii_utils::{MINUTE_MS, YEAR_MS};
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

/// How long a sent code stays valid, in milliseconds.
pub const CODE_TTL_MS: u64 = 5 * MINUTE_MS;

/// How long an issued badge stays valid, in milliseconds.
pub const BADGE_TTL_MS: u64 = YEAR_MS;

/// The reputation a freshly verified account starts with.
pub const INITIAL_REPUTATION: u32 = 100;

/// The channel a code is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    /// SMS to a phone number.
    Phone,
    /// Email.
    Email,
}

impl ContactType {
    /// All contact types, in the order of their numeric codes (`1`, `2`).
    pub const ALL: [Self; 2] = [Self::Phone, Self::Email];

    /// The numeric code of the contact type.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Phone => 1,
            Self::Email => 2,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone Number",
            Self::Email => "Email Address",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl FromStr for ContactType {
    type Err = UnknownVariant;

    /// Accepts the numeric code (`1`, `2`) or the name (`phone`, `email`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s) || kind.code().to_string() == s)
            .ok_or_else(|| UnknownVariant::new("contact type", s))
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors of the verification flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum KycError {
    #[error("contact is required")]
    MissingContact,
    #[error("contact type is required")]
    MissingContactType,
    #[error("no verification is pending")]
    NoPendingVerification,
    #[error("verification code expired")]
    CodeExpired,
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("account is already verified")]
    AlreadyVerified,
    #[error("failed to deliver verification code: {0}")]
    Delivery(String),
}

/// Delivers verification codes.
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Sends `code` to `contact`.
    async fn send(&self, contact: &str, contact_type: ContactType, code: &str)
        -> Result<(), KycError>;
}

/// A code that was sent and awaits confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    /// Where the code was sent.
    pub contact: String,
    /// How the code was sent.
    pub contact_type: ContactType,
    /// When the code stops being accepted, in milliseconds.
    pub expires_at: u64,
    code_digest: [u8; 32],
}

impl PendingVerification {
    fn matches(&self, code: &str) -> bool {
        digest(code.trim()) == self.code_digest
    }
}

/// Proof of a verified contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycBadge {
    /// Badge identifier.
    pub id: String,
    /// The verified contact.
    pub contact: String,
    /// How the contact was verified.
    pub contact_type: ContactType,
    /// Issue time, in milliseconds.
    pub issued_at: u64,
    /// Expiry time, in milliseconds.
    pub expires_at: u64,
}

/// A verified account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycStatus {
    /// The issued badge.
    pub badge: KycBadge,
    /// Reputation score, 0 to 100.
    pub reputation: u32,
    /// Whether the account was flagged.
    pub is_flagged: bool,
}

/// Where the flow stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum VerificationState {
    #[default]
    Unverified,
    Pending(PendingVerification),
    Verified(KycStatus),
}

/// Drives one account through verification.
#[derive(Debug)]
pub struct VerificationFlow<S> {
    sender: S,
    state: VerificationState,
}

impl<S: CodeSender> VerificationFlow<S> {
    /// Create a new [`VerificationFlow`] delivering codes through `sender`.
    pub fn new(sender: S) -> Self {
        Self { sender, state: VerificationState::Unverified }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// The verification result, once verified.
    #[must_use]
    pub fn status(&self) -> Option<&KycStatus> {
        match &self.state {
            VerificationState::Verified(status) => Some(status),
            _ => None,
        }
    }

    /// Sends a fresh code to `contact`, replacing any pending one.
    pub async fn request_verification(
        &mut self,
        contact: &str,
        contact_type: ContactType,
        now: u64,
    ) -> Result<(), KycError> {
        if matches!(self.state, VerificationState::Verified(_)) {
            return Err(KycError::AlreadyVerified);
        }
        let contact = contact.trim();
        if contact.is_empty() {
            return Err(KycError::MissingContact);
        }

        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
        self.sender.send(contact, contact_type, &code).await?;
        info!(%contact_type, "verification code sent");

        self.state = VerificationState::Pending(PendingVerification {
            contact: contact.to_string(),
            contact_type,
            expires_at: now + CODE_TTL_MS,
            code_digest: digest(&code),
        });
        Ok(())
    }

    /// Checks `code` against the pending verification and issues the badge on a match.
    ///
    /// A wrong or expired code leaves the state unchanged.
    pub fn verify_code(&mut self, code: &str, now: u64) -> Result<&KycStatus, KycError> {
        let pending = match &self.state {
            VerificationState::Unverified => return Err(KycError::NoPendingVerification),
            VerificationState::Verified(_) => return Err(KycError::AlreadyVerified),
            VerificationState::Pending(pending) => pending,
        };
        if now >= pending.expires_at {
            return Err(KycError::CodeExpired);
        }
        if !pending.matches(code) {
            warn!("verification code mismatch");
            return Err(KycError::InvalidCode);
        }

        let badge = KycBadge {
            id: badge_id(&pending.contact, now),
            contact: pending.contact.clone(),
            contact_type: pending.contact_type,
            issued_at: now,
            expires_at: now + BADGE_TTL_MS,
        };
        info!(badge = %badge.id, "kyc badge issued");
        self.state = VerificationState::Verified(KycStatus {
            badge,
            reputation: INITIAL_REPUTATION,
            is_flagged: false,
        });
        self.status().ok_or(KycError::NoPendingVerification)
    }
}

/// The label shown for a reputation score.
#[must_use]
pub fn reputation_label(score: u32) -> &'static str {
    match score {
        80.. => "Excellent",
        60..=79 => "Good",
        40..=59 => "Fair",
        _ => "Poor",
    }
}

fn digest(code: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(code.as_bytes()));
    out
}

fn badge_id(contact: &str, issued_at: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contact.as_bytes());
    hasher.update(issued_at.to_be_bytes());
    format!("badge_{}", hex::encode(&hasher.finalize()[..8]))
}
