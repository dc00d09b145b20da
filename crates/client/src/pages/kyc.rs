use crate::kyc::{
    reputation_label, CodeSender, ContactType, KycError, KycStatus, VerificationFlow,
    VerificationState,
};

/// The steps of the KYC page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KycStep {
    /// Enter a contact.
    RequestCode,
    /// Enter the received code.
    EnterCode,
    /// The badge was issued.
    Verified,
}

/// Contact verification and the reputation overview.
#[derive(Debug)]
pub struct KycPage<S> {
    /// The phone number or email address as entered.
    pub contact: String,
    /// The selected contact type.
    pub contact_type: Option<ContactType>,
    /// The code as entered.
    pub code: String,
    flow: VerificationFlow<S>,
    error: Option<String>,
}

impl<S: CodeSender> KycPage<S> {
    /// Create a new [`KycPage`] delivering codes through `sender`.
    pub fn new(sender: S) -> Self {
        Self {
            contact: String::new(),
            contact_type: None,
            code: String::new(),
            flow: VerificationFlow::new(sender),
            error: None,
        }
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> KycStep {
        match self.flow.state() {
            VerificationState::Unverified => KycStep::RequestCode,
            VerificationState::Pending(_) => KycStep::EnterCode,
            VerificationState::Verified(_) => KycStep::Verified,
        }
    }

    /// The notice of the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The verification result.
    #[must_use]
    pub fn status(&self) -> Option<&KycStatus> {
        self.flow.status()
    }

    /// The reputation score and its label; zero and `Poor` until verified.
    #[must_use]
    pub fn reputation(&self) -> (u32, &'static str) {
        let score = self.flow.status().map_or(0, |status| status.reputation);
        (score, reputation_label(score))
    }

    /// Sends a code to the entered contact.
    pub async fn request_code(&mut self, now: u64) -> Result<(), KycError> {
        let Some(contact_type) = self.contact_type else {
            return Err(self.fail(KycError::MissingContactType));
        };
        let result = self.flow.request_verification(&self.contact, contact_type, now).await;
        self.settle(result)
    }

    /// Checks the entered code.
    pub fn verify(&mut self, now: u64) -> Result<(), KycError> {
        let result = self.flow.verify_code(&self.code, now).map(|_| ());
        if result.is_ok() {
            self.code.clear();
        }
        self.settle(result)
    }

    fn settle(&mut self, result: Result<(), KycError>) -> Result<(), KycError> {
        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: KycError) -> KycError {
        self.error = Some(error.to_string());
        error
    }
}
