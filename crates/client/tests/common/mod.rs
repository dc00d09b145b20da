#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use jamii_client::{
    AppContext, ClientConfig, ExecutorConfig, SignAndExecuteInput, SubmittedTransaction,
    TransactionBlock, Wallet, WalletAccount, WalletError,
};
use jamii_rpc::{
    mock::{move_object, MockReader},
    TransactionBlockResponse,
};
use jamii_types::{Address, ContractConfig, ObjectId};
use serde_json::{json, Value};

/// The message a wallet returns when the user declines to sign.
pub const USER_REJECTION: &str = "Rejected from user";

/// A wallet that records what it is asked to sign and answers from a script.
///
/// With nothing scripted it rejects, as a user closing the prompt would.
#[derive(Debug, Default)]
pub struct MockWallet {
    responses: Mutex<Vec<Result<String, String>>>,
    signed: Mutex<Vec<(TransactionBlock, String)>>,
}

impl MockWallet {
    /// Queue a successful submission returning `digest`.
    pub fn approve(&self, digest: &str) {
        self.responses.lock().unwrap().push(Ok(digest.to_string()));
    }

    /// Queue a rejection with `message`.
    pub fn reject(&self, message: &str) {
        self.responses.lock().unwrap().push(Err(message.to_string()));
    }

    /// The blocks signed so far, with the chain they were submitted to.
    pub fn signed(&self) -> Vec<(TransactionBlock, String)> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn sign_and_execute(
        &self,
        input: SignAndExecuteInput<'_>,
    ) -> Result<SubmittedTransaction, WalletError> {
        self.signed
            .lock()
            .unwrap()
            .push((input.transaction_block.clone(), input.chain.to_string()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(WalletError::Rejected(USER_REJECTION.to_string()));
        }
        match responses.remove(0) {
            Ok(digest) => Ok(SubmittedTransaction { digest }),
            Err(message) => Err(WalletError::Rejected(message)),
        }
    }
}

/// Test environment: a context wired to an in-memory wallet and reader.
pub struct TestContext {
    /// The context under test.
    pub ctx: AppContext<MockWallet, MockReader>,
    /// The wallet behind the context.
    pub wallet: Arc<MockWallet>,
    /// The reader behind the context.
    pub reader: Arc<MockReader>,
    /// The contract the context targets.
    pub contract: ContractConfig,
    /// The account used by [`TestContext::connect`].
    pub account: WalletAccount,
}

impl TestContext {
    /// Connect [`TestContext::account`].
    pub fn connect(&self) {
        self.ctx.session.connect(self.account.clone());
    }

    /// Make the wallet approve `digest` and the node confirm it after `pending_polls` misses.
    pub fn script_success(&self, digest: &str, pending_polls: u32) {
        self.wallet.approve(digest);
        self.reader.insert_transaction(confirmed(digest), pending_polls);
    }

    /// Give the account a SUI coin.
    pub fn fund(&self, coin: &str, balance: u64) {
        self.reader.insert_coin(self.account.address, coin, balance);
    }

    /// Publish a group under the registry.
    pub fn publish_group(&self, id: &str, name: &str, description: &str, category: &str) {
        let struct_type = self.contract.struct_type("Group");
        let fields = group_fields(name, description, category, &self.account.address, &[]);
        self.reader.insert_object(
            self.contract.registry_id,
            &struct_type,
            move_object(id, &struct_type, fields),
        );
    }

    /// Publish a group under the registry listing `members`.
    pub fn publish_group_with_members(
        &self,
        id: &str,
        name: &str,
        creator: &Address,
        members: &[Address],
    ) {
        let struct_type = self.contract.struct_type("Group");
        let fields = group_fields(name, "a savings circle", "community", creator, members);
        self.reader.insert_object(
            self.contract.registry_id,
            &struct_type,
            move_object(id, &struct_type, fields),
        );
    }

    /// Give the account a loan.
    pub fn grant_loan(&self, id: &str, group_id: &str, amount: u64, status: &str) {
        let struct_type = self.contract.struct_type("Loan");
        let fields = json!({
            "group_id": group_id,
            "borrower": self.account.address,
            "amount": amount.to_string(),
            "purpose": "stock",
            "status": status,
            "created_at": "1700000000000",
            "due_date": null
        });
        let object = move_object(id, &struct_type, fields);
        self.reader.insert_object(self.account.address, &struct_type, object);
    }

    /// Give the account a contribution receipt.
    pub fn record_contribution(&self, id: &str, group_id: &str, amount: u64) {
        let struct_type = self.contract.struct_type("Contribution");
        let fields = json!({
            "group_id": group_id,
            "contributor": self.account.address,
            "amount": amount.to_string(),
            "timestamp": "1700000000000"
        });
        let object = move_object(id, &struct_type, fields);
        self.reader.insert_object(self.account.address, &struct_type, object);
    }

    /// Publish a proposal under the registry.
    pub fn publish_proposal(&self, id: &str, group_id: &str, votes_for: u64, votes_against: u64) {
        let struct_type = self.contract.struct_type("Proposal");
        let fields = json!({
            "group_id": group_id,
            "proposer": self.account.address,
            "proposal_type": "rule_change",
            "description": "raise the loan ratio",
            "votes_for": votes_for.to_string(),
            "votes_against": votes_against.to_string(),
            "status": "active",
            "deadline": "1800000000000"
        });
        self.reader.insert_object(
            self.contract.registry_id,
            &struct_type,
            move_object(id, &struct_type, fields),
        );
    }
}

/// Settings with short confirmation polling.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        executor: ExecutorConfig {
            confirmation_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(2),
            ..ExecutorConfig::default()
        },
        refresh_delay: Duration::from_secs(2),
        ..ClientConfig::default()
    }
}

/// Creates the test environment with no connected account.
pub fn setup() -> TestContext {
    setup_with(MockReader::default(), test_config())
}

/// Creates the test environment over `reader` and `config`.
pub fn setup_with(reader: MockReader, config: ClientConfig) -> TestContext {
    let wallet = Arc::new(MockWallet::default());
    let reader = Arc::new(reader);
    let contract = config.contract.clone();
    let ctx = AppContext::new(wallet.clone(), reader.clone(), config);
    TestContext { ctx, wallet, reader, contract, account: WalletAccount::new(address(0xa1)) }
}

/// An address ending in `n`.
pub fn address(n: u8) -> Address {
    let mut bytes = [0u8; 32];
    bytes[31] = n;
    Address::new(bytes)
}

/// Parses an object id.
pub fn object_id(s: &str) -> ObjectId {
    s.parse().unwrap()
}

/// A confirmed transaction block with successful effects.
pub fn confirmed(digest: &str) -> TransactionBlockResponse {
    TransactionBlockResponse {
        digest: digest.to_string(),
        effects: Some(json!({ "status": { "status": "success" } })),
        events: Some(vec![json!({ "type": "GroupJoined" })]),
        object_changes: Some(vec![]),
    }
}

/// A transaction block whose execution aborted.
pub fn aborted(digest: &str, error: &str) -> TransactionBlockResponse {
    TransactionBlockResponse {
        digest: digest.to_string(),
        effects: Some(json!({ "status": { "status": "failure", "error": error } })),
        events: None,
        object_changes: None,
    }
}

fn group_fields(
    name: &str,
    description: &str,
    category: &str,
    creator: &Address,
    members: &[Address],
) -> Value {
    json!({
        "name": name,
        "description": description,
        "creator": creator,
        "member_count": members.len().max(1).to_string(),
        "max_members": "20",
        "total_balance": "5000000000",
        "min_contribution": "100000000000",
        "loan_ratio": "50",
        "kyc_required": true,
        "is_active": true,
        "created_at": "1700000000000",
        "category": category,
        "location": "Nairobi",
        "members": members
    })
}
