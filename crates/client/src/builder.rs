use jamii_types::{Address, ContractConfig, ObjectId};
use serde::{Serialize, Serializer};

/// A pure (non-object) input value.
///
/// `U64` values are written as decimal strings, as Sui JSON does for 64-bit integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum PureValue {
    Bool(bool),
    U64(#[serde(serialize_with = "decimal_string")] u64),
    String(String),
}

fn decimal_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl From<bool> for PureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for PureValue {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<String> for PureValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PureValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// An input of a transaction block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CallArg {
    /// A value passed by content.
    Pure {
        /// The value.
        value: PureValue,
    },
    /// An object passed by id; the wallet resolves its version and ownership.
    Object {
        /// The object id.
        object_id: ObjectId,
    },
}

/// A reference to a value available to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Argument {
    /// The coin paying for gas.
    GasCoin,
    /// The input at `index`.
    Input {
        /// Position in [`TransactionBlock::inputs`].
        index: usize,
    },
    /// The single result of the command at `index`.
    Result {
        /// Position in [`TransactionBlock::commands`].
        index: usize,
    },
    /// One of several results of the command at `index`.
    NestedResult {
        /// Position in [`TransactionBlock::commands`].
        index: usize,
        /// Position within that command's results.
        result_index: usize,
    },
}

/// A command of a transaction block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Command {
    /// Calls a Move entry function.
    MoveCall {
        /// `<package>::<module>::<function>`.
        target: String,
        /// Generic type arguments.
        type_arguments: Vec<String>,
        /// Arguments in declaration order.
        arguments: Vec<Argument>,
    },
    /// Splits new coins off `coin`, one per amount.
    SplitCoins {
        /// The coin to split.
        coin: Argument,
        /// The amounts, in the coin's base unit.
        amounts: Vec<Argument>,
    },
}

/// A programmable transaction block: ordered inputs and ordered commands.
///
/// The block is handed to the wallet as JSON. Gas budget and sender are filled in by the
/// [`crate::TransactionExecutor`] right before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlock {
    sender: Option<Address>,
    gas_budget: Option<u64>,
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl TransactionBlock {
    /// Creates an empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pure input.
    pub fn pure(&mut self, value: impl Into<PureValue>) -> Argument {
        self.inputs.push(CallArg::Pure { value: value.into() });
        Argument::Input { index: self.inputs.len() - 1 }
    }

    /// Adds an object input. An object already referenced by the block reuses its input.
    pub fn object(&mut self, object_id: ObjectId) -> Argument {
        let existing = self.inputs.iter().position(|input| *input == CallArg::Object { object_id });
        let index = existing.unwrap_or_else(|| {
            self.inputs.push(CallArg::Object { object_id });
            self.inputs.len() - 1
        });
        Argument::Input { index }
    }

    /// Adds a Move call and returns its result.
    pub fn move_call(&mut self, target: String, arguments: Vec<Argument>) -> Argument {
        self.commands.push(Command::MoveCall { target, type_arguments: Vec::new(), arguments });
        Argument::Result { index: self.commands.len() - 1 }
    }

    /// Splits one coin of `amount` off `coin` and returns it.
    pub fn split_coin(&mut self, coin: Argument, amount: Argument) -> Argument {
        self.commands.push(Command::SplitCoins { coin, amounts: vec![amount] });
        Argument::NestedResult { index: self.commands.len() - 1, result_index: 0 }
    }

    /// Sets the maximum gas the block may consume, in MIST.
    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas_budget = Some(budget);
    }

    /// Sets the sending account.
    pub fn set_sender(&mut self, sender: Address) {
        self.sender = Some(sender);
    }

    /// The inputs, in order.
    #[must_use]
    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    /// The commands, in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The gas budget, once set.
    #[must_use]
    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }

    /// The sender, once set.
    #[must_use]
    pub fn sender(&self) -> Option<Address> {
        self.sender
    }
}

/// The parameters of a new group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupParams {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Minimum contribution per member, in MIST.
    pub min_contribution: u64,
    /// Member cap.
    pub max_members: u64,
    /// Maximum loan as a percentage of the member's contributions.
    pub loan_ratio: u64,
    /// Whether members must hold a KYC badge.
    pub kyc_required: bool,
}

/// The parameters of a loan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLoanParams {
    /// The group lending the funds.
    pub group_id: ObjectId,
    /// The requested amount, in MIST.
    pub amount: u64,
    /// What the loan is for.
    pub purpose: String,
    /// How the borrower intends to repay.
    pub repayment_plan: String,
}

/// A write operation of the contract together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ContractCall {
    CreateGroup(CreateGroupParams),
    JoinGroup { group_id: ObjectId },
    MakeContribution { group_id: ObjectId, amount: u64, coin_id: ObjectId },
    RequestLoan(RequestLoanParams),
    VoteOnProposal { proposal_id: ObjectId, vote: bool },
    RepayLoan { loan_id: ObjectId, amount: u64, coin_id: ObjectId },
}

impl ContractCall {
    /// The entry function this call targets.
    #[must_use]
    pub fn function(&self) -> &'static str {
        match self {
            Self::CreateGroup(_) => "create_group",
            Self::JoinGroup { .. } => "join_group",
            Self::MakeContribution { .. } => "make_contribution",
            Self::RequestLoan(_) => "request_loan",
            Self::VoteOnProposal { .. } => "vote_on_proposal",
            Self::RepayLoan { .. } => "repay_loan",
        }
    }
}

/// Builds transaction blocks that call the JamiiFund module.
///
/// Calls can be chained and end up as consecutive commands of one block. Parameters are not
/// validated here; the contract is the authority on what is allowed.
#[derive(Debug, Clone)]
pub struct ContractCallBuilder {
    contract: ContractConfig,
    block: TransactionBlock,
}

impl ContractCallBuilder {
    /// Creates a builder targeting `contract`.
    #[must_use]
    pub fn new(contract: ContractConfig) -> Self {
        Self { contract, block: TransactionBlock::new() }
    }

    /// Appends `call`.
    #[must_use]
    pub fn call(self, call: &ContractCall) -> Self {
        match call {
            ContractCall::CreateGroup(params) => self.create_group(params),
            ContractCall::JoinGroup { group_id } => self.join_group(*group_id),
            ContractCall::MakeContribution { group_id, amount, coin_id } => {
                self.make_contribution(*group_id, *amount, *coin_id)
            }
            ContractCall::RequestLoan(params) => self.request_loan(params),
            ContractCall::VoteOnProposal { proposal_id, vote } => {
                self.vote_on_proposal(*proposal_id, *vote)
            }
            ContractCall::RepayLoan { loan_id, amount, coin_id } => {
                self.repay_loan(*loan_id, *amount, *coin_id)
            }
        }
    }

    /// `create_group(name, description, min_contribution, max_members, loan_ratio, kyc_required,
    /// registry)`.
    #[must_use]
    pub fn create_group(mut self, params: &CreateGroupParams) -> Self {
        let arguments = vec![
            self.block.pure(params.name.as_str()),
            self.block.pure(params.description.as_str()),
            self.block.pure(params.min_contribution),
            self.block.pure(params.max_members),
            self.block.pure(params.loan_ratio),
            self.block.pure(params.kyc_required),
            self.block.object(self.contract.registry_id),
        ];
        self.push_call("create_group", arguments)
    }

    /// `join_group(group, registry)`.
    #[must_use]
    pub fn join_group(mut self, group_id: ObjectId) -> Self {
        let arguments =
            vec![self.block.object(group_id), self.block.object(self.contract.registry_id)];
        self.push_call("join_group", arguments)
    }

    /// `make_contribution(group, payment)`, paying `amount` split off `coin_id`.
    #[must_use]
    pub fn make_contribution(mut self, group_id: ObjectId, amount: u64, coin_id: ObjectId) -> Self {
        let group = self.block.object(group_id);
        let payment = self.split_payment(coin_id, amount);
        self.push_call("make_contribution", vec![group, payment])
    }

    /// `request_loan(group, amount, purpose, repayment_plan)`.
    #[must_use]
    pub fn request_loan(mut self, params: &RequestLoanParams) -> Self {
        let arguments = vec![
            self.block.object(params.group_id),
            self.block.pure(params.amount),
            self.block.pure(params.purpose.as_str()),
            self.block.pure(params.repayment_plan.as_str()),
        ];
        self.push_call("request_loan", arguments)
    }

    /// `vote_on_proposal(proposal, vote)`.
    #[must_use]
    pub fn vote_on_proposal(mut self, proposal_id: ObjectId, vote: bool) -> Self {
        let arguments = vec![self.block.object(proposal_id), self.block.pure(vote)];
        self.push_call("vote_on_proposal", arguments)
    }

    /// `repay_loan(loan, payment)`, paying `amount` split off `coin_id`.
    #[must_use]
    pub fn repay_loan(mut self, loan_id: ObjectId, amount: u64, coin_id: ObjectId) -> Self {
        let loan = self.block.object(loan_id);
        let payment = self.split_payment(coin_id, amount);
        self.push_call("repay_loan", vec![loan, payment])
    }

    /// Returns the finished block.
    #[must_use]
    pub fn build(self) -> TransactionBlock {
        self.block
    }

    fn split_payment(&mut self, coin_id: ObjectId, amount: u64) -> Argument {
        let coin = self.block.object(coin_id);
        let amount = self.block.pure(amount);
        self.block.split_coin(coin, amount)
    }

    fn push_call(mut self, function: &str, arguments: Vec<Argument>) -> Self {
        self.block.move_call(self.contract.target(function), arguments);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn id(n: u8) -> ObjectId {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        ObjectId::new(bytes)
    }

    fn params() -> CreateGroupParams {
        CreateGroupParams {
            name: "Mama Mboga".to_string(),
            description: "Market vendors".to_string(),
            min_contribution: 100_000_000_000,
            max_members: 20,
            loan_ratio: 50,
            kyc_required: true,
        }
    }

    #[test]
    fn test_create_group_argument_order() {
        let contract = ContractConfig::default();
        let block = ContractCallBuilder::new(contract.clone()).create_group(&params()).build();

        assert_eq!(
            block.inputs(),
            &[
                CallArg::Pure { value: PureValue::String("Mama Mboga".to_string()) },
                CallArg::Pure { value: PureValue::String("Market vendors".to_string()) },
                CallArg::Pure { value: PureValue::U64(100_000_000_000) },
                CallArg::Pure { value: PureValue::U64(20) },
                CallArg::Pure { value: PureValue::U64(50) },
                CallArg::Pure { value: PureValue::Bool(true) },
                CallArg::Object { object_id: contract.registry_id },
            ]
        );
        let Command::MoveCall { target, arguments, .. } = &block.commands()[0] else {
            panic!("expected a move call");
        };
        assert_eq!(*target, contract.target("create_group"));
        assert_eq!(arguments.len(), 7);
        assert_eq!(arguments[6], Argument::Input { index: 6 });
    }

    #[test]
    fn test_contribution_splits_payment_coin() {
        let block = ContractCallBuilder::new(ContractConfig::default())
            .make_contribution(id(1), 5_000, id(9))
            .build();

        assert_eq!(
            block.commands()[0],
            Command::SplitCoins {
                coin: Argument::Input { index: 1 },
                amounts: vec![Argument::Input { index: 2 }],
            }
        );
        let Command::MoveCall { arguments, .. } = &block.commands()[1] else {
            panic!("expected a move call");
        };
        assert_eq!(
            arguments,
            &vec![
                Argument::Input { index: 0 },
                Argument::NestedResult { index: 0, result_index: 0 }
            ]
        );
    }

    #[test]
    fn test_chained_calls_share_registry_input() {
        let contract = ContractConfig::default();
        let block = ContractCallBuilder::new(contract.clone())
            .create_group(&params())
            .join_group(id(3))
            .build();

        assert_eq!(block.commands().len(), 2);
        let registry_inputs = block
            .inputs()
            .iter()
            .filter(|input| **input == CallArg::Object { object_id: contract.registry_id })
            .count();
        assert_eq!(registry_inputs, 1);
        let Command::MoveCall { target, arguments, .. } = &block.commands()[1] else {
            panic!("expected a move call");
        };
        assert_eq!(*target, contract.target("join_group"));
        assert_eq!(arguments[1], Argument::Input { index: 6 });
    }

    #[test]
    fn test_call_dispatch_matches_direct_methods() {
        let contract = ContractConfig::default();
        let call = ContractCall::VoteOnProposal { proposal_id: id(4), vote: false };
        let dispatched = ContractCallBuilder::new(contract.clone()).call(&call).build();
        let direct = ContractCallBuilder::new(contract).vote_on_proposal(id(4), false).build();
        assert_eq!(dispatched, direct);
        assert_eq!(call.function(), "vote_on_proposal");
    }

    #[test]
    fn test_block_json_shape() {
        let mut block = ContractCallBuilder::new(ContractConfig::default())
            .request_loan(&RequestLoanParams {
                group_id: id(1),
                amount: 7,
                purpose: "stock".to_string(),
                repayment_plan: "weekly".to_string(),
            })
            .build();
        block.set_gas_budget(10_000_000);

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["gasBudget"], json!(10_000_000));
        assert_eq!(value["inputs"][0]["kind"], json!("object"));
        assert_eq!(
            value["inputs"][1],
            json!({ "kind": "pure", "value": { "type": "u64", "value": "7" } })
        );
        assert_eq!(value["commands"][0]["kind"], json!("MoveCall"));
        assert_eq!(value["commands"][0]["typeArguments"], json!([]));
    }

    #[test]
    fn test_u64_keeps_full_precision() {
        let value = serde_json::to_value(PureValue::from(u64::MAX)).unwrap();
        assert_eq!(value, json!({ "type": "u64", "value": "18446744073709551615" }));
    }
}
