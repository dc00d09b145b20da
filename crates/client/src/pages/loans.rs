use jamii_rpc::ChainReader;
use jamii_types::{parse_sui, Group, Loan, ObjectId};

use crate::{
    pages::{PageError, TransactionSuccess},
    AppContext, RequestLoanParams, Wallet,
};

/// Shown after a loan request is confirmed.
pub const LOAN_REQUEST_SUCCESS: &str = "Loan request submitted successfully!";

/// Shown after a repayment is confirmed.
pub const LOAN_REPAYMENT_SUCCESS: &str = "Loan payment processed successfully!";

/// The loan request form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanRequestForm {
    pub group_id: Option<ObjectId>,
    /// Amount as entered, in SUI.
    pub amount: String,
    pub purpose: String,
    pub repayment_plan: String,
}

impl LoanRequestForm {
    /// The call parameters, with the amount converted to MIST.
    pub fn to_params(&self) -> Result<RequestLoanParams, PageError> {
        let group_id = self.group_id.ok_or(PageError::Missing("group"))?;
        Ok(RequestLoanParams {
            group_id,
            amount: parse_sui(&self.amount)?,
            purpose: self.purpose.trim().to_string(),
            repayment_plan: self.repayment_plan.trim().to_string(),
        })
    }
}

/// Outstanding loans of the connected account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanSummary {
    /// Number of active loans.
    pub active_count: usize,
    /// Sum of active principals, in MIST.
    pub active_total: u64,
}

impl LoanSummary {
    /// Summarises `loans`.
    #[must_use]
    pub fn of(loans: &[Loan]) -> Self {
        let active = loans.iter().filter(|loan| loan.is_active());
        Self {
            active_count: active.clone().count(),
            active_total: active.map(|loan| loan.amount).sum(),
        }
    }
}

/// The groups a new loan may be requested from: the user's groups without an active loan.
#[must_use]
pub fn eligible_groups<'a>(user_groups: &'a [Group], loans: &[Loan]) -> Vec<&'a Group> {
    user_groups
        .iter()
        .filter(|group| !loans.iter().any(|loan| loan.group_id == group.id && loan.is_active()))
        .collect()
}

/// Requesting and repaying loans.
#[derive(Debug, Clone, Default)]
pub struct LoansPage {
    /// Whether the request form is open.
    pub show_request_form: bool,
    /// The request form.
    pub form: LoanRequestForm,
    success: Option<TransactionSuccess>,
}

impl LoansPage {
    /// Create a new [`LoansPage`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last confirmed request or repayment.
    #[must_use]
    pub fn success(&self) -> Option<&TransactionSuccess> {
        self.success.as_ref()
    }

    /// Closes the success notice.
    pub fn dismiss_success(&mut self) {
        self.success = None;
    }

    /// Submits the request form, then closes and clears it.
    pub async fn submit_request<W: Wallet, R: ChainReader>(
        &mut self,
        ctx: &AppContext<W, R>,
    ) -> Result<&TransactionSuccess, PageError> {
        let params = self.form.to_params()?;
        let result = ctx.transactions.request_loan(params).await?;

        self.show_request_form = false;
        self.form = LoanRequestForm::default();
        ctx.data.schedule_refresh();
        Ok(self
            .success
            .insert(TransactionSuccess::with_message(result.digest, LOAN_REQUEST_SUCCESS)))
    }

    /// Repays `amount` SUI of `loan_id`.
    pub async fn repay<W: Wallet, R: ChainReader>(
        &mut self,
        ctx: &AppContext<W, R>,
        loan_id: ObjectId,
        amount: &str,
    ) -> Result<&TransactionSuccess, PageError> {
        let amount = parse_sui(amount)?;
        let result = ctx.transactions.repay_loan(loan_id, amount).await?;

        ctx.data.schedule_refresh();
        Ok(self
            .success
            .insert(TransactionSuccess::with_message(result.digest, LOAN_REPAYMENT_SUCCESS)))
    }
}
