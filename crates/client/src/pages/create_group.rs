use jamii_rpc::ChainReader;
use jamii_types::parse_sui;

use crate::{
    pages::{PageError, TransactionSuccess},
    AppContext, CreateGroupParams, Wallet,
};

/// The categories a group can be filed under.
pub const GROUP_CATEGORIES: [&str; 6] =
    ["professional", "business", "community", "creative", "education", "family"];

/// The steps of the create-group wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// Name, description, category and location.
    #[default]
    Basics,
    /// Membership and lending rules.
    Rules,
    /// Summary before submitting.
    Review,
    /// The group was created.
    Done,
}

/// The fields of the create-group wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_members: u64,
    /// Minimum contribution as entered, in SUI.
    pub min_contribution: String,
    pub loan_ratio: u64,
    pub kyc_required: bool,
    pub is_private: bool,
}

impl Default for CreateGroupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            location: String::new(),
            max_members: 20,
            min_contribution: "100".to_string(),
            loan_ratio: 50,
            kyc_required: true,
            is_private: false,
        }
    }
}

impl CreateGroupForm {
    /// Whether the first step may be left.
    #[must_use]
    pub fn basics_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && GROUP_CATEGORIES.contains(&self.category.as_str())
    }

    /// The call parameters, with the contribution converted to MIST.
    ///
    /// Category, location and privacy are not recorded on chain.
    pub fn to_params(&self) -> Result<CreateGroupParams, PageError> {
        if self.name.trim().is_empty() {
            return Err(PageError::Missing("name"));
        }
        if self.description.trim().is_empty() {
            return Err(PageError::Missing("description"));
        }
        if !GROUP_CATEGORIES.contains(&self.category.as_str()) {
            return Err(PageError::UnknownCategory(self.category.clone()));
        }
        Ok(CreateGroupParams {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            min_contribution: parse_sui(&self.min_contribution)?,
            max_members: self.max_members,
            loan_ratio: self.loan_ratio,
            kyc_required: self.kyc_required,
        })
    }
}

/// The create-group wizard.
#[derive(Debug, Clone, Default)]
pub struct CreateGroupPage {
    /// The form fields.
    pub form: CreateGroupForm,
    step: WizardStep,
    success: Option<TransactionSuccess>,
}

impl CreateGroupPage {
    /// Create a new [`CreateGroupPage`] with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The confirmed creation.
    #[must_use]
    pub fn success(&self) -> Option<&TransactionSuccess> {
        self.success.as_ref()
    }

    /// Moves to the next step. Returns false when the current step is incomplete or last.
    pub fn advance(&mut self) -> bool {
        let next = match self.step {
            WizardStep::Basics if self.form.basics_complete() => WizardStep::Rules,
            WizardStep::Rules => WizardStep::Review,
            _ => return false,
        };
        self.step = next;
        true
    }

    /// Moves to the previous step.
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Rules => WizardStep::Basics,
            WizardStep::Review => WizardStep::Rules,
            step => step,
        };
    }

    /// Submits the group and moves to [`WizardStep::Done`] once confirmed.
    pub async fn submit<W: Wallet, R: ChainReader>(
        &mut self,
        ctx: &AppContext<W, R>,
    ) -> Result<&TransactionSuccess, PageError> {
        let params = self.form.to_params()?;
        let result = ctx.transactions.create_group(params).await?;

        self.step = WizardStep::Done;
        ctx.data.schedule_refresh();
        Ok(self.success.insert(TransactionSuccess::new(result.digest)))
    }
}
