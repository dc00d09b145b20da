#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use dotenv::dotenv;
use jamii_client::{
    kyc::{CodeSender, ContactType, KycError},
    pages::{
        eligible_groups, participation, CategoryFilter, CreateGroupPage, DashboardView,
        GovernancePage, GovernanceTab, GroupsPage, KycPage, LoanRequestForm, LoanSummary,
        LoansPage, PlatformStats, TransactionNotice, TransactionSuccess,
    },
    AppContext, HttpWallet, Settings, WalletAccount,
};
use jamii_rpc::RpcClient;
use jamii_types::{format_sui, parse_sui, Address, Group, Loan, ObjectId, Proposal};
use jamii_utils::{init_logger, time_now_ms};
use tabled::{settings::Style, Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

type Context = AppContext<HttpWallet, RpcClient>;

/// The CLI application that defines all available commands.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The account to act as. Overrides `JAMII_ACCOUNT`.
    #[arg(long, global = true)]
    account: Option<Address>,
    #[command(subcommand)]
    command: Command,
}

/// The available commands.
#[derive(clap::Subcommand)]
enum Command {
    /// List savings groups.
    Groups(GroupsArgs),
    /// Create a savings group.
    CreateGroup(CreateGroupArgs),
    /// Join a savings group.
    Join {
        /// The group to join.
        group_id: ObjectId,
    },
    /// Contribute SUI to a group.
    Contribute {
        /// The group to contribute to.
        group_id: ObjectId,
        /// The amount in SUI.
        amount: String,
    },
    /// Request a loan from a group.
    RequestLoan(RequestLoanArgs),
    /// Repay part of a loan.
    Repay {
        /// The loan to repay.
        loan_id: ObjectId,
        /// The amount in SUI.
        amount: String,
    },
    /// Vote on a proposal.
    Vote {
        /// The group the proposal belongs to.
        group_id: ObjectId,
        /// The proposal to vote on.
        proposal_id: ObjectId,
        /// Vote against instead of for.
        #[arg(long)]
        against: bool,
    },
    /// List the account's loans.
    Loans,
    /// List a group's proposals.
    Proposals {
        /// The group whose proposals to list.
        group_id: ObjectId,
        /// Show closed proposals instead of open ones.
        #[arg(long)]
        history: bool,
    },
    /// Show the account overview.
    Dashboard,
    /// Show the account's SUI balance.
    Balance,
    /// Verify a phone number or email address.
    Kyc {
        /// The phone number or email address.
        contact: String,
        /// `phone` or `email`.
        #[arg(long, default_value = "phone")]
        contact_type: ContactType,
    },
}

/// The arguments for the `groups` command.
#[derive(Debug, Clone, Parser)]
struct GroupsArgs {
    /// Matched against names and descriptions.
    #[arg(long, default_value = "")]
    search: String,
    /// Only show this category.
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
}

/// The arguments for the `create-group` command.
#[derive(Debug, Clone, Parser)]
struct CreateGroupArgs {
    /// The group name.
    #[arg(long)]
    name: String,
    /// What the group saves for.
    #[arg(long)]
    description: String,
    /// One of professional, business, community, creative, education, family.
    #[arg(long)]
    category: String,
    /// Where members are based.
    #[arg(long, default_value = "")]
    location: String,
    /// The member cap.
    #[arg(long, default_value_t = 20)]
    max_members: u64,
    /// The minimum contribution in SUI.
    #[arg(long, default_value = "100")]
    min_contribution: String,
    /// The share of savings a member may borrow, in percent.
    #[arg(long, default_value_t = 50)]
    loan_ratio: u64,
    /// Let members join without KYC.
    #[arg(long)]
    no_kyc: bool,
}

/// The arguments for the `request-loan` command.
#[derive(Debug, Clone, Parser)]
struct RequestLoanArgs {
    /// The group to borrow from.
    group_id: ObjectId,
    /// The amount in SUI.
    amount: String,
    /// What the loan is for.
    #[arg(long)]
    purpose: String,
    /// How the loan will be repaid.
    #[arg(long, default_value = "monthly")]
    repayment_plan: String,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Members")]
    members: String,
    #[tabled(rename = "Savings (SUI)")]
    savings: String,
    #[tabled(rename = "Min. Contribution (SUI)")]
    min_contribution: String,
}

impl GroupRow {
    fn new(group: &Group) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            category: group.category.clone(),
            members: format!("{}/{}", group.member_count, group.max_members),
            savings: format_sui(group.total_balance, 2),
            min_contribution: format_sui(group.min_contribution, 2),
        }
    }
}

#[derive(Tabled)]
struct LoanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Amount (SUI)")]
    amount: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl LoanRow {
    fn new(loan: &Loan) -> Self {
        Self {
            id: loan.id.to_string(),
            group: loan.group_id.to_string(),
            amount: format_sui(loan.amount, 2),
            purpose: loan.purpose.clone(),
            status: loan.status.as_str().to_string(),
        }
    }
}

#[derive(Tabled)]
struct ProposalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "For")]
    votes_for: u64,
    #[tabled(rename = "Against")]
    votes_against: u64,
    #[tabled(rename = "Support")]
    support: String,
    #[tabled(rename = "Turnout")]
    turnout: String,
}

impl ProposalRow {
    fn new(proposal: &Proposal, members: u64) -> Self {
        Self {
            id: proposal.id.to_string(),
            kind: proposal.proposal_type.label().to_string(),
            description: proposal.description.clone(),
            votes_for: proposal.votes_for,
            votes_against: proposal.votes_against,
            support: format!("{:.0}%", proposal.support_percentage()),
            turnout: format!("{:.0}%", participation(proposal, members)),
        }
    }
}

/// Prints codes to the terminal instead of sending them.
struct ConsoleSender;

#[async_trait]
impl CodeSender for ConsoleSender {
    async fn send(
        &self,
        contact: &str,
        contact_type: ContactType,
        code: &str,
    ) -> Result<(), KycError> {
        println!("Verification code for {} {contact}: {code}", contact_type.label());
        Ok(())
    }
}

/// The main entry point for the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file.
    dotenv().ok();

    // Parse the arguments.
    let cli = Cli::parse();

    // Load the settings.
    let settings = Settings::new()?;
    init_logger(settings.log_format);

    // Setup the context.
    let reader = Arc::new(RpcClient::new(&settings.rpc_url)?);
    let wallet = Arc::new(HttpWallet::new(&settings.wallet_url)?);
    let ctx = AppContext::new(wallet, reader, settings.client_config());

    // Connect the account.
    if let Some(address) = cli.account.or(settings.account) {
        info!(account = %address, rpc = %settings.rpc_url, "connected");
        ctx.session.connect(WalletAccount::new(address));
    }

    // Run the command.
    match cli.command {
        Command::Groups(args) => list_groups(&ctx, args).await,
        Command::CreateGroup(args) => create_group(&ctx, args).await,
        Command::Join { group_id } => {
            let mut page = GroupsPage::new();
            let success = page.join(&ctx, group_id).await?.clone();
            report(&ctx, &success).await;
            Ok(())
        }
        Command::Contribute { group_id, amount } => {
            let result =
                ctx.transactions.make_contribution(group_id, parse_sui(&amount)?).await?;
            report(&ctx, &TransactionSuccess::new(result.digest)).await;
            Ok(())
        }
        Command::RequestLoan(args) => request_loan(&ctx, args).await,
        Command::Repay { loan_id, amount } => {
            let mut page = LoansPage::new();
            let success = page.repay(&ctx, loan_id, &amount).await?.clone();
            report(&ctx, &success).await;
            Ok(())
        }
        Command::Vote { group_id, proposal_id, against } => {
            let mut page = GovernancePage::new(group_id);
            let success = page.vote(&ctx, proposal_id, !against).await?.clone();
            report(&ctx, &success).await;
            Ok(())
        }
        Command::Loans => list_loans(&ctx).await,
        Command::Proposals { group_id, history } => list_proposals(&ctx, group_id, history).await,
        Command::Dashboard => dashboard(&ctx).await,
        Command::Balance => {
            let account = connected(&ctx)?;
            ctx.data.fetch_user_data().await;
            let balance = ctx.data.state().await.user_balance;
            println!("{} SUI ({})", format_sui(balance, 4), account.address);
            Ok(())
        }
        Command::Kyc { contact, contact_type } => verify_contact(contact, contact_type).await,
    }
}

fn connected(ctx: &Context) -> Result<WalletAccount> {
    ctx.session.current().ok_or_else(|| anyhow!("no account: pass --account or set JAMII_ACCOUNT"))
}

async fn report(ctx: &Context, success: &TransactionSuccess) {
    let status = ctx.transactions.status().await;
    if let TransactionNotice::Success { message, digest, explorer_url, .. } =
        TransactionNotice::select(&status, Some(success), &ctx.explorer)
    {
        println!("{message}");
        println!("  digest: {digest}");
        if let Some(url) = explorer_url {
            println!("  {url}");
        }
    }
}

async fn list_groups(ctx: &Context, args: GroupsArgs) -> Result<()> {
    ctx.data.fetch_groups().await;
    let groups = ctx.data.state().await.groups;

    let mut page = GroupsPage::new();
    page.search_term = args.search;
    page.category = args.category;
    let filtered = page.filtered(&groups);
    if filtered.is_empty() {
        println!("No groups found.");
    } else {
        let mut table = Table::new(filtered.into_iter().map(GroupRow::new));
        table.with(Style::modern());
        println!("{table}");
    }

    let stats = PlatformStats::of(&groups);
    println!(
        "\n{} groups, {} members, {} SUI saved",
        stats.groups,
        stats.total_members,
        format_sui(stats.total_savings, 2)
    );
    Ok(())
}

async fn create_group(ctx: &Context, args: CreateGroupArgs) -> Result<()> {
    let mut page = CreateGroupPage::new();
    page.form.name = args.name;
    page.form.description = args.description;
    page.form.category = args.category;
    page.form.location = args.location;
    page.form.max_members = args.max_members;
    page.form.min_contribution = args.min_contribution;
    page.form.loan_ratio = args.loan_ratio;
    page.form.kyc_required = !args.no_kyc;

    // Walk the wizard to the review step.
    while page.advance() {}
    let success = page.submit(ctx).await?.clone();
    report(ctx, &success).await;
    Ok(())
}

async fn request_loan(ctx: &Context, args: RequestLoanArgs) -> Result<()> {
    connected(ctx)?;
    ctx.data.fetch_user_data().await;
    let state = ctx.data.state().await;
    if !eligible_groups(&state.user_groups, &state.user_loans)
        .iter()
        .any(|group| group.id == args.group_id)
    {
        return Err(anyhow!("group {} has no loan available to this account", args.group_id));
    }

    let mut page = LoansPage::new();
    page.form = LoanRequestForm {
        group_id: Some(args.group_id),
        amount: args.amount,
        purpose: args.purpose,
        repayment_plan: args.repayment_plan,
    };
    let success = page.submit_request(ctx).await?.clone();
    report(ctx, &success).await;
    Ok(())
}

async fn list_loans(ctx: &Context) -> Result<()> {
    connected(ctx)?;
    ctx.data.fetch_user_data().await;
    let loans = ctx.data.state().await.user_loans;

    let mut table = Table::new(loans.iter().map(LoanRow::new));
    table.with(Style::modern());
    println!("{table}");

    let summary = LoanSummary::of(&loans);
    println!(
        "\n{} active, {} SUI outstanding",
        summary.active_count,
        format_sui(summary.active_total, 2)
    );
    Ok(())
}

async fn list_proposals(ctx: &Context, group_id: ObjectId, history: bool) -> Result<()> {
    ctx.data.fetch_groups().await;
    let members = ctx
        .data
        .state()
        .await
        .groups
        .iter()
        .find(|group| group.id == group_id)
        .map_or(0, |group| group.member_count);

    let mut page = GovernancePage::new(group_id);
    page.tab = if history { GovernanceTab::History } else { GovernanceTab::Active };
    page.load(ctx).await;

    let rows: Vec<ProposalRow> = page
        .visible(time_now_ms())
        .into_iter()
        .map(|proposal| ProposalRow::new(proposal, members))
        .collect();
    if rows.is_empty() {
        println!("No proposals.");
        return Ok(());
    }
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
    Ok(())
}

async fn dashboard(ctx: &Context) -> Result<()> {
    let account = connected(ctx)?;
    ctx.data.fetch_user_data().await;
    let view = DashboardView::new(&ctx.data.state().await, Some(&account));

    println!("Account:       {}", view.account.unwrap_or_default());
    println!("Balance:       {} SUI", view.balance);
    println!("Active groups: {}", view.active_groups.len());
    println!("Active loans:  {}", view.active_loans.len());
    println!("Contributed:   {} SUI", format_sui(view.total_contributions, 2));
    Ok(())
}

async fn verify_contact(contact: String, contact_type: ContactType) -> Result<()> {
    let mut page = KycPage::new(ConsoleSender);
    page.contact = contact;
    page.contact_type = Some(contact_type);
    page.request_code(time_now_ms()).await?;

    println!("Enter the code:");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    page.code = lines.next_line().await?.unwrap_or_default().trim().to_string();
    page.verify(time_now_ms())?;

    let (score, label) = page.reputation();
    if let Some(status) = page.status() {
        println!("Verified. Badge {} issued.", status.badge.id);
    }
    println!("Reputation: {score} ({label})");
    Ok(())
}
