mod common;

use std::time::Duration;

use jamii_client::hooks::DataState;
use jamii_rpc::mock::MockReader;
use jamii_types::LoanStatus;
use tokio::time::sleep;

use crate::common::*;

const GROUP: &str = "0x6a";

fn seed(test: &TestContext) {
    test.publish_group(GROUP, "Tech Savers", "Developers saving together", "professional");
    test.publish_group("0x6b", "Church Chama", "Community fund", "community");
    test.fund("0xc1", 1_500_000_000);
    test.grant_loan("0x7b", GROUP, 2_000_000_000, "active");
    test.record_contribution("0x9d", GROUP, 100_000_000_000);
}

#[tokio::test]
async fn test_refresh_populates_everything() {
    let test = setup();
    seed(&test);
    test.connect();

    test.ctx.data.refresh().await;
    let state = test.ctx.data.state().await;

    assert_eq!(state.groups.len(), 2);
    // The account created both groups.
    assert_eq!(state.user_groups.len(), 2);
    assert_eq!(state.user_loans.len(), 1);
    assert_eq!(state.user_loans[0].status, LoanStatus::Active);
    assert_eq!(state.user_contributions[0].amount, 100_000_000_000);
    assert_eq!(state.user_balance, 1_500_000_000);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_user_groups_follow_member_list() {
    let test = setup();
    let outsider = address(0x0f);
    test.publish_group_with_members("0x61", "mine", &outsider, &[test.account.address]);
    test.publish_group_with_members("0x62", "theirs", &outsider, &[address(0x0e)]);
    test.connect();

    test.ctx.data.fetch_user_data().await;
    let state = test.ctx.data.state().await;
    assert_eq!(state.user_groups.len(), 1);
    assert_eq!(state.user_groups[0].name, "mine");
}

#[tokio::test]
async fn test_failed_queries_degrade_to_empty() {
    let test = setup();
    seed(&test);
    test.connect();
    test.reader.set_failing(true);

    test.ctx.data.refresh().await;
    let proposals = test.ctx.data.fetch_group_proposals(object_id(GROUP)).await;

    let state = test.ctx.data.state().await;
    assert!(state.groups.is_empty());
    assert!(state.user_groups.is_empty());
    assert!(state.user_loans.is_empty());
    assert!(state.user_contributions.is_empty());
    assert_eq!(state.user_balance, 0);
    assert!(proposals.is_empty());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_user_data_needs_an_account() {
    let test = setup();
    seed(&test);

    test.ctx.data.fetch_user_data().await;
    assert_eq!(test.ctx.data.state().await, DataState::default());
}

#[tokio::test]
async fn test_groups_are_paginated() {
    let test = setup_with(MockReader::default().with_page_size(2), test_config());
    for i in 0..5 {
        test.publish_group(&format!("0x{:x}", 0x60 + i), &format!("group {i}"), "", "family");
    }

    test.ctx.data.fetch_groups().await;
    assert_eq!(test.ctx.data.state().await.groups.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_refresh_waits_for_delay() {
    let test = setup();
    seed(&test);
    test.connect();

    let handle = test.ctx.data.schedule_refresh();
    sleep(Duration::from_millis(1_900)).await;
    assert!(test.ctx.data.state().await.groups.is_empty());

    handle.await.unwrap();
    assert_eq!(test.ctx.data.state().await.groups.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_watcher_follows_account_changes() {
    let test = setup();
    seed(&test);
    let watcher = test.ctx.data.watch_account();

    // Connecting fetches the account's data.
    test.connect();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(test.ctx.data.state().await.user_balance, 1_500_000_000);

    // Switching to an account without funds replaces it.
    test.ctx.session.connect(jamii_client::WalletAccount::new(address(0x0b)));
    sleep(Duration::from_millis(10)).await;
    let state = test.ctx.data.state().await;
    assert_eq!(state.user_balance, 0);
    assert!(state.user_loans.is_empty());

    // Reconnecting restores it and disconnecting clears it.
    test.connect();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(test.ctx.data.state().await.user_loans.len(), 1);
    test.ctx.session.disconnect();
    sleep(Duration::from_millis(10)).await;
    let state = test.ctx.data.state().await;
    assert!(state.user_loans.is_empty());
    assert!(state.user_groups.is_empty());

    watcher.abort();
}

#[tokio::test]
async fn test_refresh_keeps_opened_proposal_lists_current() {
    let test = setup();
    test.publish_proposal("0x8c", GROUP, 3, 1);
    test.publish_proposal("0x8d", "0x6b", 0, 0);

    let proposals = test.ctx.data.fetch_group_proposals(object_id(GROUP)).await;
    assert_eq!(proposals.len(), 1);
    assert!((proposals[0].support_percentage() - 75.0).abs() < f64::EPSILON);

    test.publish_proposal("0x8e", GROUP, 0, 0);
    test.ctx.data.refresh().await;
    let state = test.ctx.data.state().await;
    assert_eq!(state.proposals[&object_id(GROUP)].len(), 2);
    assert!(!state.proposals.contains_key(&object_id("0x6b")));
}
