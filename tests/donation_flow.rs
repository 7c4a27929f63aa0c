//! End-to-end donation tests against an in-process devnet
//!
//! Real TFHE ciphertexts all the way: amounts are encrypted by the relayer
//! SDK, accumulated by the devnet contract and decrypted through its relayer.

mod common;

use std::sync::Arc;

use cipherkind::client::{BoardState, DonationStep, Session, PLACEHOLDER};
use cipherkind::devnet::{DevnetChain, LocalGateway};
use cipherkind::gateway::GatewayError;
use cipherkind::primitives::{Address, CampaignId};

use common::{chain, CREATOR, DONOR, OTHER_DONOR};

fn session_for(chain: &Arc<DevnetChain>, account: Address) -> Session {
    common::session(
        Arc::new(LocalGateway::new(chain.clone())),
        chain.clone(),
        account,
        chain.provider(),
    )
}

async fn ready(chain: &Arc<DevnetChain>, account: Address) -> Session {
    let session = session_for(chain, account);
    session.initialize_encryption().await.unwrap();
    session
}

async fn donate(session: &Session, id: CampaignId, amount: &str) {
    let mut flow = session.donate(id, "campaign");
    flow.set_amount(amount).unwrap();
    flow.encrypt().await.unwrap();
    flow.continue_to_confirm().unwrap();
    flow.submit().await.unwrap();
    assert_eq!(flow.step(), DonationStep::AmountEntry);
}

#[tokio::test]
async fn test_creator_sees_accumulated_total() {
    let chain = chain();
    let creator = ready(&chain, CREATOR).await;

    let id = creator
        .composer()
        .create_from_input(
            "Clean Water Initiative",
            "Bringing safe water to remote communities",
            "100",
        )
        .await
        .unwrap();

    donate(&ready(&chain, DONOR).await, id, "25.50").await;
    donate(&ready(&chain, OTHER_DONOR).await, id, "10").await;

    let mut view = creator.campaign(id);
    view.refresh().await.unwrap();

    assert_eq!(view.display_amount(), "35.50");
    assert_eq!(view.progress(), 35.5);
    assert_eq!(view.campaign().unwrap().donor_count, 2);

    let stats = chain.platform_stats();
    assert_eq!(stats.total_campaigns, 1);
    assert_eq!(stats.total_donations, 2);
}

#[tokio::test]
async fn test_donor_cannot_decrypt_campaign_total() {
    let chain = chain();
    let creator = ready(&chain, CREATOR).await;
    let id = creator
        .composer()
        .create_from_input("Education for All", "", "150")
        .await
        .unwrap();

    let donor = ready(&chain, DONOR).await;
    donate(&donor, id, "5").await;

    let mut view = donor.campaign(id);
    view.refresh().await.unwrap();
    assert_eq!(view.display_amount(), PLACEHOLDER);
    assert_eq!(view.progress(), 0.0);
    assert!(view.render().contains("1 private donors"));
}

#[tokio::test]
async fn test_new_campaign_total_is_zero_for_creator() {
    let chain = chain();
    let creator = ready(&chain, CREATOR).await;

    let ids = creator.composer().seed().await.unwrap();
    assert_eq!(ids.len(), 3);

    let mut board = creator.board();
    board.load().await.unwrap();
    assert_eq!(board.state(), BoardState::Ready);

    let titles: Vec<_> = board
        .views()
        .iter()
        .map(|v| v.campaign().unwrap().title.clone())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Clean Water Initiative",
            "Education for All",
            "Climate Action Fund"
        ]
    );
    for view in board.views() {
        assert_eq!(view.display_amount(), "0.00");
    }
}

#[tokio::test]
async fn test_empty_devnet_board() {
    let chain = chain();
    let session = ready(&chain, DONOR).await;

    let mut board = session.board();
    board.load().await.unwrap();
    assert_eq!(board.state(), BoardState::Empty);
}

#[tokio::test]
async fn test_donation_to_completed_campaign_is_rejected() {
    let chain = chain();
    let creator = ready(&chain, CREATOR).await;
    let id = creator
        .composer()
        .create_from_input("Climate Action Fund", "", "200")
        .await
        .unwrap();
    chain.complete_campaign(CREATOR, id).await.unwrap();

    let donor = ready(&chain, DONOR).await;
    let mut flow = donor.donate(id, "Climate Action Fund");
    flow.set_amount("1").unwrap();
    flow.encrypt().await.unwrap();
    flow.continue_to_confirm().unwrap();

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(
        err,
        cipherkind::client::ClientError::Gateway(GatewayError::RemoteRejected { .. })
    ));
    assert_eq!(flow.step(), DonationStep::Confirm);
    assert_eq!(chain.platform_stats().total_donations, 0);
}
