use chrono::Utc;
use crowdsim::application::engine::{ContractEngine, DonationRequest, EngineEvent};
use crowdsim::domain::campaign::{CampaignId, CampaignSpec};
use crowdsim::domain::funds::Balance;
use crowdsim::domain::transaction::{TransactionStatus, TransactionType};
use crowdsim::error::SimulationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

fn spec(title: &str, goal: Decimal, creator: &str) -> CampaignSpec {
    CampaignSpec {
        title: title.to_string(),
        description: format!("{title} description"),
        goal,
        deadline: Utc::now() + chrono::Duration::days(30),
        creator: creator.to_string(),
    }
}

/// Advances paused time until the pipeline has drained.
async fn settle(engine: &ContractEngine) {
    while !engine.is_idle().await {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

async fn listed_campaign(
    engine: &ContractEngine,
    title: &str,
    goal: Decimal,
    creator: &str,
) -> CampaignId {
    engine.create_campaign(spec(title, goal, creator)).await.unwrap();
    settle(engine).await;
    engine
        .campaigns()
        .await
        .into_iter()
        .find(|c| c.title == title)
        .expect("campaign should be listed after confirmation")
        .id
}

async fn donate(engine: &ContractEngine, campaign_id: CampaignId, amount: Decimal, donor: &str) {
    engine
        .donate(DonationRequest {
            campaign_id,
            amount,
            donor: donor.to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_full_funding_finalizes_with_single_withdrawal() {
    let engine = ContractEngine::new();
    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;

    donate(&engine, campaign_id, dec!(6), "0xALICE").await;
    settle(&engine).await;
    donate(&engine, campaign_id, dec!(4), "0xBOB").await;
    settle(&engine).await;

    let campaigns = engine.campaigns().await;
    let campaign = &campaigns[0];
    assert!(!campaign.is_active);
    assert_eq!(campaign.raised, Balance::new(dec!(10)));
    assert_eq!(campaign.backers, 2);

    let withdrawals: Vec<_> = engine
        .transactions()
        .await
        .into_iter()
        .filter(|tx| tx.r#type == TransactionType::Withdrawal)
        .collect();
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].amount, Balance::new(dec!(10)));
    assert_eq!(withdrawals[0].to, "0xCREATOR");
    assert_eq!(withdrawals[0].status, TransactionStatus::Confirmed);

    let state = engine.contract_state().await;
    assert_eq!(state.contract_balance, Balance::ZERO);
    assert_eq!(state.total_funds_raised, Balance::new(dec!(10)));
}

#[tokio::test(start_paused = true)]
async fn test_partial_funding_stays_active() {
    let engine = ContractEngine::new();
    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;

    donate(&engine, campaign_id, dec!(5), "0xALICE").await;
    settle(&engine).await;

    let campaigns = engine.campaigns().await;
    let campaign = &campaigns[0];
    assert!(campaign.is_active);
    assert_eq!(campaign.raised, Balance::new(dec!(5)));
    assert_eq!(campaign.backers, 1);

    let withdrawals = engine
        .transactions()
        .await
        .into_iter()
        .filter(|tx| tx.r#type == TransactionType::Withdrawal)
        .count();
    assert_eq!(withdrawals, 0);
    assert_eq!(
        engine.contract_state().await.contract_balance,
        Balance::new(dec!(5))
    );
}

#[tokio::test(start_paused = true)]
async fn test_two_campaigns_funded_in_same_tick() {
    let engine = ContractEngine::new();
    let first = listed_campaign(&engine, "First", dec!(10), "0xFIRST").await;
    let second = listed_campaign(&engine, "Second", dec!(20), "0xSECOND").await;

    // Both goals crossed in the same tick; each finalizes independently.
    donate(&engine, first, dec!(10), "0xALICE").await;
    donate(&engine, second, dec!(20), "0xBOB").await;
    settle(&engine).await;

    let campaigns = engine.campaigns().await;
    assert!(campaigns.iter().all(|c| !c.is_active));

    let withdrawals: Vec<_> = engine
        .transactions()
        .await
        .into_iter()
        .filter(|tx| tx.r#type == TransactionType::Withdrawal)
        .collect();
    assert_eq!(withdrawals.len(), 2);
    let for_first = withdrawals.iter().find(|tx| tx.campaign_id == first).unwrap();
    assert_eq!(for_first.amount, Balance::new(dec!(10)));
    assert_eq!(for_first.to, "0xFIRST");
    let for_second = withdrawals.iter().find(|tx| tx.campaign_id == second).unwrap();
    assert_eq!(for_second.amount, Balance::new(dec!(20)));
    assert_eq!(for_second.to, "0xSECOND");

    assert_eq!(engine.contract_state().await.contract_balance, Balance::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_finalized_campaign_rejects_further_donations() {
    let engine = ContractEngine::new();
    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;
    donate(&engine, campaign_id, dec!(10), "0xALICE").await;
    settle(&engine).await;

    let result = engine
        .donate(DonationRequest {
            campaign_id,
            amount: dec!(1),
            donor: "0xLATE".to_string(),
        })
        .await;
    assert!(matches!(result, Err(SimulationError::NotFound(_))));

    // Still exactly one withdrawal; replayed scans never double-finalize.
    let withdrawals = engine
        .transactions()
        .await
        .into_iter()
        .filter(|tx| tx.r#type == TransactionType::Withdrawal)
        .count();
    assert_eq!(withdrawals, 1);
}

#[tokio::test(start_paused = true)]
async fn test_events_fire_for_confirmations_and_goal() {
    let engine = ContractEngine::new();
    let mut events = engine.subscribe();

    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;
    donate(&engine, campaign_id, dec!(10), "0xALICE").await;
    settle(&engine).await;

    let mut confirmed = 0;
    let mut goals = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            EngineEvent::TransactionConfirmed { .. } => confirmed += 1,
            EngineEvent::GoalReached {
                campaign_title,
                raised,
                ..
            } => goals.push((campaign_title, raised)),
        }
    }
    // Deployment, donation and automatic withdrawal.
    assert_eq!(confirmed, 3);
    assert_eq!(goals, vec![("Garden".to_string(), Balance::new(dec!(10)))]);
}

#[tokio::test(start_paused = true)]
async fn test_state_correct_without_any_subscriber() {
    // Notifications are fire-and-forget; nobody listening must not matter.
    let engine = ContractEngine::new();
    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;
    donate(&engine, campaign_id, dec!(10), "0xALICE").await;
    settle(&engine).await;

    assert!(!engine.campaigns().await[0].is_active);
    assert_eq!(engine.contract_state().await.contract_balance, Balance::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_steps_progress_through_milestones() {
    let engine = ContractEngine::new();

    let steps = engine.steps().await;
    assert!(steps[0].is_complete);
    assert!(steps[1..].iter().all(|s| !s.is_complete));

    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;
    let steps = engine.steps().await;
    assert!(steps[1].is_complete);
    assert_eq!(
        steps[1].result.as_deref(),
        Some("Campaign \"Garden\" created successfully!")
    );
    assert!(!steps[2].is_complete);

    donate(&engine, campaign_id, dec!(4), "0xALICE").await;
    settle(&engine).await;
    let steps = engine.steps().await;
    assert!(steps[2].is_complete);
    assert!(!steps[3].is_complete);

    donate(&engine, campaign_id, dec!(6), "0xBOB").await;
    settle(&engine).await;
    let steps = engine.steps().await;
    assert!(steps[3].is_complete);
    assert_eq!(
        steps[3].result.as_deref(),
        Some("Automatic withdrawal of 10 ETH completed!")
    );
}

#[tokio::test(start_paused = true)]
async fn test_pending_donation_visible_before_confirmation() {
    let engine = ContractEngine::new();
    let campaign_id = listed_campaign(&engine, "Garden", dec!(10), "0xCREATOR").await;

    donate(&engine, campaign_id, dec!(5), "0xALICE").await;

    // Immediately visible in the log as pending, newest first; no credit yet.
    let log = engine.transactions().await;
    assert_eq!(log[0].status, TransactionStatus::Pending);
    assert_eq!(log[0].amount, Balance::new(dec!(5)));
    assert_eq!(engine.campaigns().await[0].raised, Balance::ZERO);

    settle(&engine).await;
    assert_eq!(engine.campaigns().await[0].raised, Balance::new(dec!(5)));
}
