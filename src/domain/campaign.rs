use crate::domain::funds::{Amount, Balance};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub u64);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The command payload for creating a campaign.
///
/// Carries raw values as received from the caller; the engine validates them
/// before anything is staged in the ledger.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CampaignSpec {
    pub title: String,
    pub description: String,
    pub goal: Decimal,
    pub deadline: DateTime<Utc>,
    pub creator: String,
}

/// A fundraising campaign with a goal, a deadline and a running total.
///
/// Campaigns are created by a confirmed create-campaign transaction, mutated
/// only by confirmed donations (raised, backers) and by finalization
/// (is_active flips to false), and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub goal: Amount,
    pub raised: Balance,
    pub deadline: DateTime<Utc>,
    pub creator: String,
    pub is_active: bool,
    pub backers: u32,
}

impl Campaign {
    pub fn new(id: CampaignId, spec: CampaignSpec, goal: Amount) -> Self {
        Self {
            id,
            title: spec.title,
            description: spec.description,
            goal,
            raised: Balance::ZERO,
            deadline: spec.deadline,
            creator: spec.creator,
            is_active: true,
            backers: 0,
        }
    }

    pub fn is_fully_funded(&self) -> bool {
        self.raised.value() >= self.goal.value()
    }

    /// Whether a new donation may be accepted right now.
    ///
    /// Inactive, expired and fully funded campaigns all refuse donations.
    pub fn accepts_donations(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.deadline && !self.is_fully_funded()
    }

    /// Credits a confirmed donation.
    pub fn credit(&mut self, amount: Balance) {
        self.raised += amount;
        self.backers += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(goal: Decimal, deadline: DateTime<Utc>) -> Campaign {
        let spec = CampaignSpec {
            title: "Eco-Friendly Water Bottles".to_string(),
            description: "Sustainable bottles made from recycled materials".to_string(),
            goal,
            deadline,
            creator: "0x1234...5678".to_string(),
        };
        let goal = Amount::new(goal).unwrap();
        Campaign::new(CampaignId(1), spec, goal)
    }

    #[test]
    fn test_new_campaign_starts_empty_and_active() {
        let campaign = sample(dec!(100), Utc::now() + chrono::Duration::days(30));
        assert_eq!(campaign.raised, Balance::ZERO);
        assert_eq!(campaign.backers, 0);
        assert!(campaign.is_active);
        assert!(!campaign.is_fully_funded());
    }

    #[test]
    fn test_credit_updates_raised_and_backers() {
        let mut campaign = sample(dec!(100), Utc::now() + chrono::Duration::days(30));
        campaign.credit(Balance::new(dec!(40)));
        campaign.credit(Balance::new(dec!(70)));
        assert_eq!(campaign.raised, Balance::new(dec!(110)));
        assert_eq!(campaign.backers, 2);
        // Raised may overshoot the goal at the instant it is crossed.
        assert!(campaign.is_fully_funded());
    }

    #[test]
    fn test_accepts_donations_rejects_expired() {
        let campaign = sample(dec!(100), Utc::now() - chrono::Duration::days(1));
        assert!(!campaign.accepts_donations(Utc::now()));
    }

    #[test]
    fn test_accepts_donations_rejects_fully_funded() {
        let mut campaign = sample(dec!(100), Utc::now() + chrono::Duration::days(30));
        campaign.credit(Balance::new(dec!(100)));
        assert!(!campaign.accepts_donations(Utc::now()));
    }

    #[test]
    fn test_accepts_donations_rejects_inactive() {
        let mut campaign = sample(dec!(100), Utc::now() + chrono::Duration::days(30));
        campaign.is_active = false;
        assert!(!campaign.accepts_donations(Utc::now()));
    }
}
