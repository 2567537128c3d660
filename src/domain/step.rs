use serde::Serialize;

/// Engine events that drive tutorial progress. Steps are only ever completed
/// by these, never by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    ContractDeployed,
    CampaignCreated,
    DonationConfirmed,
    AutomaticWithdrawal,
}

/// A progress-tracking projection of the tutorial walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStep {
    pub id: u8,
    pub title: String,
    pub description: String,
    pub action: String,
    pub is_complete: bool,
    pub result: Option<String>,
    #[serde(skip)]
    pub milestone: Milestone,
}

impl SimulationStep {
    pub fn new(
        id: u8,
        title: &str,
        description: &str,
        action: &str,
        milestone: Milestone,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            action: action.to_string(),
            is_complete: false,
            result: None,
            milestone,
        }
    }
}
