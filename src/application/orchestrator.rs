use crate::domain::step::{Milestone, SimulationStep};

/// Ordered tutorial steps, completed by engine milestones.
///
/// Completion is monotonic: once a step is complete it never reverts, though
/// its result text is refreshed on repeat milestones (every confirmed
/// donation updates the donation step's message).
pub struct StepTracker {
    steps: Vec<SimulationStep>,
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTracker {
    pub fn new() -> Self {
        let mut deploy = SimulationStep::new(
            1,
            "Deploy Smart Contract",
            "Deploy the crowdfunding smart contract to the blockchain",
            "Contract deployed with gas fee: 0.05 ETH",
            Milestone::ContractDeployed,
        );
        // The contract is considered deployed the moment the engine exists.
        deploy.is_complete = true;
        deploy.result = Some("Contract address: 0xABC...123".to_string());

        Self {
            steps: vec![
                deploy,
                SimulationStep::new(
                    2,
                    "Create Campaign",
                    "Campaign creator deploys a new funding campaign",
                    "Use the form to create your campaign",
                    Milestone::CampaignCreated,
                ),
                SimulationStep::new(
                    3,
                    "Make Donations",
                    "Supporters make donations to active campaigns",
                    "Click on campaigns to make donations",
                    Milestone::DonationConfirmed,
                ),
                SimulationStep::new(
                    4,
                    "Automatic Execution",
                    "Smart contract automatically handles fund distribution",
                    "Watch automatic execution when goals are met",
                    Milestone::AutomaticWithdrawal,
                ),
            ],
        }
    }

    pub fn complete(&mut self, milestone: Milestone, result: String) {
        if let Some(step) = self.steps.iter_mut().find(|s| s.milestone == milestone) {
            step.is_complete = true;
            step.result = Some(result);
        }
    }

    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }
}
