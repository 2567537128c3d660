use chrono::Utc;
use clap::Parser;
use crowdsim::application::engine::{
    ContractEngine, DonationRequest, EngineEvent, SimulationConfig,
};
use crowdsim::domain::campaign::{CampaignId, CampaignSpec};
use crowdsim::error::SimulationError;
use crowdsim::interfaces::csv::campaign_writer::CampaignWriter;
use crowdsim::interfaces::csv::command_reader::{CommandKind, CommandReader, ScenarioCommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario CSV file with create/donate commands
    scenario: PathBuf,

    /// Simulated confirmation latency in milliseconds
    #[arg(long, default_value_t = 4000)]
    confirmation_ms: u64,

    /// Grace period before automatic withdrawal, in milliseconds
    #[arg(long, default_value_t = 3000)]
    grace_ms: u64,

    /// Also print the aggregate contract state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = ContractEngine::with_config(SimulationConfig {
        confirmation_delay: Duration::from_millis(cli.confirmation_ms),
        finalization_grace: Duration::from_millis(cli.grace_ms),
    });

    // Log notifications as they fire; the renderer would drive animations here.
    let mut events = engine.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                EngineEvent::TransactionConfirmed { transaction } => {
                    tracing::info!(
                        tx = %transaction.id,
                        kind = ?transaction.r#type,
                        amount = %transaction.amount,
                        "transaction confirmed"
                    );
                }
                EngineEvent::GoalReached {
                    campaign_title,
                    raised,
                    ..
                } => {
                    tracing::info!(campaign = %campaign_title, %raised, "goal reached");
                }
            }
        }
    });

    // Process commands sequentially, letting each settle before the next so
    // donations can reference campaigns created earlier in the script.
    let file = File::open(cli.scenario).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = run_command(&engine, command).await {
                    eprintln!("Error processing command: {}", e);
                }
                settle(&engine).await;
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }
    settle(&engine).await;

    // Output final state
    let stdout = io::stdout();
    let campaigns = engine.campaigns().await;
    let mut writer = CampaignWriter::new(stdout.lock());
    writer.write_campaigns(&campaigns).into_diagnostic()?;

    if cli.json {
        let state = engine.contract_state().await;
        println!("{}", serde_json::to_string_pretty(&state).into_diagnostic()?);
    }

    Ok(())
}

async fn run_command(
    engine: &ContractEngine,
    command: ScenarioCommand,
) -> std::result::Result<(), SimulationError> {
    match command.command {
        CommandKind::Create => {
            let goal = command.goal.ok_or_else(|| {
                SimulationError::ValidationError("create command requires a goal".to_string())
            })?;
            let spec = CampaignSpec {
                title: command.title.unwrap_or_default(),
                description: command.description.unwrap_or_default(),
                goal,
                deadline: Utc::now() + chrono::Duration::days(command.days.unwrap_or(30)),
                creator: command.actor,
            };
            engine.create_campaign(spec).await?;
        }
        CommandKind::Donate => {
            let campaign = command.campaign.ok_or_else(|| {
                SimulationError::ValidationError("donate command requires a campaign".to_string())
            })?;
            let amount = command.amount.ok_or_else(|| {
                SimulationError::ValidationError("donate command requires an amount".to_string())
            })?;
            engine
                .donate(DonationRequest {
                    campaign_id: CampaignId(campaign),
                    amount,
                    donor: command.actor,
                })
                .await?;
        }
    }
    Ok(())
}

/// Waits until the pipeline has drained: no pending transactions and no
/// finalization waiting out its grace period.
async fn settle(engine: &ContractEngine) {
    while !engine.is_idle().await {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
