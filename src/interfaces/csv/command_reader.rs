use crate::error::{Result, SimulationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Create,
    Donate,
}

/// A single scripted command driving the simulation.
///
/// Create rows fill `title`, `description`, `goal`, `days` (deadline offset
/// from now) and `actor` (the creator). Donate rows fill `campaign`,
/// `amount` and `actor` (the donor). Unused columns stay blank.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScenarioCommand {
    pub command: CommandKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<Decimal>,
    pub days: Option<i64>,
    pub campaign: Option<u64>,
    pub amount: Option<Decimal>,
    pub actor: String,
}

/// Reads scenario commands from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<ScenarioCommand>`.
/// Whitespace trimming and flexible record lengths are handled automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<ScenarioCommand>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SimulationError::from))
    }
}
