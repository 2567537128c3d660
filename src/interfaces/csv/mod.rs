//! CSV surfaces for the CLI: scripted scenario input and the final campaign
//! table output.

pub mod campaign_writer;
pub mod command_reader;
