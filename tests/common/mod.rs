use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes a scenario with one campaign and `donations` small donations to it.
pub fn generate_scenario(path: &Path, goal: &str, donations: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record([
        "command",
        "title",
        "description",
        "goal",
        "days",
        "campaign",
        "amount",
        "actor",
    ])?;
    wtr.write_record([
        "create",
        "Stress Test",
        "Generated scenario",
        goal,
        "30",
        "",
        "",
        "0xCREATOR",
    ])?;
    for i in 1..=donations {
        let donor = format!("0xDONOR{i}");
        wtr.write_record(["donate", "", "", "", "", "1", "1.0", donor.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
