use crate::domain::campaign::Campaign;
use crate::error::Result;
use std::io::Write;

/// Writes the final campaign table as CSV.
pub struct CampaignWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CampaignWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_campaigns(&mut self, campaigns: &[Campaign]) -> Result<()> {
        self.writer
            .write_record(["id", "title", "goal", "raised", "backers", "active"])?;
        for campaign in campaigns {
            self.writer.write_record([
                campaign.id.to_string(),
                campaign.title.clone(),
                campaign.goal.to_string(),
                campaign.raised.to_string(),
                campaign.backers.to_string(),
                campaign.is_active.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
