use anyhow::Result;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, DATE_FORMAT};

use super::CSV_HEADER;

/// Exporter for writing the ledger in its reloadable CSV layout
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export every record, in insertion order, to CSV. Returns the record count.
    pub async fn export_records_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.service.load().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;

        for record in &records {
            csv_writer.write_record([
                record.date.format(DATE_FORMAT).to_string().as_str(),
                record.city.as_str(),
                record.category.as_str(),
                record.description.as_str(),
                format_cents(record.amount_base).as_str(),
                record.note.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }
}
