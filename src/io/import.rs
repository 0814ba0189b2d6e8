use anyhow::Result;
use std::io::Read;
use tracing::warn;

use crate::application::LedgerService;
use crate::domain::{Currency, EntryError, ExpenseRecord, RawEntry};

use super::{CSV_HEADER, LEGACY_CSV_HEADER};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every row without writing anything
    pub dry_run: bool,
}

/// Importer for reloading records from a CSV export (or a file written by
/// the original spreadsheet tool).
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import records from CSV. Amounts are already in base currency.
    ///
    /// Rows that fail validation are reported and skipped; the valid rows are
    /// written in a single transaction.
    pub async fn import_records_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let columns = ColumnMap::from_headers(csv_reader.headers()?)?;

        let mut records = Vec::new();
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let fallback_line = line_num + 2; // +2 for header and 0-indexing

            let row = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line: fallback_line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };
            let line = row
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_line);

            let field = |idx: usize| row.get(idx).unwrap_or("");
            let raw = RawEntry::new(
                field(columns.date),
                field(columns.city),
                field(columns.category),
                field(columns.amount),
                Currency::Cny.as_str(),
            )
            .with_description(field(columns.description))
            .with_note(field(columns.note));

            match ExpenseRecord::from_raw(&raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line, error = %e, "skipping invalid import row");
                    errors.push(ImportError {
                        line,
                        field: Some(error_field(&e).to_string()),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !options.dry_run && !records.is_empty() {
            self.service.restore_records(&records).await?;
        }

        Ok(ImportResult {
            imported: records.len(),
            errors,
        })
    }
}

/// Column positions resolved from the header row.
struct ColumnMap {
    date: usize,
    city: usize,
    category: usize,
    description: usize,
    amount: usize,
    note: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |idx: usize| -> Result<usize> {
            headers
                .iter()
                .position(|h| {
                    let h = h.trim().trim_start_matches('\u{feff}');
                    h == CSV_HEADER[idx] || h == LEGACY_CSV_HEADER[idx]
                })
                .ok_or_else(|| anyhow::anyhow!("Missing CSV column: {}", CSV_HEADER[idx]))
        };

        Ok(Self {
            date: find(0)?,
            city: find(1)?,
            category: find(2)?,
            description: find(3)?,
            amount: find(4)?,
            note: find(5)?,
        })
    }
}

fn error_field(err: &EntryError) -> &'static str {
    match err {
        EntryError::InvalidDate(_) => "date",
        EntryError::InvalidCity(_) => "city",
        EntryError::InvalidCategory(_) => "category",
        EntryError::InvalidCurrency(_) => "currency",
        EntryError::InvalidAmount(_) => "amount_base",
    }
}
