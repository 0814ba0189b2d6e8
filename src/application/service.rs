use tracing::{debug, info, warn};

use crate::domain::{ExpenseRecord, RawEntry};
use crate::storage::{RecordFilter, Repository};

use super::{AppError, LedgerSummary};

/// Application service providing the ledger operations.
/// This is the handle every front end (CLI, tests, a future UI) goes through;
/// there is no process-wide store.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the ledger at `database_path`, creating an empty one if it does not exist.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::open(database_path).await?;
        info!(path = database_path, "opened expense ledger");
        Ok(Self::new(repo))
    }

    /// Validate, normalize and durably append a new entry.
    ///
    /// On any error nothing is written.
    pub async fn submit_entry(&self, raw: RawEntry) -> Result<ExpenseRecord, AppError> {
        let record = match ExpenseRecord::from_raw(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "rejected expense entry");
                return Err(err.into());
            }
        };

        self.repo.append(&record).await?;
        info!(
            date = %record.date,
            city = record.city.as_str(),
            category = record.category.as_str(),
            amount_base = record.amount_base,
            "recorded expense"
        );
        Ok(record)
    }

    /// All records in insertion order.
    pub async fn load(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        let records = self.repo.load().await?;
        debug!(count = records.len(), "loaded expense records");
        Ok(records)
    }

    /// Compute the dashboard figures from a single snapshot of the ledger.
    pub async fn get_summary(&self) -> Result<LedgerSummary, AppError> {
        let records = self.load().await?;
        let summary = LedgerSummary::from_records(records);
        debug!(
            total_spend = summary.total_spend,
            trip_days = summary.trip_day_count,
            "computed ledger summary"
        );
        Ok(summary)
    }

    /// List records matching a filter, newest first.
    pub async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(self.repo.list_filtered(filter).await?)
    }

    /// Number of stored records.
    pub async fn record_count(&self) -> Result<i64, AppError> {
        Ok(self.repo.count().await?)
    }

    /// Append already-normalized records (e.g. from a reload) in one transaction.
    pub async fn restore_records(&self, records: &[ExpenseRecord]) -> Result<(), AppError> {
        self.repo.append_all(records).await?;
        info!(count = records.len(), "restored expense records");
        Ok(())
    }
}
