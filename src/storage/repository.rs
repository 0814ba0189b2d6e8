use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};

use crate::domain::{Category, Cents, City, DATE_FORMAT, ExpenseRecord, MAX_ENTRY_CENTS};

use super::MIGRATION_001_INITIAL;

/// Optional filters for listing records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub city: Option<City>,
    pub category: Option<Category>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// Append-only store of expense records backed by SQLite.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database file at `path`, creating it if missing.
    /// The path is used as-is, so `?` or `#` in file names need no escaping.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", path))?;
        let repo = Self::new(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    /// Run database migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Durably append one record. The insert is committed before this returns.
    pub async fn append(&self, record: &ExpenseRecord) -> Result<()> {
        self.append_all(std::slice::from_ref(record)).await
    }

    /// Append several records in a single transaction: either all of them are
    /// stored or none are.
    pub async fn append_all(&self, records: &[ExpenseRecord]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO expenses (date, city, category, description, amount_base, note)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.date.format(DATE_FORMAT).to_string())
            .bind(record.city.as_str())
            .bind(record.category.as_str())
            .bind(&record.description)
            .bind(record.amount_base)
            .bind(&record.note)
            .execute(&mut *tx)
            .await
            .context("Failed to save expense record")?;
        }

        tx.commit().await.context("Failed to commit expense records")?;
        Ok(())
    }

    /// Load every record in insertion order.
    pub async fn load(&self) -> Result<Vec<ExpenseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT date, city, category, description, amount_base, note
            FROM expenses
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load expense records")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// List records matching `filter`, newest date first.
    /// Records on the same date are listed latest insertion first.
    pub async fn list_filtered(&self, filter: &RecordFilter) -> Result<Vec<ExpenseRecord>> {
        let mut query = String::from(
            "SELECT date, city, category, description, amount_base, note FROM expenses WHERE 1=1",
        );

        let from_date_str = filter.from_date.map(|d| d.format(DATE_FORMAT).to_string());
        let to_date_str = filter.to_date.map(|d| d.format(DATE_FORMAT).to_string());

        if filter.city.is_some() {
            query.push_str(" AND city = ?");
        }
        if filter.category.is_some() {
            query.push_str(" AND category = ?");
        }
        // ISO dates compare correctly as text
        if from_date_str.is_some() {
            query.push_str(" AND date >= ?");
        }
        if to_date_str.is_some() {
            query.push_str(" AND date <= ?");
        }

        query.push_str(" ORDER BY date DESC, seq DESC");

        if let Some(lim) = filter.limit {
            query.push_str(&format!(" LIMIT {}", lim));
        }

        let mut sql_query = sqlx::query(&query);

        if let Some(city) = filter.city {
            sql_query = sql_query.bind(city.as_str());
        }
        if let Some(category) = filter.category {
            sql_query = sql_query.bind(category.as_str());
        }
        if let Some(ref fd_str) = from_date_str {
            sql_query = sql_query.bind(fd_str);
        }
        if let Some(ref td_str) = to_date_str {
            sql_query = sql_query.bind(td_str);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list filtered expense records")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM expenses")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count expense records")?;
        row.try_get("count").context("Invalid expense count")
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ExpenseRecord> {
        let date_str: String = row.try_get("date").context("Invalid stored date")?;
        let city_str: String = row.try_get("city").context("Invalid stored city")?;
        let category_str: String = row.try_get("category").context("Invalid stored category")?;
        let amount_base: Cents = row
            .try_get("amount_base")
            .context("Invalid stored amount")?;

        if !(0..=MAX_ENTRY_CENTS).contains(&amount_base) {
            anyhow::bail!("Stored amount out of range: {}", amount_base);
        }

        Ok(ExpenseRecord {
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid stored date: {}", date_str))?,
            city: City::from_str(&city_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid stored city: {}", city_str))?,
            category: Category::from_str(&category_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid stored category: {}", category_str))?,
            description: row
                .try_get("description")
                .context("Invalid stored description")?,
            amount_base,
            note: row.try_get("note").context("Invalid stored note")?,
        })
    }
}
