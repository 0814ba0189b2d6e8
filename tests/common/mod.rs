// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tempfile::TempDir;
use tripledger::application::LedgerService;
use tripledger::domain::RawEntry;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::open(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Raw entry paid in base currency
pub fn cny(date: &str, city: &str, category: &str, amount: &str) -> RawEntry {
    RawEntry::new(date, city, category, amount, "CNY")
}

/// Raw entry paid in Hong Kong dollars
pub fn hkd(date: &str, city: &str, category: &str, amount: &str) -> RawEntry {
    RawEntry::new(date, city, category, amount, "HKD")
}

/// Test fixture: a short Hangzhou -> Shenzhen -> Hong Kong drive
pub struct SampleTrip;

impl SampleTrip {
    pub async fn record(service: &LedgerService) -> Result<()> {
        let entries = vec![
            cny("2026-01-28", "hangzhou", "dining", "88").with_description("Breakfast"),
            cny("2026-01-28", "in-transit", "vehicle-energy", "45.60")
                .with_description("Model Y charging"),
            cny("2026-01-28", "in-transit", "toll-parking", "215"),
            cny("2026-01-29", "shenzhen", "lodging", "450").with_note("2 nights"),
            hkd("2026-01-31", "hong-kong", "shopping", "1000").with_description("Nintendo store"),
            hkd("2026-01-31", "hong-kong", "dining", "100"),
        ];
        for entry in entries {
            service.submit_entry(entry).await?;
        }
        Ok(())
    }
}
