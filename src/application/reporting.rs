use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    category_spend, spend_by_category, spend_by_city, total_spend, trip_day_count, Category,
    Cents, City, ExpenseRecord,
};

/// Everything a dashboard view needs, computed from one snapshot of the ledger
/// so that totals and the detail list always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_spend: Cents,
    pub spend_by_category: BTreeMap<Category, Cents>,
    pub spend_by_city: BTreeMap<City, Cents>,
    pub vehicle_energy_spend: Cents,
    pub trip_day_count: usize,
    /// Records in insertion order
    pub records: Vec<ExpenseRecord>,
}

impl LedgerSummary {
    pub fn from_records(records: Vec<ExpenseRecord>) -> Self {
        Self {
            total_spend: total_spend(&records),
            spend_by_category: spend_by_category(&records),
            spend_by_city: spend_by_city(&records),
            vehicle_energy_spend: category_spend(&records, Category::VehicleEnergy),
            trip_day_count: trip_day_count(&records),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by date, newest first. Same-day records keep the
    /// latest entry on top.
    pub fn records_newest_first(&self) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.records.iter().rev().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Share of total spend for `amount`, as a percentage.
    pub fn percentage_of_total(&self, amount: Cents) -> f64 {
        if self.total_spend == 0 {
            0.0
        } else {
            (amount as f64 / self.total_spend as f64) * 100.0
        }
    }
}
