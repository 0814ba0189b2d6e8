use std::collections::{BTreeMap, BTreeSet};

use super::{Category, Cents, City, ExpenseRecord};

// All functions here are pure folds over a record snapshot, so the result
// never depends on the order of `records`. Every record is at most
// `MAX_ENTRY_CENTS`, so sums stay within `Cents` for any realistic ledger.

/// Total spend across all records. Zero for an empty ledger.
pub fn total_spend(records: &[ExpenseRecord]) -> Cents {
    records.iter().map(|record| record.amount_base).sum()
}

/// Spend grouped by category. Categories without records are absent.
pub fn spend_by_category(records: &[ExpenseRecord]) -> BTreeMap<Category, Cents> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.category).or_insert(0) += record.amount_base;
    }
    totals
}

/// Spend grouped by city. Cities without records are absent.
pub fn spend_by_city(records: &[ExpenseRecord]) -> BTreeMap<City, Cents> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.city).or_insert(0) += record.amount_base;
    }
    totals
}

/// Total spend for a single category.
pub fn category_spend(records: &[ExpenseRecord], category: Category) -> Cents {
    records
        .iter()
        .filter(|record| record.category == category)
        .map(|record| record.amount_base)
        .sum()
}

/// Number of distinct dates with at least one record.
/// Days without entries inside the trip are not counted.
pub fn trip_day_count(records: &[ExpenseRecord]) -> usize {
    records
        .iter()
        .map(|record| record.date)
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn make_record(date: &str, city: City, category: Category, amount: Cents) -> ExpenseRecord {
        ExpenseRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            city,
            category,
            description: String::new(),
            amount_base: amount,
            note: String::new(),
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            make_record("2026-01-01", City::Hangzhou, Category::Dining, 8800),
            make_record("2026-01-01", City::InTransit, Category::VehicleEnergy, 4560),
            make_record("2026-01-02", City::Shenzhen, Category::Lodging, 45000),
            make_record("2026-01-03", City::HongKong, Category::Dining, 9200),
            make_record("2026-01-03", City::InTransit, Category::VehicleEnergy, 3125),
            make_record("2026-01-03", City::InTransit, Category::TollParking, 1500),
        ]
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(total_spend(&[]), 0);
        assert!(spend_by_category(&[]).is_empty());
        assert!(spend_by_city(&[]).is_empty());
        assert_eq!(category_spend(&[], Category::VehicleEnergy), 0);
        assert_eq!(trip_day_count(&[]), 0);
    }

    #[test]
    fn test_total_spend() {
        assert_eq!(total_spend(&sample()), 72185);
    }

    #[test]
    fn test_spend_by_category_omits_empty_categories() {
        let by_category = spend_by_category(&sample());

        assert_eq!(by_category.get(&Category::Dining), Some(&18000));
        assert_eq!(by_category.get(&Category::VehicleEnergy), Some(&7685));
        assert_eq!(by_category.get(&Category::Lodging), Some(&45000));
        assert_eq!(by_category.get(&Category::TollParking), Some(&1500));
        assert!(!by_category.contains_key(&Category::Shopping));
        assert_eq!(by_category.len(), 4);
    }

    #[test]
    fn test_spend_by_city() {
        let by_city = spend_by_city(&sample());

        assert_eq!(by_city.get(&City::Hangzhou), Some(&8800));
        assert_eq!(by_city.get(&City::Shenzhen), Some(&45000));
        assert_eq!(by_city.get(&City::HongKong), Some(&9200));
        assert_eq!(by_city.get(&City::InTransit), Some(&9185));
    }

    #[test]
    fn test_groupings_are_complete() {
        let records = sample();
        let total = total_spend(&records);

        assert_eq!(spend_by_category(&records).values().sum::<Cents>(), total);
        assert_eq!(spend_by_city(&records).values().sum::<Cents>(), total);
    }

    #[test]
    fn test_category_spend() {
        let records = sample();
        assert_eq!(category_spend(&records, Category::VehicleEnergy), 7685);
        assert_eq!(category_spend(&records, Category::Shopping), 0);
    }

    #[test]
    fn test_trip_day_count_counts_distinct_dates() {
        let records = vec![
            make_record("2026-01-01", City::Hangzhou, Category::Dining, 100),
            make_record("2026-01-01", City::Hangzhou, Category::Other, 100),
            make_record("2026-01-02", City::Shenzhen, Category::Dining, 100),
        ];
        assert_eq!(trip_day_count(&records), 2);
    }

    #[test]
    fn test_trip_day_count_ignores_gaps() {
        let records = vec![
            make_record("2026-01-01", City::Hangzhou, Category::Dining, 100),
            make_record("2026-01-10", City::HongKong, Category::Dining, 100),
        ];
        assert_eq!(trip_day_count(&records), 2);
    }

    #[test]
    fn test_aggregates_are_order_independent() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();
        let mut rotated = records.clone();
        rotated.rotate_left(2);

        for other in [&reversed, &rotated] {
            assert_eq!(total_spend(&records), total_spend(other));
            assert_eq!(spend_by_category(&records), spend_by_category(other));
            assert_eq!(spend_by_city(&records), spend_by_city(other));
            assert_eq!(trip_day_count(&records), trip_day_count(other));
        }
    }

    #[test]
    fn test_aggregates_are_idempotent() {
        let records = sample();
        assert_eq!(spend_by_category(&records), spend_by_category(&records));
        assert_eq!(trip_day_count(&records), trip_day_count(&records));
    }
}
