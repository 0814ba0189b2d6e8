mod common;

use anyhow::Result;
use common::{cny, test_service, SampleTrip};
use tripledger::domain::{Category, Cents, City};

#[tokio::test]
async fn test_empty_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let summary = service.get_summary().await?;

    assert_eq!(summary.total_spend, 0);
    assert!(summary.spend_by_category.is_empty());
    assert!(summary.spend_by_city.is_empty());
    assert_eq!(summary.vehicle_energy_spend, 0);
    assert_eq!(summary.trip_day_count, 0);
    assert!(summary.records.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sample_trip_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleTrip::record(&service).await?;

    let summary = service.get_summary().await?;

    // 88 + 45.60 + 215 + 450 + 920 + 92
    assert_eq!(summary.total_spend, 181060);
    assert_eq!(summary.trip_day_count, 3);
    assert_eq!(summary.vehicle_energy_spend, 4560);
    assert_eq!(summary.records.len(), 6);

    assert_eq!(summary.spend_by_category.get(&Category::Dining), Some(&18000));
    assert_eq!(summary.spend_by_category.get(&Category::Shopping), Some(&92000));
    assert_eq!(summary.spend_by_category.get(&Category::Lodging), Some(&45000));
    assert!(!summary.spend_by_category.contains_key(&Category::Sightseeing));

    assert_eq!(summary.spend_by_city.get(&City::HongKong), Some(&101200));
    assert_eq!(summary.spend_by_city.get(&City::InTransit), Some(&26060));
    Ok(())
}

#[tokio::test]
async fn test_breakdowns_add_up_to_total() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleTrip::record(&service).await?;

    let summary = service.get_summary().await?;

    let by_category: Cents = summary.spend_by_category.values().sum();
    let by_city: Cents = summary.spend_by_city.values().sum();
    assert_eq!(by_category, summary.total_spend);
    assert_eq!(by_city, summary.total_spend);
    Ok(())
}

#[tokio::test]
async fn test_same_day_entries_count_as_one_trip_day() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .submit_entry(cny("2026-01-01", "hangzhou", "dining", "10"))
        .await?;
    service
        .submit_entry(cny("2026-01-02", "shenzhen", "dining", "10"))
        .await?;
    service
        .submit_entry(cny("2026-01-01", "hangzhou", "shopping", "10"))
        .await?;

    assert_eq!(service.get_summary().await?.trip_day_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_summary_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleTrip::record(&service).await?;

    let first = service.get_summary().await?;
    let second = service.get_summary().await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_summary_reflects_new_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleTrip::record(&service).await?;
    let before = service.get_summary().await?;

    service
        .submit_entry(cny("2026-02-02", "hangzhou", "vehicle-energy", "30"))
        .await?;
    let after = service.get_summary().await?;

    assert_eq!(after.total_spend, before.total_spend + 3000);
    assert_eq!(after.vehicle_energy_spend, before.vehicle_energy_spend + 3000);
    assert_eq!(after.trip_day_count, before.trip_day_count + 1);
    assert_eq!(after.records.len(), before.records.len() + 1);
    Ok(())
}
