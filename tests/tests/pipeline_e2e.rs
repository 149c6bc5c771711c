//! End-to-end pipeline tests: page extraction → transformation →
//! persistence → fallback reload, without a network in the loop.

use integration_tests::fixtures;

use innews_client::extract;
use snapshot_store::{SnapshotConfig, SnapshotStore};
use stats_core::{transform_daily, transform_three_day, transform_total, transform_weekly, Snapshot};

fn store_in(dir: &tempfile::TempDir) -> SnapshotStore {
    SnapshotStore::new(SnapshotConfig {
        data_dir: dir.path().to_path_buf(),
    })
}

#[test]
fn test_extracts_and_derives_from_page() {
    let bundle = extract(&fixtures::sample_page()).unwrap();

    assert_eq!(bundle.daily.len(), 4);
    assert_eq!(bundle.weekly.len(), 1);
    assert_eq!(bundle.three_day.len(), 1);

    let daily = transform_daily(&bundle.daily);

    // Cumulative sums in date order
    let cumsums: Vec<i64> = daily.iter().map(|r| r.calculated_cases_cumsum).collect();
    assert_eq!(cumsums, vec![10, 30, 45, 75]);
    let deceased: Vec<i64> = daily.iter().map(|r| r.calculated_deceased_cumsum).collect();
    assert_eq!(deceased, vec![1, 3, 4, 7]);

    // PCR totals 100,150,120,200 → deltas 100,50,-30,80 → corrected
    let pcr: Vec<i64> = daily.iter().map(|r| r.calculated_tests_pcr).collect();
    assert_eq!(pcr, vec![100, 50, 50, 80]);

    // Rapid totals 0,40,90,150 have no corrections
    let rapid: Vec<i64> = daily.iter().map(|r| r.calculated_tests_rapid).collect();
    assert_eq!(rapid, vec![0, 40, 50, 60]);

    // Day 1: 10 cases / 100 tests
    assert!((daily[0].calculated_positivity - 10.0).abs() < 1e-9);
    // Day 1: 1 deceased / 10 cases
    assert!((daily[0].calculated_fatality - 10.0).abs() < 1e-9);

    let total = transform_total(&bundle.total).unwrap();
    // `id` housekeeping key dropped, eight breakdown rows remain
    assert_eq!(total.len(), 8);
    let male_18_39 = total
        .iter()
        .find(|r| r.category == "cases" && r.age == "18_39" && r.gender == "male")
        .unwrap();
    assert_eq!(male_18_39.value, 1500);
    // Aggregate row without an age segment
    let intubated_female = total
        .iter()
        .find(|r| r.category == "intubated" && r.gender == "female")
        .unwrap();
    assert_eq!(intubated_female.age, "");
}

#[test]
fn test_persisted_tables_reload_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let bundle = extract(&fixtures::sample_page()).unwrap();
    let snapshot = Snapshot {
        daily: transform_daily(&bundle.daily),
        three_day: transform_three_day(bundle.three_day),
        weekly: transform_weekly(bundle.weekly),
        total: transform_total(&bundle.total).unwrap(),
    };

    store.write_daily(&snapshot.daily).unwrap();
    store.write_three_day(&snapshot.three_day).unwrap();
    store.write_weekly(&snapshot.weekly).unwrap();
    store.write_total(&snapshot.total).unwrap();

    let reloaded = store.load().unwrap();

    assert_eq!(reloaded.daily.len(), snapshot.daily.len());
    for (a, b) in reloaded.daily.iter().zip(&snapshot.daily) {
        assert_eq!(a.date, b.date);
        assert_eq!(a.cases, b.cases);
        assert_eq!(a.calculated_cases_cumsum, b.calculated_cases_cumsum);
        assert_eq!(a.calculated_tests_total, b.calculated_tests_total);
        assert!((a.calculated_positivity - b.calculated_positivity).abs() < 1e-9);
        assert!((a.calculated_fatality - b.calculated_fatality).abs() < 1e-9);
    }
    assert_eq!(reloaded.three_day, snapshot.three_day);
    assert_eq!(reloaded.weekly, snapshot.weekly);
    assert_eq!(reloaded.total, snapshot.total);
}
