//! End-to-end tests for the utilization pipeline.
//!
//! These tests run the full load → normalize → aggregate → classify →
//! forecast chain on small in-memory tables and check the output contract.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use classroom_analytics::config::{AnalyticsConfig, NormalizationMode};
use classroom_analytics::forecasting::{RoomForecastOutcome, SkipReason};
use classroom_analytics::{AnalyticsError, AnalyticsPipeline, CapacityLabel, LoaderCache};
use tempfile::{tempdir, NamedTempFile};

const HEADER: &str = "Room_Number,Department,Day,Time Slot,Course Code,Faculty,Occupied_Binary\n";

/// Room 101: Monday 1 of 2 slots, Tuesday 2 of 2. Room 202: Wednesday only.
fn sample_csv() -> String {
    format!(
        "{}\
         101,CSE,Monday,9 AM,CS101,Dr. Rao,1\n\
         101,CSE,Monday,10 AM,CS101,Dr. Rao,0\n\
         101,CSE,Tuesday,9 AM,CS102,Dr. Sen,1\n\
         101,CSE,Tuesday,2 PM,CS103,Dr. Sen,1\n\
         202,ECE,Wednesday,11 AM,EC201,Dr. Iyer,1\n\
         202,ECE,Wednesday,3 PM,,,0\n",
        HEADER
    )
}

fn default_pipeline() -> AnalyticsPipeline {
    AnalyticsPipeline::new(AnalyticsConfig::default()).unwrap()
}

fn lenient_config() -> AnalyticsConfig {
    let mut config = AnalyticsConfig::default();
    config.normalization.mode = NormalizationMode::Lenient;
    config
}

#[test]
fn test_room_101_rates_labels_and_recommendations() {
    let output = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();

    let monday = output
        .metrics
        .iter()
        .find(|m| m.room_id == "101" && m.day_name == "Monday")
        .unwrap();
    assert_eq!(monday.utilization_rate, 0.5);

    let tuesday = output
        .metrics
        .iter()
        .find(|m| m.room_id == "101" && m.day_name == "Tuesday")
        .unwrap();
    assert_eq!(tuesday.utilization_rate, 1.0);

    for row in output.utilization_table.iter().filter(|r| r.room_id == "101") {
        match row.day_name.as_str() {
            "Monday" => {
                assert_eq!(row.classification_label, CapacityLabel::Optimal);
                assert_eq!(row.recommendation, "Maintain current schedule.");
            }
            "Tuesday" => {
                assert_eq!(row.classification_label, CapacityLabel::Overutilized);
                assert_eq!(row.recommendation, "Redistribute classes to underutilized rooms.");
            }
            other => panic!("unexpected day {}", other),
        }
    }
}

#[test]
fn test_unoccupied_rows_carry_no_course() {
    let output = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();
    let row = output
        .utilization_table
        .iter()
        .find(|r| r.room_id == "101" && r.time_slot_hour == 10)
        .unwrap();
    assert!(!row.occupied);
    assert_eq!(row.course_code, None);
    assert_eq!(row.instructor, None);
}

#[test]
fn test_single_day_room_is_skipped_not_forecast() {
    let output = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();

    let store = output.forecasts.store();
    assert!(store.contains_key("101"));
    assert!(!store.contains_key("202"));

    match output.forecasts.outcome("202") {
        Some(RoomForecastOutcome::Skipped(SkipReason::InsufficientData { observed, required })) => {
            assert_eq!(*observed, 1);
            assert_eq!(*required, 2);
        }
        other => panic!("expected InsufficientData for 202, got {:?}", other),
    }

    let report = output.run_report();
    assert_eq!(report.skipped_rooms.len(), 1);
    assert_eq!(report.skipped_rooms[0].room_id, "202");
}

#[test]
fn test_forecast_covers_history_and_horizon() {
    let output = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();
    let series = output.forecasts.series("101").unwrap();

    let anchor = AnalyticsConfig::default().forecast.anchor_date;
    assert_eq!(series.points().len(), 2 + 5);
    assert_eq!(series.points()[0].date, anchor);
    assert_eq!(series.horizon().count(), 5);
    for point in series.points() {
        assert!(point.yhat_lower <= point.yhat && point.yhat <= point.yhat_upper);
    }
}

#[test]
fn test_runs_are_deterministic() {
    let a = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();
    let b = default_pipeline().process_bytes(sample_csv().as_bytes()).unwrap();

    assert_eq!(a.utilization_table, b.utilization_table);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.forecasts.store(), b.forecasts.store());
    assert_eq!(a.checksum, b.checksum);
}

#[test]
fn test_strict_mode_fails_on_bad_row() {
    let csv = format!("{}101,CSE,Monday,9 AM,CS101,Dr. Rao,1\n101,CSE,Monday,nine,,,0\n", HEADER);
    let err = default_pipeline().process_bytes(csv.as_bytes()).unwrap_err();
    match err {
        AnalyticsError::MalformedTimeSlot { row, value } => {
            assert_eq!(row, 1);
            assert_eq!(value, "nine");
        }
        other => panic!("expected MalformedTimeSlot, got {:?}", other),
    }
}

#[test]
fn test_lenient_mode_reports_dropped_rows() {
    let csv = format!(
        "{}101,CSE,Monday,9 AM,CS101,Dr. Rao,1\n101,CSE,Funday,9 AM,,,0\n101,CSE,Tuesday,9 AM,,,maybe\n101,CSE,Tuesday,10 AM,,,0\n",
        HEADER
    );
    let pipeline = AnalyticsPipeline::new(lenient_config()).unwrap();
    let output = pipeline.process_bytes(csv.as_bytes()).unwrap();

    assert_eq!(output.records.len(), 2);
    let report = output.run_report();
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.accepted_rows, 2);
    let rejected: Vec<(usize, &str)> = report
        .rejected
        .iter()
        .map(|r| (r.row, r.kind.as_str()))
        .collect();
    assert_eq!(rejected, vec![(1, "UnknownDay"), (2, "MalformedOccupancy")]);
}

#[test]
fn test_missing_column_is_schema_error() {
    let csv = "Room_Number,Department,Time Slot,Occupied_Binary\n101,CSE,9 AM,1\n";
    let err = default_pipeline().process_bytes(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, AnalyticsError::SchemaError { field: "day", .. }));
}

#[test]
fn test_cache_shares_identical_input() {
    let cache = Arc::new(LoaderCache::new());
    let pipeline = default_pipeline().with_cache(Arc::clone(&cache));

    let first = pipeline.load_bytes(sample_csv().as_bytes()).unwrap();
    let second = pipeline.load_bytes(sample_csv().as_bytes()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let changed = sample_csv().replace("202,ECE,Wednesday,3 PM,,,0", "202,ECE,Wednesday,3 PM,EC202,Dr. Iyer,1");
    let third = pipeline.load_bytes(changed.as_bytes()).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_process_file_and_write_outputs() {
    let mut input = NamedTempFile::new().unwrap();
    write!(input, "{}", sample_csv()).unwrap();
    let out_dir = tempdir().unwrap();

    let output = default_pipeline().process_file(input.path()).unwrap();
    output.write_to_dir(out_dir.path()).unwrap();

    let csv = fs::read_to_string(out_dir.path().join("utilization.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + 6);

    let forecasts: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.path().join("forecasts.json")).unwrap())
            .unwrap();
    assert!(forecasts.get("101").is_some());
    assert!(forecasts.get("202").is_none());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.path().join("run_report.json")).unwrap())
            .unwrap();
    assert_eq!(report["skipped_rooms"][0]["reason"], "InsufficientData");

    assert!(out_dir.path().join("insights.json").exists());
}

#[test]
fn test_raw_sheet_headers_are_accepted() {
    let csv = "Room No,Day,Time Slot,Is_Occupied\n\
               A1,Monday,12 PM,Yes\n\
               A1,Monday,1 PM,No\n\
               A1,Thursday,12 AM,Yes\n";
    let output = default_pipeline().process_bytes(csv.as_bytes()).unwrap();

    let hours: Vec<u8> = output.records.iter().map(|r| r.time_slot_hour()).collect();
    // 12 PM stays 12, 1 PM becomes 13, 12 AM is kept as 12.
    assert_eq!(hours, vec![12, 13, 12]);
    assert_eq!(output.metrics.len(), 2);
}

#[test]
fn test_blank_occupancy_cell_is_rejected_not_counted() {
    let csv = "Room_Number,Day,Time Slot,Occupied_Binary\n\
               101,Monday,9 AM,1\n\
               101,Monday,10 AM,\n";

    let err = default_pipeline().process_bytes(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, AnalyticsError::MalformedOccupancy { row: 1, .. }));

    let pipeline = AnalyticsPipeline::new(lenient_config()).unwrap();
    let output = pipeline.process_bytes(csv.as_bytes()).unwrap();

    let monday = &output.metrics[0];
    assert_eq!(monday.total_slots, 1);
    assert_eq!(monday.utilization_rate, 1.0);

    let report = output.run_report();
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].row, 1);
    assert_eq!(report.rejected[0].kind, "MalformedOccupancy");
}
