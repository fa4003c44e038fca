//! Output writers for the utilization table, forecasts and reports.

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::core::domain::UtilizationRow;
use crate::error::AnalyticsResult;
use crate::forecasting::series::{ForecastPoint, ForecastSeries};

/// Convert utilization rows to a Polars DataFrame.
pub fn utilization_dataframe(rows: &[UtilizationRow]) -> AnalyticsResult<DataFrame> {
    let n = rows.len();
    let mut room_ids = Vec::with_capacity(n);
    let mut day_names = Vec::with_capacity(n);
    let mut day_orders = Vec::with_capacity(n);
    let mut hours = Vec::with_capacity(n);
    let mut occupied = Vec::with_capacity(n);
    let mut rates = Vec::with_capacity(n);
    let mut peak_flags = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    let mut recommendations = Vec::with_capacity(n);
    let mut courses = Vec::with_capacity(n);
    let mut instructors = Vec::with_capacity(n);
    let mut departments = Vec::with_capacity(n);

    for row in rows {
        room_ids.push(row.room_id.clone());
        day_names.push(row.day_name.clone());
        day_orders.push(row.day_order as u32);
        hours.push(row.time_slot_hour as u32);
        occupied.push(row.occupied);
        rates.push(row.utilization_rate);
        peak_flags.push(row.peak_hour_flag.as_str().to_string());
        labels.push(row.classification_label.as_str().to_string());
        recommendations.push(row.recommendation.clone());
        courses.push(row.course_code.clone());
        instructors.push(row.instructor.clone());
        departments.push(row.department.clone());
    }

    let df = df!(
        "room_id" => room_ids,
        "day_name" => day_names,
        "day_order" => day_orders,
        "time_slot_hour" => hours,
        "occupied" => occupied,
        "utilization_rate" => rates,
        "peak_hour_flag" => peak_flags,
        "classification_label" => labels,
        "recommendation" => recommendations,
        "course_code" => courses,
        "instructor" => instructors,
        "department" => departments,
    )?;

    Ok(df)
}

/// Write the utilization table as CSV with a header row.
pub fn write_utilization_csv(rows: &[UtilizationRow], path: &Path) -> AnalyticsResult<()> {
    let mut df = utilization_dataframe(rows)?;
    let file = File::create(path)?;
    CsvWriter::new(BufWriter::new(file))
        .include_header(true)
        .finish(&mut df)?;
    info!("Wrote {} utilization rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> AnalyticsResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the forecast store as `room_id -> [point, ...]`.
pub fn write_forecast_store(
    store: &BTreeMap<String, ForecastSeries>,
    path: &Path,
) -> AnalyticsResult<()> {
    let by_room: BTreeMap<&str, &[ForecastPoint]> = store
        .iter()
        .map(|(room, series)| (room.as_str(), series.points()))
        .collect();
    write_json(&by_room, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{CapacityLabel, PeakHourFlag};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn row(room: &str, hour: u8, course: Option<&str>) -> UtilizationRow {
        UtilizationRow {
            room_id: room.to_string(),
            day_name: "Monday".to_string(),
            day_order: 1,
            time_slot_hour: hour,
            occupied: course.is_some(),
            utilization_rate: 0.5,
            peak_hour_flag: PeakHourFlag::Peak,
            classification_label: CapacityLabel::Optimal,
            recommendation: "Maintain current schedule.".to_string(),
            course_code: course.map(str::to_string),
            instructor: None,
            department: Some("CSE".to_string()),
        }
    }

    #[test]
    fn test_utilization_dataframe_columns() {
        let df = utilization_dataframe(&[row("101", 9, Some("CS101")), row("101", 10, None)]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 12);

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names[0], "room_id");
        assert_eq!(names[7], "classification_label");

        let courses = df.column("course_code").unwrap();
        assert_eq!(courses.null_count(), 1);
    }

    #[test]
    fn test_write_utilization_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utilization.csv");
        write_utilization_csv(&[row("101", 9, Some("CS101"))], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("room_id,day_name,day_order,time_slot_hour,occupied,utilization_rate,peak_hour_flag,classification_label,recommendation,course_code,instructor,department")
        );
        let data = lines.next().unwrap();
        assert!(data.starts_with("101,Monday,1,9,true,0.5,Peak,Optimal,"));
        assert!(data.contains("CS101"));
    }

    #[test]
    fn test_write_forecast_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forecasts.json");
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 4, 21).unwrap(),
            yhat: 0.5,
            yhat_lower: 0.25,
            yhat_upper: 0.75,
            is_history: true,
        };
        let mut store = BTreeMap::new();
        store.insert("101".to_string(), ForecastSeries::new("101", vec![point]).unwrap());

        write_forecast_store(&store, &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["101"][0]["date"], "2025-04-21");
        assert_eq!(json["101"][0]["yhat"], 0.5);
        assert_eq!(json["101"][0]["is_history"], true);
    }
}
