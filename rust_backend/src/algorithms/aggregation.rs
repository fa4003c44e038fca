//! Per-room, per-day utilization and the utilization table.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::algorithms::classification::{classify, recommend};
use crate::config::{ClassificationPolicy, PeakHourPolicy};
use crate::core::domain::{OccupancyRecord, PeakHourFlag, UtilizationMetric, UtilizationRow};

/// Peak-hour flag of a single slot.
pub fn peak_hour_flag(hour: u8, policy: &PeakHourPolicy) -> PeakHourFlag {
    if policy.is_peak(hour) {
        PeakHourFlag::Peak
    } else {
        PeakHourFlag::NonPeak
    }
}

/// Peak-hour flags aligned with `records`.
pub fn annotate_records(records: &[OccupancyRecord], policy: &PeakHourPolicy) -> Vec<PeakHourFlag> {
    records
        .iter()
        .map(|r| peak_hour_flag(r.time_slot_hour(), policy))
        .collect()
}

/// Compute utilization rates grouped by (room, day).
///
/// The rate of each group is `occupied / total` over the group's records.
/// Groups only exist for (room, day) pairs that occur in `records`, so the
/// denominator is never zero. The result is sorted by room and then by day
/// order.
pub fn aggregate_utilization(records: &[OccupancyRecord]) -> Vec<UtilizationMetric> {
    // (room, day_order, day_name) -> (occupied, total)
    let mut groups: BTreeMap<(&str, u8, &'static str), (usize, usize)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry((record.room_id(), record.day_order(), record.day_name()))
            .or_insert((0, 0));
        if record.occupied() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    let metrics: Vec<UtilizationMetric> = groups
        .into_iter()
        .map(|((room_id, day_order, day_name), (occupied, total))| UtilizationMetric {
            room_id: room_id.to_string(),
            day_name: day_name.to_string(),
            day_order,
            utilization_rate: occupied as f64 / total as f64,
            occupied_slots: occupied,
            total_slots: total,
        })
        .collect();

    debug!(
        "Aggregated {} records into {} room-day metrics",
        records.len(),
        metrics.len()
    );
    metrics
}

/// Join each record with its (room, day) rate, peak flag, label and
/// recommendation.
///
/// Records whose group is missing from `metrics` are skipped; this cannot
/// happen when `metrics` was produced by [`aggregate_utilization`] over the
/// same records.
pub fn build_utilization_table(
    records: &[OccupancyRecord],
    metrics: &[UtilizationMetric],
    classification: &ClassificationPolicy,
    peak_hours: &PeakHourPolicy,
) -> Vec<UtilizationRow> {
    let rates: HashMap<(&str, u8), f64> = metrics
        .iter()
        .map(|m| ((m.room_id.as_str(), m.day_order), m.utilization_rate))
        .collect();

    records
        .iter()
        .filter_map(|record| {
            let rate = *rates.get(&(record.room_id(), record.day_order()))?;
            let label = classify(rate, classification);
            Some(UtilizationRow {
                room_id: record.room_id().to_string(),
                day_name: record.day_name().to_string(),
                day_order: record.day_order(),
                time_slot_hour: record.time_slot_hour(),
                occupied: record.occupied(),
                utilization_rate: rate,
                peak_hour_flag: peak_hour_flag(record.time_slot_hour(), peak_hours),
                classification_label: label,
                recommendation: recommend(label).to_string(),
                course_code: record.course_code().map(str::to_string),
                instructor: record.instructor().map(str::to_string),
                department: record.department().map(str::to_string),
            })
        })
        .collect()
}
