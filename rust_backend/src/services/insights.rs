//! Summary tables derived from records and the utilization table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::algorithms::aggregation::peak_hour_flag;
use crate::config::{InsightsSettings, PeakHourPolicy};
use crate::core::domain::{CapacityLabel, OccupancyRecord, PeakHourFlag, UtilizationRow};

/// Mean occupancy of one (hour, department, peak flag) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotUtilization {
    pub hour: u8,
    pub department: Option<String>,
    pub peak_hour_flag: PeakHourFlag,
    pub utilization_rate: f64,
    pub slot_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCount {
    pub course_code: String,
    pub count: usize,
}

/// Number of utilization rows per capacity label for one room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityDistribution {
    pub room_id: String,
    pub underutilized: usize,
    pub optimal: usize,
    pub overutilized: usize,
}

impl CapacityDistribution {
    pub fn count(&self, label: CapacityLabel) -> usize {
        match label {
            CapacityLabel::Underutilized => self.underutilized,
            CapacityLabel::Optimal => self.optimal,
            CapacityLabel::Overutilized => self.overutilized,
        }
    }

    pub fn total(&self) -> usize {
        self.underutilized + self.optimal + self.overutilized
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub room_id: String,
    pub classification_label: CapacityLabel,
    pub recommendation: String,
    pub count: usize,
}

/// All summary tables of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub time_slots: Vec<TimeSlotUtilization>,
    pub top_courses: Vec<CourseCount>,
    pub capacity: Vec<CapacityDistribution>,
    pub recommendations: Vec<RecommendationSummary>,
}

/// Mean occupancy per (hour, department, peak flag), sorted by those keys.
pub fn time_slot_utilization(
    records: &[OccupancyRecord],
    policy: &PeakHourPolicy,
) -> Vec<TimeSlotUtilization> {
    // (hour, department) -> (occupied, total)
    let mut groups: HashMap<(u8, Option<&str>), (usize, usize)> = HashMap::new();

    for record in records {
        let entry = groups
            .entry((record.time_slot_hour(), record.department()))
            .or_insert((0, 0));
        if record.occupied() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    let mut slots: Vec<TimeSlotUtilization> = groups
        .into_iter()
        .map(|((hour, department), (occupied, total))| TimeSlotUtilization {
            hour,
            department: department.map(str::to_string),
            peak_hour_flag: peak_hour_flag(hour, policy),
            utilization_rate: occupied as f64 / total as f64,
            slot_count: total,
        })
        .collect();

    slots.sort_by(|a, b| {
        (a.hour, &a.department, a.peak_hour_flag).cmp(&(b.hour, &b.department, b.peak_hour_flag))
    });
    slots
}

/// Most frequent course codes among occupied slots.
///
/// Sorted by descending count, ties broken by course code, truncated to
/// `top_n`.
pub fn course_distribution(records: &[OccupancyRecord], top_n: usize) -> Vec<CourseCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for course in records
        .iter()
        .filter(|r| r.occupied())
        .filter_map(OccupancyRecord::course_code)
    {
        *counts.entry(course).or_insert(0) += 1;
    }

    let mut courses: Vec<CourseCount> = counts
        .into_iter()
        .map(|(course_code, count)| CourseCount {
            course_code: course_code.to_string(),
            count,
        })
        .collect();

    courses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.course_code.cmp(&b.course_code)));
    courses.truncate(top_n);
    courses
}

/// Per-room label counts over the utilization table, zero-filled.
pub fn capacity_distribution(rows: &[UtilizationRow]) -> Vec<CapacityDistribution> {
    let mut by_room: BTreeMap<&str, CapacityDistribution> = BTreeMap::new();

    for row in rows {
        let entry = by_room
            .entry(row.room_id.as_str())
            .or_insert_with(|| CapacityDistribution {
                room_id: row.room_id.clone(),
                ..Default::default()
            });
        match row.classification_label {
            CapacityLabel::Underutilized => entry.underutilized += 1,
            CapacityLabel::Optimal => entry.optimal += 1,
            CapacityLabel::Overutilized => entry.overutilized += 1,
        }
    }

    by_room.into_values().collect()
}

/// Distinct (room, label, recommendation) triples with their row counts.
pub fn recommendation_summary(rows: &[UtilizationRow]) -> Vec<RecommendationSummary> {
    let mut groups: BTreeMap<(&str, CapacityLabel, &str), usize> = BTreeMap::new();
    for row in rows {
        *groups
            .entry((
                row.room_id.as_str(),
                row.classification_label,
                row.recommendation.as_str(),
            ))
            .or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((room_id, label, recommendation), count)| RecommendationSummary {
            room_id: room_id.to_string(),
            classification_label: label,
            recommendation: recommendation.to_string(),
            count,
        })
        .collect()
}

pub fn compute_insights(
    records: &[OccupancyRecord],
    rows: &[UtilizationRow],
    peak_hours: &PeakHourPolicy,
    settings: &InsightsSettings,
) -> InsightsSummary {
    InsightsSummary {
        time_slots: time_slot_utilization(records, peak_hours),
        top_courses: course_distribution(records, settings.top_courses),
        capacity: capacity_distribution(rows),
        recommendations: recommendation_summary(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{aggregate_utilization, build_utilization_table};
    use crate::config::ClassificationPolicy;
    use crate::core::domain::Weekday;

    fn record(
        room: &str,
        day: Weekday,
        hour: u8,
        course: Option<&str>,
        department: &str,
    ) -> OccupancyRecord {
        OccupancyRecord::new(room, day, hour, course.is_some(), course.map(str::to_string), None)
            .with_department(Some(department.to_string()))
    }

    fn sample() -> Vec<OccupancyRecord> {
        vec![
            record("101", Weekday::Monday, 9, Some("CS101"), "CSE"),
            record("101", Weekday::Monday, 10, None, "CSE"),
            record("101", Weekday::Tuesday, 9, Some("CS101"), "CSE"),
            record("101", Weekday::Tuesday, 10, Some("CS102"), "CSE"),
            record("202", Weekday::Monday, 9, None, "ECE"),
            record("202", Weekday::Monday, 14, Some("EC201"), "ECE"),
        ]
    }

    fn rows(records: &[OccupancyRecord]) -> Vec<UtilizationRow> {
        let metrics = aggregate_utilization(records);
        build_utilization_table(
            records,
            &metrics,
            &ClassificationPolicy::default(),
            &PeakHourPolicy::default(),
        )
    }

    #[test]
    fn test_time_slot_utilization() {
        let slots = time_slot_utilization(&sample(), &PeakHourPolicy::default());

        let cse_nine = slots
            .iter()
            .find(|s| s.hour == 9 && s.department.as_deref() == Some("CSE"))
            .unwrap();
        assert_eq!(cse_nine.utilization_rate, 1.0);
        assert_eq!(cse_nine.slot_count, 2);
        assert_eq!(cse_nine.peak_hour_flag, PeakHourFlag::Peak);

        let ece_two = slots.iter().find(|s| s.hour == 14).unwrap();
        assert_eq!(ece_two.peak_hour_flag, PeakHourFlag::NonPeak);

        let hours: Vec<u8> = slots.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![9, 9, 10, 14]);
    }

    #[test]
    fn test_course_distribution_orders_and_truncates() {
        let courses = course_distribution(&sample(), 2);
        assert_eq!(
            courses,
            vec![
                CourseCount {
                    course_code: "CS101".to_string(),
                    count: 2
                },
                CourseCount {
                    course_code: "CS102".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_capacity_distribution_is_zero_filled() {
        let distribution = capacity_distribution(&rows(&sample()));
        assert_eq!(distribution.len(), 2);

        // 101: Monday 0.5 (2 rows Optimal), Tuesday 1.0 (2 rows Overutilized)
        let room_101 = &distribution[0];
        assert_eq!(room_101.room_id, "101");
        assert_eq!(room_101.count(CapacityLabel::Optimal), 2);
        assert_eq!(room_101.count(CapacityLabel::Overutilized), 2);
        assert_eq!(room_101.count(CapacityLabel::Underutilized), 0);
        assert_eq!(room_101.total(), 4);
    }

    #[test]
    fn test_recommendation_summary() {
        let summary = recommendation_summary(&rows(&sample()));
        let room_101: Vec<&RecommendationSummary> =
            summary.iter().filter(|s| s.room_id == "101").collect();

        assert_eq!(room_101.len(), 2);
        assert_eq!(room_101[0].classification_label, CapacityLabel::Optimal);
        assert_eq!(room_101[0].recommendation, "Maintain current schedule.");
        assert_eq!(room_101[0].count, 2);
        assert_eq!(room_101[1].classification_label, CapacityLabel::Overutilized);
    }

    #[test]
    fn test_compute_insights_uses_top_courses_setting() {
        let records = sample();
        let summary = compute_insights(
            &records,
            &rows(&records),
            &PeakHourPolicy::default(),
            &InsightsSettings { top_courses: 1 },
        );
        assert_eq!(summary.top_courses.len(), 1);
        assert_eq!(summary.capacity.len(), 2);
    }
}
