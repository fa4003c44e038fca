use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::{OccupancyRecord, Weekday};

/// Department / day / room selection applied to records before aggregation.
///
/// An empty set places no restriction on its field. A record without a
/// department only passes when no departments are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub departments: BTreeSet<String>,
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    #[serde(default)]
    pub rooms: BTreeSet<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_days<I: IntoIterator<Item = Weekday>>(mut self, days: I) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    pub fn with_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rooms = rooms.into_iter().map(Into::into).collect();
        self
    }

    /// True when the filter lets every record through.
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.days.is_empty() && self.rooms.is_empty()
    }

    pub fn matches(&self, record: &OccupancyRecord) -> bool {
        let department_ok = self.departments.is_empty()
            || record
                .department()
                .map(|d| self.departments.contains(d))
                .unwrap_or(false);
        let day_ok = self.days.is_empty() || self.days.contains(&record.day());
        let room_ok = self.rooms.is_empty() || self.rooms.contains(record.room_id());

        department_ok && day_ok && room_ok
    }
}

/// Records accepted by `filter`, in input order.
pub fn filter_records(records: &[OccupancyRecord], filter: &RecordFilter) -> Vec<OccupancyRecord> {
    if filter.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}
