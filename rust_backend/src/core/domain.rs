//! Domain models for classroom occupancy and utilization.
//!
//! This module provides the core data structures that flow through the
//! analytics pipeline: normalized occupancy records, per-day utilization
//! metrics, capacity labels and the rows of the utilization table handed to
//! the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Teaching day of the week.
///
/// Only Monday through Friday are recognised; the ordinal (`order`) is the
/// sort key used for charting and for assigning synthetic forecast dates.
///
/// # Examples
///
/// ```
/// use classroom_analytics::core::domain::Weekday;
///
/// assert_eq!(Weekday::Monday.order(), 1);
/// assert_eq!(Weekday::from_name("Friday"), Some(Weekday::Friday));
/// assert_eq!(Weekday::from_name("Saturday"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching days in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Ordinal of the day, Monday = 1 through Friday = 5.
    pub fn order(self) -> u8 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
        }
    }

    /// Canonical day name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// Looks up a day by its exact name. Surrounding whitespace is ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|day| day.name() == name)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One normalized observation of a room in a single hourly slot.
///
/// Records are immutable once built. The constructor enforces that an
/// unoccupied slot never carries a course code or instructor, so downstream
/// consumers can rely on `occupied == false` implying both are `None`.
/// Deserialization goes through the same constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct OccupancyRecord {
    room_id: String,
    day: Weekday,
    time_slot_hour: u8,
    occupied: bool,
    course_code: Option<String>,
    instructor: Option<String>,
    department: Option<String>,
}

impl OccupancyRecord {
    /// Creates a record, clearing course and instructor labels on empty slots.
    ///
    /// Blank labels (empty or whitespace-only) are stored as `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use classroom_analytics::core::domain::{OccupancyRecord, Weekday};
    ///
    /// let record = OccupancyRecord::new(
    ///     "101",
    ///     Weekday::Monday,
    ///     9,
    ///     false,
    ///     Some("CS101".to_string()),
    ///     Some("Dr. Rao".to_string()),
    /// );
    /// assert!(record.course_code().is_none());
    /// assert!(record.instructor().is_none());
    /// ```
    pub fn new(
        room_id: impl Into<String>,
        day: Weekday,
        time_slot_hour: u8,
        occupied: bool,
        course_code: Option<String>,
        instructor: Option<String>,
    ) -> Self {
        debug_assert!(time_slot_hour < 24, "hour out of range: {}", time_slot_hour);
        let (course_code, instructor) = if occupied {
            (non_blank(course_code), non_blank(instructor))
        } else {
            (None, None)
        };
        Self {
            room_id: room_id.into(),
            day,
            time_slot_hour,
            occupied,
            course_code,
            instructor,
            department: None,
        }
    }

    /// Attaches the owning department. Departments are kept on empty slots.
    pub fn with_department(mut self, department: Option<String>) -> Self {
        self.department = non_blank(department);
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn day_name(&self) -> &'static str {
        self.day.name()
    }

    pub fn day_order(&self) -> u8 {
        self.day.order()
    }

    /// Hour of day on the 24h clock.
    pub fn time_slot_hour(&self) -> u8 {
        self.time_slot_hour
    }

    pub fn occupied(&self) -> bool {
        self.occupied
    }

    pub fn course_code(&self) -> Option<&str> {
        self.course_code.as_deref()
    }

    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }
}

/// Serialized shape of an [`OccupancyRecord`], validated on the way in.
#[derive(Deserialize)]
struct StoredRecord {
    room_id: String,
    day: Weekday,
    time_slot_hour: u8,
    occupied: bool,
    #[serde(default)]
    course_code: Option<String>,
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

impl TryFrom<StoredRecord> for OccupancyRecord {
    type Error = String;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        if stored.time_slot_hour > 23 {
            return Err(format!("hour out of range: {}", stored.time_slot_hour));
        }
        if stored.room_id.trim().is_empty() {
            return Err("empty room identifier".to_string());
        }
        Ok(OccupancyRecord::new(
            stored.room_id,
            stored.day,
            stored.time_slot_hour,
            stored.occupied,
            stored.course_code,
            stored.instructor,
        )
        .with_department(stored.department))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Peak-hour annotation of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeakHourFlag {
    #[serde(rename = "Peak")]
    Peak,
    #[serde(rename = "Non-Peak")]
    NonPeak,
}

impl PeakHourFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            PeakHourFlag::Peak => "Peak",
            PeakHourFlag::NonPeak => "Non-Peak",
        }
    }
}

impl fmt::Display for PeakHourFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Utilization of one room on one day.
///
/// `utilization_rate` is `occupied_slots / total_slots`, the mean of the
/// occupancy flag over every record of the (room, day) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationMetric {
    pub room_id: String,
    pub day_name: String,
    pub day_order: u8,
    pub utilization_rate: f64,
    pub occupied_slots: usize,
    pub total_slots: usize,
}

/// Three-state capacity classification of a utilization rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapacityLabel {
    Underutilized,
    Optimal,
    Overutilized,
}

impl CapacityLabel {
    pub const ALL: [CapacityLabel; 3] = [
        CapacityLabel::Underutilized,
        CapacityLabel::Optimal,
        CapacityLabel::Overutilized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CapacityLabel::Underutilized => "Underutilized",
            CapacityLabel::Optimal => "Optimal",
            CapacityLabel::Overutilized => "Overutilized",
        }
    }
}

impl fmt::Display for CapacityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the utilization table consumed by the presentation layer.
///
/// There is one row per normalized record: the per-day rate, label and
/// recommendation of the record's (room, day) group are repeated on each of
/// its slots, next to the slot's own peak flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRow {
    pub room_id: String,
    pub day_name: String,
    pub day_order: u8,
    pub time_slot_hour: u8,
    pub occupied: bool,
    pub utilization_rate: f64,
    pub peak_hour_flag: PeakHourFlag,
    pub classification_label: CapacityLabel,
    pub recommendation: String,
    pub course_code: Option<String>,
    pub instructor: Option<String>,
    pub department: Option<String>,
}
