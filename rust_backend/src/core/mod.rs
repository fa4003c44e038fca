//! Core domain models for classroom utilization analytics.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: occupancy records, weekdays, utilization metrics and capacity labels.

pub mod domain;

pub use domain::{
    CapacityLabel, OccupancyRecord, PeakHourFlag, UtilizationMetric, UtilizationRow, Weekday,
};
