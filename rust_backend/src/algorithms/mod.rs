//! Utilization analytics.
//!
//! # Components
//!
//! - [`aggregation`]: Per-room, per-day utilization rates, peak-hour flags and
//!   the utilization table
//! - [`classification`]: Capacity labels and the fixed recommendation for each
//!
//! # Example
//!
//! ```
//! use classroom_analytics::algorithms::aggregate_utilization;
//! use classroom_analytics::core::domain::{OccupancyRecord, Weekday};
//!
//! let records = vec![
//!     OccupancyRecord::new("101", Weekday::Monday, 9, true, None, None),
//!     OccupancyRecord::new("101", Weekday::Monday, 10, false, None, None),
//! ];
//! let metrics = aggregate_utilization(&records);
//! assert_eq!(metrics[0].utilization_rate, 0.5);
//! ```

pub mod aggregation;
pub mod classification;

pub use aggregation::{aggregate_utilization, annotate_records, build_utilization_table, peak_hour_flag};
pub use classification::{
    classify, recommend, RECOMMEND_ADD_CLASSES, RECOMMEND_MAINTAIN, RECOMMEND_REDISTRIBUTE,
};
