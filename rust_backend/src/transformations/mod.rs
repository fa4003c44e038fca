//! Record selection applied before aggregation.
//!
//! # Modules
//!
//! - [`filtering`]: Filter normalized records by department, day and room
//!
//! # Example
//!
//! ```
//! use classroom_analytics::core::domain::{OccupancyRecord, Weekday};
//! use classroom_analytics::transformations::{filter_records, RecordFilter};
//!
//! let records = vec![
//!     OccupancyRecord::new("101", Weekday::Monday, 9, true, None, None),
//!     OccupancyRecord::new("101", Weekday::Friday, 9, true, None, None),
//! ];
//! let filter = RecordFilter::new().with_days([Weekday::Friday]);
//! assert_eq!(filter_records(&records, &filter).len(), 1);
//! ```

pub mod filtering;

pub use filtering::{filter_records, RecordFilter};
