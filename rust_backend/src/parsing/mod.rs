//! Parsers for classroom occupancy input.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Read the occupancy table with Polars and resolve its columns
//! - [`fields`]: Parse time-slot labels, day names and occupancy indicators
//!
//! # Example
//!
//! ```no_run
//! use classroom_analytics::config::ColumnMapping;
//! use classroom_analytics::parsing::csv_parser::parse_occupancy_csv_to_rows;
//! use std::path::Path;
//!
//! let rows = parse_occupancy_csv_to_rows(Path::new("class_utilization.csv"), &ColumnMapping::default())
//!     .expect("Failed to parse occupancy table");
//! ```

pub mod csv_parser;
pub mod fields;

#[cfg(test)]
mod csv_parser_tests;

pub use csv_parser::{RawOccupancyRow, ResolvedColumns};
pub use fields::{parse_occupancy, parse_time_slot_hour, parse_weekday, FieldIssue};
