//! Input loading and output writing.
//!
//! Loaders combine CSV parsing with normalization and report a checksum of
//! the input; [`LoaderCache`] memoizes loads for callers that re-run the
//! pipeline on the same file. Writers emit the utilization table as CSV and
//! the forecast store and reports as JSON.
//!
//! # Example
//!
//! ```no_run
//! use classroom_analytics::config::{ColumnMapping, NormalizationMode};
//! use classroom_analytics::io::OccupancyLoader;
//! use std::path::Path;
//!
//! let loaded = OccupancyLoader::load_from_file(
//!     Path::new("occupancy.csv"),
//!     &ColumnMapping::default(),
//!     NormalizationMode::Lenient,
//! )
//! .expect("Failed to load");
//! println!("Loaded {} records", loaded.records.len());
//! ```

pub mod checksum;
pub mod loaders;
pub mod writers;


pub use checksum::calculate_checksum;
pub use loaders::{LoadedOccupancy, LoaderCache, OccupancyLoader};
pub use writers::{utilization_dataframe, write_forecast_store, write_json, write_utilization_csv};
