//! Classroom utilization analytics and forecasting.
//!
//! Raw per-slot occupancy rows are normalized into [`OccupancyRecord`]s,
//! reduced to per-room, per-day utilization rates, classified against the
//! configured thresholds and mapped to a scheduling recommendation. Each
//! room's daily rates are also forecast a few days ahead with uncertainty
//! bounds.
//!
//! ```no_run
//! use classroom_analytics::{AnalyticsConfig, AnalyticsPipeline};
//! use std::path::Path;
//!
//! let pipeline = AnalyticsPipeline::new(AnalyticsConfig::default())?;
//! let output = pipeline.process_file(Path::new("class_utilization.csv"))?;
//! for row in &output.utilization_table {
//!     println!("{} {} {:.2} {}", row.room_id, row.day_name, row.utilization_rate, row.recommendation);
//! }
//! # Ok::<(), classroom_analytics::AnalyticsError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod forecasting;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;
pub mod transformations;

pub use config::{AnalyticsConfig, ClassificationPolicy, NormalizationMode, PeakHourPolicy};
pub use crate::core::domain::{
    CapacityLabel, OccupancyRecord, PeakHourFlag, UtilizationMetric, UtilizationRow, Weekday,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use forecasting::{ForecastEngine, ForecastReport, ForecastSeries, RoomForecastOutcome, SkipReason};
pub use io::{LoadedOccupancy, LoaderCache};
pub use preprocessing::{AnalyticsPipeline, PipelineOutput, RunReport};
pub use transformations::RecordFilter;
