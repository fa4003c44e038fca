//! Per-room utilization forecasting.
//!
//! Each room's daily utilization rates become a short time series on
//! synthetic consecutive dates. A [`ForecastModel`] is fitted per room and
//! extended `horizon` days past the history; rooms are processed concurrently
//! and a failing room only affects its own entry in the [`ForecastReport`].
//!
//! # Components
//!
//! - [`series`]: Input series construction and validated output series
//! - [`model`]: Model traits and errors
//! - [`additive`]: Default trend + daily seasonality model
//! - [`engine`]: Orchestration, minimum-data policy, timeouts
//! - [`report`]: Per-room outcomes and skip reasons

pub mod additive;
pub mod engine;
pub mod model;
pub mod report;
pub mod series;

pub use additive::AdditiveTrendModel;
pub use engine::ForecastEngine;
pub use model::{FittedModel, ForecastModel, ModelError, Prediction};
pub use report::{ForecastReport, RoomForecastOutcome, SkipReason};
pub use series::{build_room_series, ForecastPoint, ForecastSeries, SeriesPoint};
