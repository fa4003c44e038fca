//! Pluggable forecasting model interface.

use chrono::NaiveDate;
use thiserror::Error;

use crate::forecasting::series::SeriesPoint;

/// Errors raised while fitting or evaluating a model.
///
/// These never escape the forecasting engine; they are turned into a
/// `ModelFitFailure` skip reason for the affected room.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("too few observations: {observed} (need at least {required})")]
    TooFewPoints { observed: usize, required: usize },

    #[error("observation {0} is not finite")]
    NonFiniteObservation(usize),

    #[error("normal equations are not positive definite")]
    NotPositiveDefinite,

    #[error("prediction for {0} is not finite")]
    NonFinitePrediction(NaiveDate),

    #[error("invalid forecast series: {0}")]
    InvalidSeries(String),

    #[error("invalid model settings: {0}")]
    InvalidSettings(String),
}

/// A point prediction with its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// A forecasting method that can be fitted to one room's series.
///
/// Implementations must be deterministic: fitting the same points twice yields
/// models with identical predictions.
pub trait ForecastModel: Send + Sync {
    fn name(&self) -> &str;

    /// Fit the model to `points`, which are ordered by date.
    fn fit(&self, points: &[SeriesPoint]) -> Result<Box<dyn FittedModel>, ModelError>;
}

/// A model fitted to a particular series.
pub trait FittedModel: Send {
    /// Predict every date in `dates`, in order.
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<Prediction>, ModelError>;
}
