//! Per-room forecast outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::forecasting::series::ForecastSeries;

/// Why a room has no forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum SkipReason {
    /// The room has fewer distinct day points than the model needs.
    InsufficientData { observed: usize, required: usize },
    /// Fitting or predicting failed, panicked or timed out.
    ModelFitFailure { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientData { observed, required } => write!(
                f,
                "insufficient data: {} day point(s), need {}",
                observed, required
            ),
            SkipReason::ModelFitFailure { message } => write!(f, "model fit failure: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomForecastOutcome {
    Forecast(ForecastSeries),
    Skipped(SkipReason),
}

impl RoomForecastOutcome {
    pub fn series(&self) -> Option<&ForecastSeries> {
        match self {
            RoomForecastOutcome::Forecast(series) => Some(series),
            RoomForecastOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            RoomForecastOutcome::Forecast(_) => None,
            RoomForecastOutcome::Skipped(reason) => Some(reason),
        }
    }
}

/// Outcome of every room seen by the forecasting engine, keyed by room id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastReport {
    outcomes: BTreeMap<String, RoomForecastOutcome>,
}

impl ForecastReport {
    pub fn new(outcomes: BTreeMap<String, RoomForecastOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &BTreeMap<String, RoomForecastOutcome> {
        &self.outcomes
    }

    pub fn outcome(&self, room_id: &str) -> Option<&RoomForecastOutcome> {
        self.outcomes.get(room_id)
    }

    pub fn series(&self, room_id: &str) -> Option<&ForecastSeries> {
        self.outcome(room_id).and_then(RoomForecastOutcome::series)
    }

    /// Successful forecasts only. Rooms without a forecast have no key.
    pub fn store(&self) -> BTreeMap<String, ForecastSeries> {
        self.outcomes
            .iter()
            .filter_map(|(room, outcome)| Some((room.clone(), outcome.series()?.clone())))
            .collect()
    }

    pub fn skipped(&self) -> Vec<(&str, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|(room, outcome)| Some((room.as_str(), outcome.skip_reason()?)))
            .collect()
    }

    pub fn forecast_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.series().is_some()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.forecast_count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
