//! Time series inputs and validated forecast outputs.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::UtilizationMetric;
use crate::forecasting::model::ModelError;

/// One observation of a room's daily utilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One forecast value with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    /// `true` for in-sample fitted values, `false` for the horizon.
    pub is_history: bool,
}

impl ForecastPoint {
    fn is_valid(&self) -> bool {
        self.yhat.is_finite()
            && self.yhat_lower.is_finite()
            && self.yhat_upper.is_finite()
            && self.yhat_lower <= self.yhat
            && self.yhat <= self.yhat_upper
    }
}

/// Forecast trajectory of a single room.
///
/// Points are ordered by strictly increasing date and every point satisfies
/// `yhat_lower <= yhat <= yhat_upper`. Both are checked by [`ForecastSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    room_id: String,
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(room_id: impl Into<String>, points: Vec<ForecastPoint>) -> Result<Self, ModelError> {
        let room_id = room_id.into();
        if points.is_empty() {
            return Err(ModelError::InvalidSeries(format!(
                "room {} has an empty forecast",
                room_id
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(ModelError::InvalidSeries(format!(
                "room {} violates yhat_lower <= yhat <= yhat_upper on {}",
                room_id, bad.date
            )));
        }
        if points.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(ModelError::InvalidSeries(format!(
                "room {} forecast dates are not strictly increasing",
                room_id
            )));
        }
        Ok(Self { room_id, points })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Points after the observed history.
    pub fn horizon(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| !p.is_history)
    }

    pub fn into_points(self) -> Vec<ForecastPoint> {
        self.points
    }
}

/// Build one daily series per room from its utilization metrics.
///
/// A room's metrics are ordered by day order and the i-th gets the date
/// `anchor + i days`, independent of which weekday it came from.
pub fn build_room_series(
    metrics: &[UtilizationMetric],
    anchor: NaiveDate,
) -> BTreeMap<String, Vec<SeriesPoint>> {
    let mut by_room: BTreeMap<String, Vec<&UtilizationMetric>> = BTreeMap::new();
    for metric in metrics {
        by_room.entry(metric.room_id.clone()).or_default().push(metric);
    }

    by_room
        .into_iter()
        .map(|(room_id, mut room_metrics)| {
            room_metrics.sort_by_key(|m| m.day_order);
            let points = room_metrics
                .iter()
                .enumerate()
                .filter_map(|(i, m)| {
                    let date = anchor.checked_add_days(Days::new(i as u64))?;
                    Some(SeriesPoint {
                        date,
                        value: m.utilization_rate,
                    })
                })
                .collect();
            (room_id, points)
        })
        .collect()
}
