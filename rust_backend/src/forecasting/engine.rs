//! Per-room forecasting with bounded concurrency and failure isolation.

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ForecastSettings;
use crate::core::domain::UtilizationMetric;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::forecasting::additive::AdditiveTrendModel;
use crate::forecasting::model::{ForecastModel, ModelError};
use crate::forecasting::report::{ForecastReport, RoomForecastOutcome, SkipReason};
use crate::forecasting::series::{build_room_series, ForecastPoint, ForecastSeries, SeriesPoint};

/// Forecasts every room's daily utilization.
///
/// Each room is fitted independently; a failure in one room is recorded as a
/// [`SkipReason`] and never affects the others.
#[derive(Clone)]
pub struct ForecastEngine {
    settings: ForecastSettings,
    model: Arc<dyn ForecastModel>,
}

impl std::fmt::Debug for ForecastEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastEngine")
            .field("settings", &self.settings)
            .field("model", &self.model.name())
            .finish()
    }
}

impl ForecastEngine {
    /// Engine using [`AdditiveTrendModel`] configured from `settings`.
    pub fn new(settings: ForecastSettings) -> AnalyticsResult<Self> {
        let model = AdditiveTrendModel::from_settings(&settings)
            .map_err(|e| AnalyticsError::InvalidConfig(e.to_string()))?;
        Ok(Self::with_model(settings, Arc::new(model)))
    }

    pub fn with_model(settings: ForecastSettings, model: Arc<dyn ForecastModel>) -> Self {
        Self { settings, model }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Forecast a single room's series on the calling thread.
    pub fn forecast_room(&self, room_id: &str, points: &[SeriesPoint]) -> RoomForecastOutcome {
        let outcome = fit_room(self.model.as_ref(), &self.settings, room_id, points);
        log_outcome(room_id, &outcome);
        outcome
    }

    /// Forecast every room present in `metrics`.
    ///
    /// Rooms below the minimum-data threshold are skipped up front. The rest
    /// are fitted on the blocking pool, at most `worker_count()` at a time,
    /// each under the configured timeout. The report holds an outcome for
    /// every room in `metrics`.
    pub async fn forecast_all(&self, metrics: &[UtilizationMetric]) -> ForecastReport {
        let series = build_room_series(metrics, self.settings.anchor_date);
        let rooms: Vec<String> = series.keys().cloned().collect();
        let required = self.settings.min_data_points;
        let timeout = Duration::from_secs(self.settings.fit_timeout_secs);
        let semaphore = Arc::new(Semaphore::new(self.settings.worker_count()));

        let mut outcomes = BTreeMap::new();
        let mut tasks = JoinSet::new();

        for (room_id, points) in series {
            if points.len() < required {
                let outcome = insufficient(points.len(), required);
                log_outcome(&room_id, &outcome);
                outcomes.insert(room_id, outcome);
                continue;
            }

            let model = Arc::clone(&self.model);
            let settings = self.settings.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let permit = semaphore.acquire_owned().await.ok();
                let fit = tokio::task::spawn_blocking({
                    let room_id = room_id.clone();
                    move || {
                        // Held until the fit returns, even if the caller timed out.
                        let _permit = permit;
                        fit_room(model.as_ref(), &settings, &room_id, &points)
                    }
                });

                // The blocking fit keeps running after a timeout; its result is
                // discarded and its worker slot stays taken until it finishes.
                let outcome = match tokio::time::timeout(timeout, fit).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => failure(format!("fit task panicked: {}", e)),
                    Err(_) => failure(format!("fit timed out after {}s", timeout.as_secs())),
                };
                (room_id, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((room_id, outcome)) => {
                    log_outcome(&room_id, &outcome);
                    outcomes.insert(room_id, outcome);
                }
                Err(e) => warn!("Forecast task failed: {}", e),
            }
        }

        for room_id in rooms {
            outcomes
                .entry(room_id)
                .or_insert_with(|| failure("forecast task did not complete".to_string()));
        }

        let report = ForecastReport::new(outcomes);
        info!(
            "Forecast {} of {} rooms with {} ({} skipped)",
            report.forecast_count(),
            report.len(),
            self.model.name(),
            report.skipped_count()
        );
        report
    }

    /// Blocking wrapper around [`ForecastEngine::forecast_all`].
    ///
    /// Builds its own multi-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Runtime`] when called from within a tokio
    /// runtime; use [`ForecastEngine::forecast_all`] there instead.
    pub fn forecast_all_blocking(&self, metrics: &[UtilizationMetric]) -> AnalyticsResult<ForecastReport> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(AnalyticsError::Runtime(
                "blocking forecast called from within an async runtime; use forecast_all".to_string(),
            ));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AnalyticsError::Runtime(e.to_string()))?;
        Ok(runtime.block_on(self.forecast_all(metrics)))
    }
}

fn insufficient(observed: usize, required: usize) -> RoomForecastOutcome {
    RoomForecastOutcome::Skipped(SkipReason::InsufficientData { observed, required })
}

fn failure(message: String) -> RoomForecastOutcome {
    RoomForecastOutcome::Skipped(SkipReason::ModelFitFailure { message })
}

fn log_outcome(room_id: &str, outcome: &RoomForecastOutcome) {
    match outcome {
        RoomForecastOutcome::Forecast(series) => {
            debug!("Room {}: forecast {} points", room_id, series.points().len())
        }
        RoomForecastOutcome::Skipped(reason @ SkipReason::InsufficientData { .. }) => {
            info!("Skipping forecast for room {}: {}", room_id, reason)
        }
        RoomForecastOutcome::Skipped(reason) => {
            warn!("Skipping forecast for room {}: {}", room_id, reason)
        }
    }
}

fn fit_room(
    model: &dyn ForecastModel,
    settings: &ForecastSettings,
    room_id: &str,
    points: &[SeriesPoint],
) -> RoomForecastOutcome {
    if points.len() < settings.min_data_points {
        return insufficient(points.len(), settings.min_data_points);
    }
    match forecast_series(model, settings.horizon, room_id, points) {
        Ok(series) => RoomForecastOutcome::Forecast(series),
        Err(e) => failure(e.to_string()),
    }
}

fn forecast_series(
    model: &dyn ForecastModel,
    horizon: usize,
    room_id: &str,
    points: &[SeriesPoint],
) -> Result<ForecastSeries, ModelError> {
    let fitted = model.fit(points)?;

    let last = points.last().map(|p| p.date).ok_or(ModelError::TooFewPoints {
        observed: 0,
        required: 1,
    })?;
    let future: Vec<NaiveDate> = (1..=horizon as u64)
        .filter_map(|i| last.checked_add_days(Days::new(i)))
        .collect();
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).chain(future).collect();

    let predictions = fitted.predict(&dates)?;
    if predictions.len() != dates.len() {
        return Err(ModelError::InvalidSeries(format!(
            "model returned {} predictions for {} dates",
            predictions.len(),
            dates.len()
        )));
    }

    let history = points.len();
    let forecast_points = predictions
        .into_iter()
        .enumerate()
        .map(|(i, p)| ForecastPoint {
            date: p.date,
            yhat: p.yhat,
            yhat_lower: p.yhat_lower,
            yhat_upper: p.yhat_upper,
            is_history: i < history,
        })
        .collect();

    ForecastSeries::new(room_id, forecast_points)
}
