//! Analytics configuration file support.
//!
//! Policy constants (classification thresholds, peak hours), input column
//! names, normalization strictness and forecasting parameters all live in
//! [`AnalyticsConfig`], which can be read from a TOML file. Every section is
//! optional; missing values fall back to the defaults below.
//!
//! ```toml
//! [classification]
//! underutilized_below = 0.30
//! overutilized_above = 0.70
//!
//! [peak_hours]
//! hours = [9, 10, 11, 12]
//!
//! [normalization]
//! mode = "lenient"
//!
//! [forecast]
//! anchor_date = "2025-04-21"
//! horizon = 5
//!
//! [insights]
//! top_courses = 10
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Complete analytics configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub classification: ClassificationPolicy,
    #[serde(default)]
    pub peak_hours: PeakHourPolicy,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub normalization: NormalizationSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub insights: InsightsSettings,
}

/// Utilization thresholds separating the three capacity labels.
///
/// `rate < underutilized_below` is underutilized, `rate > overutilized_above`
/// is overutilized, and both boundaries themselves are optimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPolicy {
    #[serde(default = "default_underutilized_below")]
    pub underutilized_below: f64,
    #[serde(default = "default_overutilized_above")]
    pub overutilized_above: f64,
}

fn default_underutilized_below() -> f64 {
    0.30
}

fn default_overutilized_above() -> f64 {
    0.70
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            underutilized_below: default_underutilized_below(),
            overutilized_above: default_overutilized_above(),
        }
    }
}

/// Hours of day flagged as peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHourPolicy {
    #[serde(default = "default_peak_hours")]
    pub hours: BTreeSet<u8>,
}

fn default_peak_hours() -> BTreeSet<u8> {
    [9, 10, 11, 12].into_iter().collect()
}

impl Default for PeakHourPolicy {
    fn default() -> Self {
        Self {
            hours: default_peak_hours(),
        }
    }
}

impl PeakHourPolicy {
    pub fn is_peak(&self, hour: u8) -> bool {
        self.hours.contains(&hour)
    }
}

/// Names of the input columns backing each logical field.
///
/// Aliases are tried, in order, when the primary column is absent. The
/// defaults match the cleaned utilization sheet and accept the raw sheet's
/// `Room No` / `Is_Occupied_Binary` headers as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_room_column")]
    pub room: String,
    #[serde(default = "default_room_aliases")]
    pub room_aliases: Vec<String>,
    #[serde(default = "default_time_slot_column")]
    pub time_slot: String,
    #[serde(default = "default_day_column")]
    pub day: String,
    #[serde(default = "default_occupancy_column")]
    pub occupancy: String,
    #[serde(default = "default_occupancy_aliases")]
    pub occupancy_aliases: Vec<String>,
    #[serde(default = "default_course_column")]
    pub course: String,
    #[serde(default = "default_instructor_column")]
    pub instructor: String,
    #[serde(default = "default_department_column")]
    pub department: String,
}

fn default_room_column() -> String {
    "Room_Number".to_string()
}

fn default_room_aliases() -> Vec<String> {
    vec!["Room No".to_string()]
}

fn default_time_slot_column() -> String {
    "Time Slot".to_string()
}

fn default_day_column() -> String {
    "Day".to_string()
}

fn default_occupancy_column() -> String {
    "Occupied_Binary".to_string()
}

fn default_occupancy_aliases() -> Vec<String> {
    vec!["Is_Occupied_Binary".to_string(), "Is_Occupied".to_string()]
}

fn default_course_column() -> String {
    "Course Code".to_string()
}

fn default_instructor_column() -> String {
    "Faculty".to_string()
}

fn default_department_column() -> String {
    "Department".to_string()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            room: default_room_column(),
            room_aliases: default_room_aliases(),
            time_slot: default_time_slot_column(),
            day: default_day_column(),
            occupancy: default_occupancy_column(),
            occupancy_aliases: default_occupancy_aliases(),
            course: default_course_column(),
            instructor: default_instructor_column(),
            department: default_department_column(),
        }
    }
}

/// How the normalizer treats a record it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    /// Fail the whole batch on the first bad record.
    #[default]
    Strict,
    /// Drop bad records and report them.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationSettings {
    #[serde(default)]
    pub mode: NormalizationMode,
}

/// Forecasting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// First synthetic date of every room's series.
    #[serde(default = "default_anchor_date")]
    pub anchor_date: NaiveDate,
    /// Number of future daily periods predicted after the observed history.
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    /// Rooms with fewer distinct day points are not forecast.
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,
    #[serde(default = "default_true")]
    pub daily_seasonality: bool,
    #[serde(default = "default_fourier_order")]
    pub fourier_order: usize,
    /// Coverage of the `[yhat_lower, yhat_upper]` band.
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,
    #[serde(default = "default_trend_prior_scale")]
    pub trend_prior_scale: f64,
    #[serde(default = "default_seasonality_prior_scale")]
    pub seasonality_prior_scale: f64,
    /// Per-room model fit timeout.
    #[serde(default = "default_fit_timeout_secs")]
    pub fit_timeout_secs: u64,
    /// Concurrent room fits; defaults to the number of available cores.
    #[serde(default)]
    pub max_workers: Option<usize>,
}

fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 21).unwrap_or_default()
}

fn default_horizon() -> usize {
    5
}

fn default_min_data_points() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_fourier_order() -> usize {
    4
}

fn default_interval_width() -> f64 {
    0.80
}

fn default_trend_prior_scale() -> f64 {
    5.0
}

fn default_seasonality_prior_scale() -> f64 {
    10.0
}

fn default_fit_timeout_secs() -> u64 {
    30
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            anchor_date: default_anchor_date(),
            horizon: default_horizon(),
            min_data_points: default_min_data_points(),
            daily_seasonality: default_true(),
            fourier_order: default_fourier_order(),
            interval_width: default_interval_width(),
            trend_prior_scale: default_trend_prior_scale(),
            seasonality_prior_scale: default_seasonality_prior_scale(),
            fit_timeout_secs: default_fit_timeout_secs(),
            max_workers: None,
        }
    }
}

impl ForecastSettings {
    /// Number of rooms fitted concurrently.
    pub fn worker_count(&self) -> usize {
        self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsSettings {
    #[serde(default = "default_top_courses")]
    pub top_courses: usize,
}

fn default_top_courses() -> usize {
    10
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            top_courses: default_top_courses(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        let config: AnalyticsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analytics.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> AnalyticsResult<Self> {
        let search_paths = [
            PathBuf::from("analytics.toml"),
            PathBuf::from("rust_backend/analytics.toml"),
            PathBuf::from("../analytics.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(AnalyticsError::InvalidConfig(
            "No analytics.toml found in standard locations".to_string(),
        ))
    }

    /// Check value ranges and internal consistency.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let policy = &self.classification;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(policy.underutilized_below) || !in_unit(policy.overutilized_above) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "classification thresholds must lie in [0, 1], got {} and {}",
                policy.underutilized_below, policy.overutilized_above
            )));
        }
        if policy.underutilized_below > policy.overutilized_above {
            return Err(AnalyticsError::InvalidConfig(format!(
                "underutilized_below ({}) exceeds overutilized_above ({})",
                policy.underutilized_below, policy.overutilized_above
            )));
        }

        if let Some(hour) = self.peak_hours.hours.iter().find(|h| **h > 23) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "peak hour {} is outside 0..=23",
                hour
            )));
        }

        let columns = &self.columns;
        for (field, name) in [
            ("room", &columns.room),
            ("time_slot", &columns.time_slot),
            ("day", &columns.day),
            ("occupancy", &columns.occupancy),
            ("course", &columns.course),
            ("instructor", &columns.instructor),
            ("department", &columns.department),
        ] {
            if name.trim().is_empty() {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "column name for '{}' is empty",
                    field
                )));
            }
        }

        let forecast = &self.forecast;
        if forecast.horizon == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "forecast horizon must be at least 1".to_string(),
            ));
        }
        if forecast.min_data_points == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "min_data_points must be at least 1".to_string(),
            ));
        }
        if !(forecast.interval_width > 0.0 && forecast.interval_width < 1.0) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "interval_width must lie in (0, 1), got {}",
                forecast.interval_width
            )));
        }
        if !(forecast.trend_prior_scale > 0.0) || !(forecast.seasonality_prior_scale > 0.0) {
            return Err(AnalyticsError::InvalidConfig(
                "prior scales must be positive".to_string(),
            ));
        }
        if forecast.fit_timeout_secs == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "fit_timeout_secs must be positive".to_string(),
            ));
        }
        if forecast.max_workers == Some(0) {
            return Err(AnalyticsError::InvalidConfig(
                "max_workers must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}
