use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::algorithms::{aggregate_utilization, build_utilization_table};
use crate::config::AnalyticsConfig;
use crate::core::domain::{OccupancyRecord, UtilizationMetric, UtilizationRow};
use crate::error::AnalyticsResult;
use crate::forecasting::{ForecastEngine, ForecastModel, ForecastReport, SkipReason};
use crate::io::loaders::{LoadedOccupancy, LoaderCache, OccupancyLoader};
use crate::io::writers::{write_forecast_store, write_json, write_utilization_csv};
use crate::preprocessing::normalizer::{NormalizationReport, RejectedRecord};
use crate::services::insights::{compute_insights, InsightsSummary};
use crate::transformations::filtering::{filter_records, RecordFilter};

/// A room without a forecast and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRoom {
    pub room_id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Machine-readable summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub checksum: String,
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub rejected: Vec<RejectedRecord>,
    /// Records left after the record filter.
    pub analyzed_records: usize,
    pub room_count: usize,
    pub metric_count: usize,
    pub forecast_rooms: Vec<String>,
    pub skipped_rooms: Vec<SkippedRoom>,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub checksum: String,
    pub normalization: NormalizationReport,
    /// Normalized records after filtering.
    pub records: Vec<OccupancyRecord>,
    pub metrics: Vec<UtilizationMetric>,
    pub utilization_table: Vec<UtilizationRow>,
    pub forecasts: ForecastReport,
    pub insights: InsightsSummary,
}

impl PipelineOutput {
    pub fn run_report(&self) -> RunReport {
        let rooms: BTreeSet<&str> = self.metrics.iter().map(|m| m.room_id.as_str()).collect();
        RunReport {
            checksum: self.checksum.clone(),
            total_rows: self.normalization.total_rows,
            accepted_rows: self.normalization.accepted_rows,
            rejected: self.normalization.rejected.clone(),
            analyzed_records: self.records.len(),
            room_count: rooms.len(),
            metric_count: self.metrics.len(),
            forecast_rooms: self.forecasts.store().into_keys().collect(),
            skipped_rooms: self
                .forecasts
                .skipped()
                .into_iter()
                .map(|(room_id, reason)| SkippedRoom {
                    room_id: room_id.to_string(),
                    reason: reason.clone(),
                })
                .collect(),
        }
    }

    /// Write `utilization.csv`, `forecasts.json`, `run_report.json` and
    /// `insights.json` into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> AnalyticsResult<()> {
        fs::create_dir_all(dir)?;
        write_utilization_csv(&self.utilization_table, &dir.join("utilization.csv"))?;
        write_forecast_store(&self.forecasts.store(), &dir.join("forecasts.json"))?;
        write_json(&self.run_report(), &dir.join("run_report.json"))?;
        write_json(&self.insights, &dir.join("insights.json"))?;
        Ok(())
    }
}

/// Load → normalize → filter → aggregate → classify, then forecast.
pub struct AnalyticsPipeline {
    config: AnalyticsConfig,
    filter: RecordFilter,
    cache: Option<Arc<LoaderCache>>,
    engine: ForecastEngine,
}

impl AnalyticsPipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: AnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate()?;
        let engine = ForecastEngine::new(config.forecast.clone())?;
        Ok(Self {
            config,
            filter: RecordFilter::default(),
            cache: None,
            engine,
        })
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Route loads through a shared cache.
    pub fn with_cache(mut self, cache: Arc<LoaderCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_forecast_model(mut self, model: Arc<dyn ForecastModel>) -> Self {
        self.engine = ForecastEngine::with_model(self.config.forecast.clone(), model);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Load and normalize CSV bytes, through the cache when one is set.
    pub fn load_bytes(&self, bytes: &[u8]) -> AnalyticsResult<Arc<LoadedOccupancy>> {
        let mapping = &self.config.columns;
        let mode = self.config.normalization.mode;
        match &self.cache {
            Some(cache) => cache.get_or_load(bytes, mapping, mode),
            None => OccupancyLoader::load_from_bytes(bytes, mapping, mode).map(Arc::new),
        }
    }

    /// Read, load and analyze a CSV file.
    ///
    /// Synchronous like [`AnalyticsPipeline::analyze`]; inside a tokio runtime
    /// it fails with [`AnalyticsError::Runtime`](crate::error::AnalyticsError::Runtime).
    pub fn process_file(&self, path: &Path) -> AnalyticsResult<PipelineOutput> {
        let bytes = fs::read(path)?;
        info!("Processing {}", path.display());
        self.process_bytes(&bytes)
    }

    /// Load and analyze CSV bytes. Same runtime restriction as
    /// [`AnalyticsPipeline::analyze`].
    pub fn process_bytes(&self, bytes: &[u8]) -> AnalyticsResult<PipelineOutput> {
        let loaded = self.load_bytes(bytes)?;
        self.analyze(&loaded)
    }

    /// Analyze already loaded data, forecasting on a dedicated runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Runtime`](crate::error::AnalyticsError::Runtime)
    /// when called from within a tokio runtime; async callers use
    /// [`AnalyticsPipeline::analyze_async`].
    pub fn analyze(&self, loaded: &LoadedOccupancy) -> AnalyticsResult<PipelineOutput> {
        let tables = self.tabulate(loaded);
        let forecasts = self.engine.forecast_all_blocking(&tables.metrics)?;
        Ok(tables.finish(loaded, forecasts))
    }

    /// Analyze already loaded data from within an async context.
    pub async fn analyze_async(&self, loaded: &LoadedOccupancy) -> AnalyticsResult<PipelineOutput> {
        let tables = self.tabulate(loaded);
        let forecasts = self.engine.forecast_all(&tables.metrics).await;
        Ok(tables.finish(loaded, forecasts))
    }

    fn tabulate(&self, loaded: &LoadedOccupancy) -> Tables {
        let records = filter_records(&loaded.records, &self.filter);
        if !self.filter.is_empty() {
            info!(
                "Record filter kept {} of {} records",
                records.len(),
                loaded.records.len()
            );
        }

        let metrics = aggregate_utilization(&records);
        let utilization_table = build_utilization_table(
            &records,
            &metrics,
            &self.config.classification,
            &self.config.peak_hours,
        );
        let insights = compute_insights(
            &records,
            &utilization_table,
            &self.config.peak_hours,
            &self.config.insights,
        );
        info!(
            "Computed {} room-day metrics and {} table rows",
            metrics.len(),
            utilization_table.len()
        );

        Tables {
            records,
            metrics,
            utilization_table,
            insights,
        }
    }
}

struct Tables {
    records: Vec<OccupancyRecord>,
    metrics: Vec<UtilizationMetric>,
    utilization_table: Vec<UtilizationRow>,
    insights: InsightsSummary,
}

impl Tables {
    fn finish(self, loaded: &LoadedOccupancy, forecasts: ForecastReport) -> PipelineOutput {
        PipelineOutput {
            checksum: loaded.checksum.clone(),
            normalization: loaded.report.clone(),
            records: self.records,
            metrics: self.metrics,
            utilization_table: self.utilization_table,
            forecasts,
            insights: self.insights,
        }
    }
}
