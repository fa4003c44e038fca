use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{ColumnMapping, NormalizationMode};
use crate::core::domain::OccupancyRecord;
use crate::error::AnalyticsResult;
use crate::io::checksum::{calculate_checksum, calculate_checksum_parts};
use crate::parsing::csv_parser;
use crate::preprocessing::normalizer::{NormalizationReport, OccupancyNormalizer};

/// Normalized occupancy data together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedOccupancy {
    /// SHA-256 of the input bytes.
    pub checksum: String,
    pub records: Vec<OccupancyRecord>,
    pub report: NormalizationReport,
}

impl LoadedOccupancy {
    /// Wrap records that were built in memory rather than read from a table.
    ///
    /// The checksum covers the records' JSON form.
    pub fn from_records(records: Vec<OccupancyRecord>) -> AnalyticsResult<Self> {
        let checksum = calculate_checksum(&serde_json::to_vec(&records)?);
        let report = NormalizationReport {
            total_rows: records.len(),
            accepted_rows: records.len(),
            rejected: Vec::new(),
        };
        Ok(Self {
            checksum,
            records,
            report,
        })
    }
}

/// Reads occupancy tables and normalizes them in one step.
pub struct OccupancyLoader;

impl OccupancyLoader {
    /// Load and normalize an occupancy CSV file.
    pub fn load_from_file(
        path: &Path,
        mapping: &ColumnMapping,
        mode: NormalizationMode,
    ) -> AnalyticsResult<LoadedOccupancy> {
        let bytes = fs::read(path)?;
        info!("Read {} bytes from {}", bytes.len(), path.display());
        Self::load_from_bytes(&bytes, mapping, mode)
    }

    /// Load and normalize in-memory CSV content.
    pub fn load_from_bytes(
        bytes: &[u8],
        mapping: &ColumnMapping,
        mode: NormalizationMode,
    ) -> AnalyticsResult<LoadedOccupancy> {
        let checksum = calculate_checksum(bytes);
        let df = csv_parser::parse_occupancy_csv_bytes(bytes)?;
        let rows = csv_parser::dataframe_to_raw_rows(&df, mapping)?;
        let outcome = OccupancyNormalizer::new(mode).normalize(&rows)?;

        info!(
            "Loaded {} occupancy records (checksum {})",
            outcome.records.len(),
            &checksum[..12]
        );

        Ok(LoadedOccupancy {
            checksum,
            records: outcome.records,
            report: outcome.report,
        })
    }
}

/// Caller-owned memo of loaded inputs.
///
/// Entries are keyed by a checksum over the input bytes, the column mapping
/// and the normalization mode, so changing any of them triggers a reload.
/// Identical inputs share one [`Arc`].
#[derive(Debug, Default)]
pub struct LoaderCache {
    entries: RwLock<HashMap<String, Arc<LoadedOccupancy>>>,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_key(
        bytes: &[u8],
        mapping: &ColumnMapping,
        mode: NormalizationMode,
    ) -> AnalyticsResult<String> {
        let mapping = serde_json::to_vec(mapping)?;
        let mode = serde_json::to_vec(&mode)?;
        Ok(calculate_checksum_parts(&[bytes, mapping.as_slice(), mode.as_slice()]))
    }

    /// Return the cached load of `bytes`, loading it on a miss.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(
        &self,
        bytes: &[u8],
        mapping: &ColumnMapping,
        mode: NormalizationMode,
    ) -> AnalyticsResult<Arc<LoadedOccupancy>> {
        let key = Self::cache_key(bytes, mapping, mode)?;

        if let Some(hit) = self.entries.read().get(&key) {
            debug!("Loader cache hit for {}", &key[..12]);
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(OccupancyLoader::load_from_bytes(bytes, mapping, mode)?);
        let mut entries = self.entries.write();
        // Another caller may have loaded the same input meanwhile; keep the first.
        let entry = entries.entry(key).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    pub fn get_or_load_file(
        &self,
        path: &Path,
        mapping: &ColumnMapping,
        mode: NormalizationMode,
    ) -> AnalyticsResult<Arc<LoadedOccupancy>> {
        let bytes = fs::read(path)?;
        self.get_or_load(&bytes, mapping, mode)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
