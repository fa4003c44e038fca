//! Occupancy normalization with strict or lenient record handling.
//!
//! Turns [`RawOccupancyRow`]s into canonical [`OccupancyRecord`]s. Rows whose
//! time slot, day or occupancy indicator cannot be parsed either abort the
//! batch (strict mode) or are dropped and listed in the
//! [`NormalizationReport`] (lenient mode).

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::NormalizationMode;
use crate::core::domain::OccupancyRecord;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::parsing::csv_parser::RawOccupancyRow;
use crate::parsing::fields::{
    optional_label, parse_occupancy, parse_time_slot_hour, parse_weekday, FieldIssue,
};

/// A record dropped by lenient normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub row: usize,
    pub kind: String,
    pub message: String,
}

impl RejectedRecord {
    fn from_error(row: usize, err: &AnalyticsError) -> Self {
        Self {
            row,
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Summary of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalized records together with the pass summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationOutcome {
    pub records: Vec<OccupancyRecord>,
    pub report: NormalizationReport,
}

/// Normalizer for raw occupancy rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupancyNormalizer {
    mode: NormalizationMode,
}

impl OccupancyNormalizer {
    pub fn new(mode: NormalizationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Normalize a single raw row.
    ///
    /// Unoccupied slots lose their course and instructor labels whatever the
    /// raw cells contained.
    pub fn normalize_row(raw: &RawOccupancyRow) -> AnalyticsResult<OccupancyRecord> {
        let room = raw
            .room
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| FieldIssue::MissingRoom.at_row(raw.row))?;

        let hour = parse_time_slot_hour(raw.time_slot.as_deref().unwrap_or_default())
            .map_err(|issue| issue.at_row(raw.row))?;
        let day = parse_weekday(raw.day.as_deref().unwrap_or_default())
            .map_err(|issue| issue.at_row(raw.row))?;
        let occupied = parse_occupancy(raw.occupancy.as_deref().unwrap_or_default())
            .map_err(|issue| issue.at_row(raw.row))?;

        let record = OccupancyRecord::new(
            room,
            day,
            hour,
            occupied,
            optional_label(raw.course.as_deref()),
            optional_label(raw.instructor.as_deref()),
        )
        .with_department(optional_label(raw.department.as_deref()));

        Ok(record)
    }

    /// Normalize every row according to the configured mode.
    ///
    /// # Errors
    ///
    /// In strict mode, the first record error is returned. Lenient mode never
    /// fails on record errors.
    pub fn normalize(&self, rows: &[RawOccupancyRow]) -> AnalyticsResult<NormalizationOutcome> {
        let mut records = Vec::with_capacity(rows.len());
        let mut report = NormalizationReport {
            total_rows: rows.len(),
            ..Default::default()
        };

        for raw in rows {
            match Self::normalize_row(raw) {
                Ok(record) => records.push(record),
                Err(err) if self.mode == NormalizationMode::Lenient && err.is_record_error() => {
                    warn!("Dropping occupancy row {}: {}", raw.row, err);
                    report.rejected.push(RejectedRecord::from_error(raw.row, &err));
                }
                Err(err) => return Err(err),
            }
        }

        report.accepted_rows = records.len();
        info!(
            "Normalized {} of {} occupancy rows ({} rejected)",
            report.accepted_rows,
            report.total_rows,
            report.rejected.len()
        );

        Ok(NormalizationOutcome { records, report })
    }
}
