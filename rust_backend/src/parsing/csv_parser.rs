use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::config::ColumnMapping;
use crate::error::{AnalyticsError, AnalyticsResult};

/// One input row with its cells still as text.
///
/// `row` is the zero-based data row index in the source table (the header is
/// not counted). Null and empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOccupancyRow {
    pub row: usize,
    pub room: Option<String>,
    pub time_slot: Option<String>,
    pub day: Option<String>,
    pub occupancy: Option<String>,
    pub course: Option<String>,
    pub instructor: Option<String>,
    pub department: Option<String>,
}

/// Column names resolved against an actual table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub room: String,
    pub time_slot: String,
    pub day: String,
    pub occupancy: String,
    pub course: Option<String>,
    pub instructor: Option<String>,
    pub department: Option<String>,
}

/// Parse CSV file into a Polars DataFrame with every column read as text
pub fn parse_occupancy_csv(csv_path: &Path) -> AnalyticsResult<DataFrame> {
    let bytes = fs::read(csv_path)?;
    parse_occupancy_csv_bytes(&bytes)
}

/// Parse in-memory CSV content into a Polars DataFrame.
///
/// Schema inference is disabled so that room numbers, hour labels and the
/// binary occupancy flag all arrive as strings and are interpreted by the
/// normalizer, not by the CSV reader.
pub fn parse_occupancy_csv_bytes(bytes: &[u8]) -> AnalyticsResult<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;
    Ok(df)
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

fn resolve_required(
    df: &DataFrame,
    field: &'static str,
    primary: &str,
    aliases: &[String],
) -> AnalyticsResult<String> {
    std::iter::once(primary)
        .chain(aliases.iter().map(String::as_str))
        .find(|name| has_column(df, name))
        .map(str::to_string)
        .ok_or_else(|| AnalyticsError::SchemaError {
            field,
            column: primary.to_string(),
        })
}

/// Resolve every logical field to a column of `df`.
///
/// Fails with [`AnalyticsError::SchemaError`] naming the first required field
/// that has no matching column. Optional fields resolve to `None` when absent.
pub fn resolve_columns(df: &DataFrame, mapping: &ColumnMapping) -> AnalyticsResult<ResolvedColumns> {
    let room = resolve_required(df, "room", &mapping.room, &mapping.room_aliases)?;
    let time_slot = resolve_required(df, "time_slot", &mapping.time_slot, &[])?;
    let day = resolve_required(df, "day", &mapping.day, &[])?;
    let occupancy = resolve_required(df, "occupancy", &mapping.occupancy, &mapping.occupancy_aliases)?;

    let optional = |name: &String| has_column(df, name).then(|| name.clone());

    Ok(ResolvedColumns {
        room,
        time_slot,
        day,
        occupancy,
        course: optional(&mapping.course),
        instructor: optional(&mapping.instructor),
        department: optional(&mapping.department),
    })
}

fn string_values(df: &DataFrame, name: &str) -> AnalyticsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

fn optional_values(
    df: &DataFrame,
    name: Option<&String>,
) -> AnalyticsResult<Vec<Option<String>>> {
    match name {
        Some(name) => string_values(df, name),
        None => Ok(vec![None; df.height()]),
    }
}

/// Convert a Polars DataFrame to raw occupancy rows
pub fn dataframe_to_raw_rows(
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> AnalyticsResult<Vec<RawOccupancyRow>> {
    let columns = resolve_columns(df, mapping)?;

    let rooms = string_values(df, &columns.room)?;
    let time_slots = string_values(df, &columns.time_slot)?;
    let days = string_values(df, &columns.day)?;
    let occupancy = string_values(df, &columns.occupancy)?;
    let courses = optional_values(df, columns.course.as_ref())?;
    let instructors = optional_values(df, columns.instructor.as_ref())?;
    let departments = optional_values(df, columns.department.as_ref())?;

    let rows = rooms
        .into_iter()
        .zip(time_slots)
        .zip(days)
        .zip(occupancy)
        .zip(courses)
        .zip(instructors)
        .zip(departments)
        .enumerate()
        .map(
            |(row, ((((((room, time_slot), day), occupancy), course), instructor), department))| {
                RawOccupancyRow {
                    row,
                    room,
                    time_slot,
                    day,
                    occupancy,
                    course,
                    instructor,
                    department,
                }
            },
        )
        .collect();

    Ok(rows)
}

/// Parse a CSV file straight into raw occupancy rows
pub fn parse_occupancy_csv_to_rows(
    csv_path: &Path,
    mapping: &ColumnMapping,
) -> AnalyticsResult<Vec<RawOccupancyRow>> {
    let df = parse_occupancy_csv(csv_path)?;
    dataframe_to_raw_rows(&df, mapping)
}
