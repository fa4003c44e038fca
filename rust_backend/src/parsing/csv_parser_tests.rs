#[cfg(test)]
mod tests {
    use crate::config::ColumnMapping;
    use crate::error::AnalyticsError;
    use crate::parsing::csv_parser::{
        dataframe_to_raw_rows, parse_occupancy_csv, parse_occupancy_csv_bytes,
        parse_occupancy_csv_to_rows, resolve_columns,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Room_Number,Department,Day,Time Slot,Course Code,Faculty,Occupied_Binary\n";

    /// Helper to create a temp CSV file
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    /// Test parsing CSV with all columns present
    #[test]
    fn test_parse_occupancy_csv_basic() {
        let csv_content = format!(
            "{}101,CSE,Monday,9 AM,CS101,Dr. Rao,1\n101,CSE,Monday,10 AM,-,-,0\n",
            HEADER
        );

        let temp_file = create_temp_csv(&csv_content);
        let result = parse_occupancy_csv(temp_file.path());

        assert!(result.is_ok(), "Should parse basic CSV: {:?}", result.err());
        let df = result.unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 7);
    }

    /// Numeric-looking cells must stay text so the normalizer sees them verbatim
    #[test]
    fn test_numeric_cells_arrive_as_text() {
        let csv_content = format!("{}007,CSE,Tuesday,2 PM,,,1\n", HEADER);
        let df = parse_occupancy_csv_bytes(csv_content.as_bytes()).unwrap();
        let rows = dataframe_to_raw_rows(&df, &ColumnMapping::default()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].room.as_deref(), Some("007"));
        assert_eq!(rows[0].occupancy.as_deref(), Some("1"));
        assert_eq!(rows[0].time_slot.as_deref(), Some("2 PM"));
        assert_eq!(rows[0].course, None);
        assert_eq!(rows[0].instructor, None);
    }

    /// Test row indices and optional columns
    #[test]
    fn test_rows_carry_index_and_labels() {
        let csv_content = format!(
            "{}101,CSE,Monday,9 AM,CS101,Dr. Rao,1\n202,ECE,Friday,3 PM,EC210,Dr. Sen,1\n",
            HEADER
        );
        let temp_file = create_temp_csv(&csv_content);
        let rows = parse_occupancy_csv_to_rows(temp_file.path(), &ColumnMapping::default()).unwrap();

        assert_eq!(rows[1].row, 1);
        assert_eq!(rows[1].room.as_deref(), Some("202"));
        assert_eq!(rows[1].day.as_deref(), Some("Friday"));
        assert_eq!(rows[1].course.as_deref(), Some("EC210"));
        assert_eq!(rows[1].instructor.as_deref(), Some("Dr. Sen"));
        assert_eq!(rows[1].department.as_deref(), Some("ECE"));
    }

    /// Optional columns may be missing entirely
    #[test]
    fn test_optional_columns_absent() {
        let csv_content = "Room_Number,Day,Time Slot,Occupied_Binary\n101,Monday,9 AM,1\n";
        let df = parse_occupancy_csv_bytes(csv_content.as_bytes()).unwrap();

        let columns = resolve_columns(&df, &ColumnMapping::default()).unwrap();
        assert_eq!(columns.course, None);
        assert_eq!(columns.instructor, None);
        assert_eq!(columns.department, None);

        let rows = dataframe_to_raw_rows(&df, &ColumnMapping::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].department, None);
    }

    /// Raw sheet headers resolve through aliases
    #[test]
    fn test_raw_sheet_aliases() {
        let csv_content = "Room No,Day,Time Slot,Is_Occupied\n101,Monday,9 AM,Yes\n";
        let df = parse_occupancy_csv_bytes(csv_content.as_bytes()).unwrap();

        let columns = resolve_columns(&df, &ColumnMapping::default()).unwrap();
        assert_eq!(columns.room, "Room No");
        assert_eq!(columns.occupancy, "Is_Occupied");
    }

    /// Missing required column fails with SchemaError naming the field
    #[test]
    fn test_missing_required_column() {
        let csv_content = "Room_Number,Day,Occupied_Binary\n101,Monday,1\n";
        let df = parse_occupancy_csv_bytes(csv_content.as_bytes()).unwrap();

        let err = dataframe_to_raw_rows(&df, &ColumnMapping::default()).unwrap_err();
        match err {
            AnalyticsError::SchemaError { field, column } => {
                assert_eq!(field, "time_slot");
                assert_eq!(column, "Time Slot");
            }
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    /// Custom column mapping
    #[test]
    fn test_custom_mapping() {
        let csv_content = "room,weekday,slot,busy\nA1,Thursday,11 AM,0\n";
        let df = parse_occupancy_csv_bytes(csv_content.as_bytes()).unwrap();
        let mapping = ColumnMapping {
            room: "room".to_string(),
            day: "weekday".to_string(),
            time_slot: "slot".to_string(),
            occupancy: "busy".to_string(),
            ..ColumnMapping::default()
        };

        let rows = dataframe_to_raw_rows(&df, &mapping).unwrap();
        assert_eq!(rows[0].room.as_deref(), Some("A1"));
        assert_eq!(rows[0].day.as_deref(), Some("Thursday"));
        assert_eq!(rows[0].occupancy.as_deref(), Some("0"));
    }

    /// Test error handling for non-existent file
    #[test]
    fn test_parse_nonexistent_file() {
        let result = parse_occupancy_csv(std::path::Path::new("/nonexistent/occupancy.csv"));
        assert!(matches!(result, Err(AnalyticsError::Io(_))));
    }
}
