use crate::error::LoadError;
use crate::record::row::{Dataset, Record};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::debug;

const OPERATION_COLUMN: &str = "operation";
const TIME_COLUMN: &str = "time_us";

/// Load a benchmark CSV into a dataset.
///
/// Expected header (column order is free, extra columns are kept in
/// `Dataset::columns` but otherwise ignored):
/// operation,key,time_us
///
/// Example rows:
/// PUT,42,13
/// GET,17,0
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| LoadError::from_csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| LoadError::from_csv(path, e))?
        .clone();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let op_idx = column_index(&headers, OPERATION_COLUMN).ok_or_else(|| {
        LoadError::parse(path, Some(1), format!("missing column '{}'", OPERATION_COLUMN))
    })?;
    let time_idx = column_index(&headers, TIME_COLUMN).ok_or_else(|| {
        LoadError::parse(path, Some(1), format!("missing column '{}'", TIME_COLUMN))
    })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| LoadError::from_csv(path, e))?;
        let line = row.position().map(|pos| pos.line() as usize);

        // Rows of unequal length are rejected by the reader, so both fields exist.
        let operation = row.get(op_idx).unwrap_or_default();
        let raw_time = row.get(time_idx).unwrap_or_default();

        if operation.is_empty() {
            return Err(LoadError::parse(path, line, "empty operation name"));
        }

        let time_us: f64 = raw_time.parse().map_err(|_| {
            LoadError::parse(path, line, format!("time_us is not a number: {:?}", raw_time))
        })?;
        if !time_us.is_finite() || time_us < 0.0 {
            return Err(LoadError::parse(
                path,
                line,
                format!("time_us must be a non-negative number, got {}", raw_time),
            ));
        }

        records.push(Record::new(operation, time_us));
    }

    debug!(path = %path.display(), rows = records.len(), "loaded benchmark csv");

    Ok(Dataset { columns, records })
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_file_order_with_extra_columns() {
        let file = csv_file("operation,key,time_us\nPUT,1,10\nGET,1,0\nRANGE, 7 , 3.5\n");
        let dataset = load_dataset(file.path()).unwrap();

        assert_eq!(dataset.columns, vec!["operation", "key", "time_us"]);
        assert_eq!(
            dataset.records,
            vec![
                Record::new("PUT", 10.0),
                Record::new("GET", 0.0),
                Record::new("RANGE", 3.5),
            ]
        );
    }

    #[test]
    fn column_order_is_free() {
        let file = csv_file("time_us,operation\n5,DELETE\n");
        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.records, vec![Record::new("DELETE", 5.0)]);
    }

    #[test]
    fn header_only_is_an_empty_dataset() {
        let file = csv_file("operation,time_us\n");
        let dataset = load_dataset(file.path()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns, vec!["operation", "time_us"]);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }), "{err:?}");
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }), "{err:?}");
    }

    #[test]
    fn missing_time_column_is_parse_error() {
        let file = csv_file("operation,key\nPUT,1\n");
        let err = load_dataset(file.path()).unwrap_err();
        match err {
            LoadError::Parse { line, reason, .. } => {
                assert_eq!(line, Some(1));
                assert_eq!(reason, "missing column 'time_us'");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_parse_error() {
        let file = csv_file("");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn non_numeric_time_reports_line() {
        let file = csv_file("operation,time_us\nPUT,10\nGET,fast\n");
        let err = load_dataset(file.path()).unwrap_err();
        match err {
            LoadError::Parse { line, reason, .. } => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("\"fast\""), "{reason}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_time_is_parse_error() {
        let file = csv_file("operation,time_us\nPUT,-4\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: Some(2), .. }), "{err:?}");
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let file = csv_file("operation,key,time_us\nPUT,1\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{err:?}");
    }
}
