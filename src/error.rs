//! Errors raised while loading the benchmark CSV.
//!
//! Everything after loading propagates `anyhow::Error`; only the loader has a
//! typed taxonomy because `main` reports these two cases to the user and stops
//! without producing any output.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input path does not point at an existing file.
    #[error("CSV file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not the expected `operation,time_us` table.
    #[error("cannot parse {}{}: {reason}", .path.display(), line_suffix(.line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: Option<usize>, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Map a `csv` reader error, keeping the line number when the reader knows it.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize);
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => LoadError::Io {
                path: path.into(),
                source,
            },
            _ => LoadError::parse(path, line, reason),
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(":{}", n),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_message_includes_line_when_known() {
        let err = LoadError::parse("bench.csv", Some(7), "time_us is not a number: \"abc\"");
        assert_eq!(
            err.to_string(),
            "cannot parse bench.csv:7: time_us is not a number: \"abc\""
        );

        let err = LoadError::parse("bench.csv", None, "missing column 'operation'");
        assert_eq!(err.to_string(), "cannot parse bench.csv: missing column 'operation'");
    }

    #[test]
    fn not_found_message_names_path() {
        let err = LoadError::NotFound {
            path: PathBuf::from("missing/stats.csv"),
        };
        assert_eq!(err.to_string(), "CSV file 'missing/stats.csv' not found");
    }
}
