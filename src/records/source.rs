use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use thiserror::Error;

use super::RelationRecord;
use super::parse::parse_records;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read records from {origin}: {error}")]
    Io {
        origin: String,
        #[source]
        error: io::Error,
    },

    #[error("records are not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected record layout: {0}")]
    Format(String),

    #[error("upstream query failed: {0}")]
    Upstream(String),
}

pub trait RecordSource {
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<RelationRecord>, SourceError>;
}

/// Reads an exported query result from a file, or stdin when the path is `-`.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    fn read_raw(&self) -> Result<String, SourceError> {
        let io_error = |error| SourceError::Io {
            origin: self.describe(),
            error,
        };

        if self.is_stdin() {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).map_err(io_error)?;
            Ok(raw)
        } else {
            fs::read_to_string(&self.path).map_err(io_error)
        }
    }
}

impl RecordSource for JsonFileSource {
    fn describe(&self) -> String {
        if self.is_stdin() {
            "<stdin>".to_owned()
        } else {
            self.path.display().to_string()
        }
    }

    fn fetch(&self) -> Result<Vec<RelationRecord>, SourceError> {
        let raw = self.read_raw()?;
        parse_records(&raw)
    }
}
