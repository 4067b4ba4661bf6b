mod normalizer;
mod parser;

use crate::counselling::domain::Dataset;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const DISTRICTS_FILE: &str = "Districts.csv";
pub const COLLEGES_FILE: &str = "Colleges-info.csv";
pub const BRANCHES_FILE: &str = "Branches.csv";
pub const CUTOFF_FILE: &str = "Cutoff.csv";

#[derive(Debug)]
pub enum IngestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        file: &'static str,
        source: csv::Error,
    },
    MissingKey {
        file: &'static str,
        line: u64,
        column: &'static str,
    },
    MalformedValue {
        file: &'static str,
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            IngestError::Csv { file, source } => write!(f, "invalid CSV data in {file}: {source}"),
            IngestError::MissingKey { file, line, column } => {
                write!(f, "{file} line {line}: required column '{column}' is empty")
            }
            IngestError::MalformedValue {
                file,
                line,
                column,
                value,
            } => write!(
                f,
                "{file} line {line}: '{value}' is not a valid value for '{column}'"
            ),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io { source, .. } => Some(source),
            IngestError::Csv { source, .. } => Some(source),
            IngestError::MissingKey { .. } | IngestError::MalformedValue { .. } => None,
        }
    }
}

/// Reads the four counselling tables of one year.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads `<data_dir>/<year>/{Districts,Colleges-info,Branches,Cutoff}.csv`.
    pub fn from_dir<P: AsRef<Path>>(data_dir: P, year: u16) -> Result<Dataset, IngestError> {
        let year_dir = data_dir.as_ref().join(year.to_string());
        let open = |name: &str| {
            let path = year_dir.join(name);
            File::open(&path).map_err(|source| IngestError::Io { path, source })
        };

        Self::from_readers(
            year,
            open(DISTRICTS_FILE)?,
            open(COLLEGES_FILE)?,
            open(BRANCHES_FILE)?,
            open(CUTOFF_FILE)?,
        )
    }

    pub fn from_readers<D, C, B, X>(
        year: u16,
        districts: D,
        colleges: C,
        branches: B,
        cutoff: X,
    ) -> Result<Dataset, IngestError>
    where
        D: Read,
        C: Read,
        B: Read,
        X: Read,
    {
        Ok(Dataset {
            year,
            districts: parser::parse_districts(districts, DISTRICTS_FILE)?,
            colleges: parser::parse_colleges(colleges, COLLEGES_FILE)?,
            branches: parser::parse_branches(branches, BRANCHES_FILE)?,
            cutoffs: parser::parse_cutoffs(cutoff, CUTOFF_FILE, year)?,
        })
    }
}
