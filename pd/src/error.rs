//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the template repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Invalid source pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {path} as {tried}")]
    Decode { path: PathBuf, tried: String },

    #[error("Malformed table in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Row {row} of {path} has {found} fields, header declares {expected}")]
    RowTooLong {
        path: PathBuf,
        row: u64,
        found: usize,
        expected: usize,
    },

    #[error("Cannot map columns of {path}: {source}")]
    Columns {
        path: PathBuf,
        #[source]
        source: ColumnError,
    },
}

/// Outcome of resolving one required column by keyword
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("no column name contains '{keyword}'")]
    Missing { keyword: &'static str },

    #[error("column keyword '{keyword}' matches several columns: {}", .candidates.join(", "))]
    Ambiguous {
        keyword: &'static str,
        candidates: Vec<String>,
    },
}

/// Errors in user-supplied placeholder values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Expected NAME=VALUE, got '{0}'")]
    MissingSeparator(String),
}
