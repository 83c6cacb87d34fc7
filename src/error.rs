// src/error.rs

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything the dataset and chart layers can fail with.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The source file could not be read or decoded. Fatal.
    #[error("failed to load dataset: {0}")]
    DataLoad(#[from] DataLoadError),

    /// A required column is missing or not globally coercible. Fatal.
    #[error("schema error: {0}")]
    Schema(String),

    /// The selection is not one of `fig1`..`fig10`. Rejects only that request.
    #[error("unknown chart id `{0}`")]
    UnknownChartId(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("cannot read Parquet {}: {source}", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },

    #[error("unsupported file type for {} (expected .csv or .parquet)", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl ChartError {
    /// Fatal errors abort preparation; everything else only rejects one request.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ChartError::UnknownChartId(_))
    }
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;
