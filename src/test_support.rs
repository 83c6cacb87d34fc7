//! Fixtures shared by the unit tests.

use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::dataset::{prepare, schema::REQUIRED_COLUMNS, PreparedTable};

pub const FIXTURE_HEADER: &str = "type,country,release_year,duration,listed_in,rating,date_added";

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,catalogcharts=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Fields in `FIXTURE_HEADER` order. Empty strings stand for missing cells.
pub fn title<'a>(
    kind: &'a str,
    country: &'a str,
    release_year: &'a str,
    duration: &'a str,
    listed_in: &'a str,
    rating: &'a str,
    date_added: &'a str,
) -> [&'a str; 7] {
    [kind, country, release_year, duration, listed_in, rating, date_added]
}

/// In-memory raw batch, the shape `load_raw` produces.
pub fn raw_batch(rows: &[[&str; 7]]) -> RecordBatch {
    let fields: Vec<Field> = REQUIRED_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    let columns: Vec<ArrayRef> = (0..REQUIRED_COLUMNS.len())
        .map(|col| {
            let cells: StringArray = rows
                .iter()
                .map(|row| Some(row[col]).filter(|s| !s.is_empty()))
                .collect();
            Arc::new(cells) as ArrayRef
        })
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).expect("valid fixture batch")
}

pub fn prepared(rows: &[[&str; 7]]) -> PreparedTable {
    prepare(&raw_batch(rows)).expect("fixture prepares")
}

/// Write a CSV with `FIXTURE_HEADER` and the given pre-formatted lines.
pub fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let mut body = String::from(FIXTURE_HEADER);
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(&path, body)?;
    Ok(path)
}
