//! Whole-catalog breakdowns: type, release year, rating, genre.

use arrow::{
    array::{ArrayRef, Int64Array, StringArray},
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::charts::counts::{count_table, grouped_counts, value_counts};
use crate::dataset::{
    schema::{RATING, RELEASE_YEAR, TYPE},
    utils::{split_genres, UNKNOWN},
    PreparedTable,
};
use crate::error::ChartResult;

pub const GENRE: &str = "genre";

/// fig1: titles per `type`.
pub fn type_counts(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let counts = value_counts(table.types().iter().flatten());
    text_counts(TYPE, counts)
}

/// fig2: titles per release year, ascending. Years with no titles are absent.
pub fn titles_per_year(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let counts = grouped_counts(table.release_years().values().iter().copied());
    let (years, n): (Vec<i64>, Vec<i64>) = counts.into_iter().unzip();
    count_table(
        Field::new(RELEASE_YEAR, DataType::Int64, false),
        Arc::new(Int64Array::from(years)),
        n,
    )
}

/// fig4: titles per rating, missing ratings counted as `Unknown`.
pub fn rating_counts(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let counts = value_counts(table.ratings().iter().map(|r| r.unwrap_or(UNKNOWN)));
    text_counts(RATING, counts)
}

/// fig5: one count per genre mention; a title listed under N genres adds 1 to each.
pub fn genre_counts(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let genres = table.listed_in().iter().flatten().flat_map(split_genres);
    text_counts(GENRE, value_counts(genres))
}

pub(crate) fn text_counts(key: &str, counts: Vec<(&str, i64)>) -> ChartResult<RecordBatch> {
    let (keys, n): (Vec<&str>, Vec<i64>) = counts.into_iter().unzip();
    count_table(
        Field::new(key, DataType::Utf8, false),
        Arc::new(StringArray::from(keys)) as ArrayRef,
        n,
    )
}
