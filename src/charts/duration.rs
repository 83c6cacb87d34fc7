//! Charts built on `duration_value`. Rows without a numeric duration never
//! reach these aggregations.

use arrow::{
    array::{Array, ArrayRef, Int64Array, StringArray},
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::warn;

use crate::charts::counts::{grouped_means, value_table};
use crate::dataset::{
    schema::{DURATION_VALUE, RATING, TYPE},
    PreparedTable,
};
use crate::error::ChartResult;

pub const DECADE: &str = "decade";

fn duration_at(table: &PreparedTable, row: usize) -> Option<f64> {
    let values = table.duration_values();
    values.is_valid(row).then(|| values.value(row))
}

/// Movie rows with a duration, as `(row, minutes)`.
fn movie_rows(table: &PreparedTable) -> impl Iterator<Item = (usize, f64)> + '_ {
    (0..table.num_rows())
        .filter(move |&row| table.is_movie(row))
        .filter_map(move |row| duration_at(table, row).map(|d| (row, d)))
}

/// `floor(year / 10) * 10`, or `None` for the few years near `i64::MIN`
/// whose decade is not representable.
pub fn decade_of(year: i64) -> Option<i64> {
    year.div_euclid(10).checked_mul(10)
}

/// fig6: one row per movie with a duration; not reduced.
pub fn movie_durations(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let values: Vec<f64> = movie_rows(table).map(|(_, d)| d).collect();
    value_table(
        Vec::new(),
        Field::new(DURATION_VALUE, DataType::Float64, false),
        values,
    )
}

/// fig7: mean movie duration per release decade, ascending.
///
/// A year without a representable decade is left out and logged.
pub fn mean_duration_by_decade(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let years = table.release_years();
    let means = grouped_means(movie_rows(table).filter_map(|(row, d)| {
        let year = years.value(row);
        let decade = decade_of(year);
        if decade.is_none() {
            warn!(row, year, "release year has no decade, skipped");
        }
        decade.map(|decade| (decade, d))
    }));
    let (decades, values): (Vec<i64>, Vec<f64>) = means.into_iter().unzip();
    value_table(
        vec![(
            Field::new(DECADE, DataType::Int64, false),
            Arc::new(Int64Array::from(decades)) as ArrayRef,
        )],
        Field::new(DURATION_VALUE, DataType::Float64, false),
        values,
    )
}

/// fig10: mean duration per `(rating, type)`, ordered by rating then type.
///
/// Rows without a rating form no group. Minutes and seasons are averaged
/// within their own type only, since type is part of the key.
pub fn mean_duration_by_rating_and_type(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let ratings = table.ratings();
    let types = table.types();
    let pairs = (0..table.num_rows()).filter_map(|row| {
        let d = duration_at(table, row)?;
        ratings
            .is_valid(row)
            .then(|| ((ratings.value(row), types.value(row)), d))
    });
    let means = grouped_means(pairs);

    let mut rating_col = Vec::with_capacity(means.len());
    let mut type_col = Vec::with_capacity(means.len());
    let mut values = Vec::with_capacity(means.len());
    for ((rating, kind), mean) in means {
        rating_col.push(rating);
        type_col.push(kind);
        values.push(mean);
    }

    value_table(
        vec![
            (
                Field::new(RATING, DataType::Utf8, false),
                Arc::new(StringArray::from(rating_col)) as ArrayRef,
            ),
            (
                Field::new(TYPE, DataType::Utf8, false),
                Arc::new(StringArray::from(type_col)) as ArrayRef,
            ),
        ],
        Field::new(DURATION_VALUE, DataType::Float64, false),
        values,
    )
}
