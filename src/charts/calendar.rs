use arrow::{
    array::Int32Array,
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::charts::counts::{count_table, grouped_counts};
use crate::dataset::{schema::ADDED_MONTH, PreparedTable};
use crate::error::ChartResult;

/// fig9: titles added per calendar month, 1..=12 ascending.
/// Rows whose `date_added` did not parse are skipped.
pub fn added_per_month(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let counts = grouped_counts(table.added_months().iter().flatten());
    let (months, n): (Vec<i32>, Vec<i64>) = counts.into_iter().unzip();
    count_table(
        Field::new(ADDED_MONTH, DataType::Int32, false),
        Arc::new(Int32Array::from(months)),
        n,
    )
}
