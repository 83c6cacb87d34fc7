use arrow::record_batch::RecordBatch;

use crate::charts::{catalog::text_counts, counts::value_counts};
use crate::dataset::PreparedTable;
use crate::error::ChartResult;

pub const COUNTRY: &str = "country";
pub const TOP_COUNTRIES: usize = 10;

/// fig3: the ten countries with the most titles, by `main_country`.
pub fn top_countries(table: &PreparedTable) -> ChartResult<RecordBatch> {
    let mut counts = value_counts(table.main_countries().iter().flatten());
    counts.truncate(TOP_COUNTRIES);
    text_counts(COUNTRY, counts)
}

/// fig8: every country with its title count, keyed by country name for a map.
pub fn country_counts(table: &PreparedTable) -> ChartResult<RecordBatch> {
    text_counts(COUNTRY, value_counts(table.main_countries().iter().flatten()))
}
