use arrow::datatypes::{DataType, Field, Schema};

use crate::error::{ChartError, ChartResult};

pub const TYPE: &str = "type";
pub const COUNTRY: &str = "country";
pub const RELEASE_YEAR: &str = "release_year";
pub const DURATION: &str = "duration";
pub const LISTED_IN: &str = "listed_in";
pub const RATING: &str = "rating";
pub const DATE_ADDED: &str = "date_added";

pub const MAIN_COUNTRY: &str = "main_country";
pub const DURATION_VALUE: &str = "duration_value";
pub const DURATION_UNIT: &str = "duration_unit";
pub const ADDED_MONTH: &str = "added_month";

/// Columns every source must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    TYPE,
    COUNTRY,
    RELEASE_YEAR,
    DURATION,
    LISTED_IN,
    RATING,
    DATE_ADDED,
];

/// Columns computed during preparation. Raw columns with these names are dropped.
pub const DERIVED_COLUMNS: [&str; 4] = [MAIN_COUNTRY, DURATION_VALUE, DURATION_UNIT, ADDED_MONTH];

/// Fail with every missing required column named at once.
pub fn check_required(schema: &Schema) -> ChartResult<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_err())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChartError::Schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

/// Final schema of the prepared table: the raw columns (with `release_year`,
/// `type` and `date_added` retyped) followed by the derived ones.
pub fn prepared_schema(raw: &Schema) -> Schema {
    let mut fields: Vec<Field> = raw
        .fields()
        .iter()
        .filter(|f| !DERIVED_COLUMNS.contains(&f.name().as_str()))
        .map(|f| match f.name().as_str() {
            RELEASE_YEAR => Field::new(RELEASE_YEAR, DataType::Int64, false),
            TYPE => Field::new(TYPE, DataType::Utf8, false),
            DATE_ADDED => Field::new(DATE_ADDED, DataType::Date32, true),
            name => Field::new(name, DataType::Utf8, true),
        })
        .collect();
    fields.push(Field::new(MAIN_COUNTRY, DataType::Utf8, false));
    fields.push(Field::new(DURATION_VALUE, DataType::Float64, true));
    fields.push(Field::new(DURATION_UNIT, DataType::Utf8, true));
    fields.push(Field::new(ADDED_MONTH, DataType::Int32, true));
    Schema::new(fields)
}
