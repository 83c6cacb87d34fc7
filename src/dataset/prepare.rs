use arrow::{
    array::{
        Array, ArrayRef, Date32Builder, Float64Array, Float64Builder, Int32Array,
        Int32Builder, Int64Array, Int64Builder, StringArray, StringBuilder,
    },
    compute::cast,
    datatypes::DataType,
    record_batch::RecordBatch,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::dataset::date_parser::{month_of, parse_added_date, to_date32};
use crate::dataset::schema::{
    check_required, prepared_schema, COUNTRY, DATE_ADDED, DERIVED_COLUMNS, DURATION, LISTED_IN,
    RATING, RELEASE_YEAR, TYPE,
};
use crate::dataset::utils::{clean_str, main_country, parse_year, present, split_duration, UNKNOWN};
use crate::error::{ChartError, ChartResult};

/// Value of `type` for films; everything else is treated as a series.
pub const MOVIE: &str = "Movie";

/// Per-row gaps seen while preparing. None of them are errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    pub rows: usize,
    pub unknown_countries: usize,
    pub missing_durations: usize,
    pub unparsed_dates: usize,
    /// Movies whose unit is not `min`, or series whose unit is.
    pub unit_mismatches: usize,
}

/// The raw table plus derived fields. Immutable once built.
#[derive(Debug, Clone)]
pub struct PreparedTable {
    batch: RecordBatch,
    types: StringArray,
    release_years: Int64Array,
    main_countries: StringArray,
    ratings: StringArray,
    listed_in: StringArray,
    duration_values: Float64Array,
    duration_units: StringArray,
    added_months: Int32Array,
    report: PrepareReport,
}

impl PreparedTable {
    /// Full prepared table as a single Arrow batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn report(&self) -> &PrepareReport {
        &self.report
    }

    pub fn types(&self) -> &StringArray {
        &self.types
    }

    pub fn release_years(&self) -> &Int64Array {
        &self.release_years
    }

    pub fn main_countries(&self) -> &StringArray {
        &self.main_countries
    }

    /// Null where the source had no rating.
    pub fn ratings(&self) -> &StringArray {
        &self.ratings
    }

    pub fn listed_in(&self) -> &StringArray {
        &self.listed_in
    }

    pub fn duration_values(&self) -> &Float64Array {
        &self.duration_values
    }

    pub fn duration_units(&self) -> &StringArray {
        &self.duration_units
    }

    pub fn added_months(&self) -> &Int32Array {
        &self.added_months
    }

    pub fn is_movie(&self, row: usize) -> bool {
        self.types.value(row) == MOVIE
    }
}

/// Build the prepared table from a raw batch.
///
/// Fails with `ChartError::Schema` if a required column is missing or if any
/// `release_year` cell cannot be read as an integer. Nothing partial is
/// returned on failure.
#[tracing::instrument(level = "info", skip(raw), fields(rows = raw.num_rows()))]
pub fn prepare(raw: &RecordBatch) -> ChartResult<PreparedTable> {
    let raw_schema = raw.schema();
    check_required(&raw_schema)?;

    let mut report = PrepareReport {
        rows: raw.num_rows(),
        ..PrepareReport::default()
    };

    let release_years = coerce_years(&text_column(raw, RELEASE_YEAR)?)?;

    let types: StringArray = text_column(raw, TYPE)?
        .iter()
        .map(|cell| Some(present(cell).unwrap_or_else(|| UNKNOWN.to_string())))
        .collect();

    let countries = text_column(raw, COUNTRY)?;
    let main_countries: StringArray = countries
        .iter()
        .map(|cell| {
            if present(cell).is_none() {
                report.unknown_countries += 1;
            }
            Some(main_country(cell))
        })
        .collect();

    let durations = text_column(raw, DURATION)?;
    let mut values = Float64Builder::with_capacity(raw.num_rows());
    let mut units = StringBuilder::new();
    for (row, cell) in durations.iter().enumerate() {
        let (value, unit) = split_duration(cell);
        if value.is_none() {
            report.missing_durations += 1;
        }
        if let Some(u) = unit.as_deref() {
            let is_movie = types.value(row) == MOVIE;
            if is_movie != (u == "min") {
                report.unit_mismatches += 1;
                debug!(row, kind = types.value(row), unit = u, "duration unit does not match type");
            }
        }
        values.append_option(value);
        units.append_option(unit);
    }
    let duration_values = values.finish();
    let duration_units = units.finish();

    let mut dates = Date32Builder::with_capacity(raw.num_rows());
    let mut months = Int32Builder::with_capacity(raw.num_rows());
    for cell in text_column(raw, DATE_ADDED)?.iter() {
        let date = cell.and_then(parse_added_date);
        if date.is_none() {
            report.unparsed_dates += 1;
        }
        dates.append_option(date.map(to_date32));
        months.append_option(date.map(month_of));
    }
    let dates_added = dates.finish();
    let added_months = months.finish();

    let ratings = trimmed(&text_column(raw, RATING)?);
    let listed_in = trimmed(&text_column(raw, LISTED_IN)?);

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(raw.num_columns() + 4);
    for (idx, field) in raw_schema.fields().iter().enumerate() {
        let name = field.name().as_str();
        if DERIVED_COLUMNS.contains(&name) {
            continue;
        }
        let col: ArrayRef = match name {
            RELEASE_YEAR => Arc::new(release_years.clone()),
            TYPE => Arc::new(types.clone()),
            DATE_ADDED => Arc::new(dates_added.clone()),
            RATING => Arc::new(ratings.clone()),
            LISTED_IN => Arc::new(listed_in.clone()),
            _ => Arc::new(trimmed(&as_text(raw.column(idx), name)?)),
        };
        columns.push(col);
    }
    columns.push(Arc::new(main_countries.clone()));
    columns.push(Arc::new(duration_values.clone()));
    columns.push(Arc::new(duration_units.clone()));
    columns.push(Arc::new(added_months.clone()));

    let batch = RecordBatch::try_new(Arc::new(prepared_schema(&raw_schema)), columns)?;

    info!(
        rows = report.rows,
        unknown_countries = report.unknown_countries,
        missing_durations = report.missing_durations,
        unparsed_dates = report.unparsed_dates,
        unit_mismatches = report.unit_mismatches,
        "prepared table"
    );

    Ok(PreparedTable {
        batch,
        types,
        release_years,
        main_countries,
        ratings,
        listed_in,
        duration_values,
        duration_units,
        added_months,
        report,
    })
}

/// Every row must coerce; one bad cell rejects the whole dataset.
fn coerce_years(cells: &StringArray) -> ChartResult<Int64Array> {
    let mut years = Int64Builder::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match cell.and_then(parse_year) {
            Some(year) => years.append_value(year),
            None => {
                return Err(ChartError::Schema(format!(
                    "{RELEASE_YEAR} is not an integer at row {row}: {:?}",
                    cell.unwrap_or("")
                )))
            }
        }
    }
    Ok(years.finish())
}

fn text_column(raw: &RecordBatch, name: &str) -> ChartResult<StringArray> {
    let col = raw
        .column_by_name(name)
        .ok_or_else(|| ChartError::Schema(format!("missing required column(s): {name}")))?;
    as_text(col, name)
}

fn as_text(col: &ArrayRef, name: &str) -> ChartResult<StringArray> {
    let text = cast(col, &DataType::Utf8)?;
    text.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| ChartError::Schema(format!("column `{name}` cannot be read as text")))
}

/// Clean every cell; blank cells become null.
fn trimmed(cells: &StringArray) -> StringArray {
    cells
        .iter()
        .map(|cell| cell.map(clean_str).filter(|s| !s.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::{ADDED_MONTH, DURATION_UNIT, DURATION_VALUE, MAIN_COUNTRY};
    use crate::test_support::{raw_batch, title};
    use arrow::datatypes::{Field, Schema};

    #[test]
    fn derives_fields() -> anyhow::Result<()> {
        let raw = raw_batch(&[
            title("Movie", "United States, India", "2020", "90 min", "Dramas", "PG", "September 25, 2021"),
            title("TV Show", "", "2019", "2 Seasons", "Kids' TV", "", "not a date"),
            title("Movie", "Japan", "2018", "", "Anime Features", "TV-14", ""),
        ]);
        let table = prepare(&raw)?;

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.main_countries().value(0), "United States");
        assert_eq!(table.main_countries().value(1), UNKNOWN);

        assert_eq!(table.duration_values().value(0), 90.0);
        assert_eq!(table.duration_units().value(0), "min");
        assert_eq!(table.duration_values().value(1), 2.0);
        assert_eq!(table.duration_units().value(1), "Seasons");
        assert!(table.duration_values().is_null(2));
        assert!(table.duration_units().is_null(2));

        assert_eq!(table.added_months().value(0), 9);
        assert!(table.added_months().is_null(1));
        assert!(table.added_months().is_null(2));
        assert!(table.ratings().is_null(1));

        assert_eq!(table.release_years().values().to_vec(), vec![2020, 2019, 2018]);

        assert_eq!(
            table.report(),
            &PrepareReport {
                rows: 3,
                unknown_countries: 1,
                missing_durations: 1,
                unparsed_dates: 2,
                unit_mismatches: 0,
            }
        );
        Ok(())
    }

    #[test]
    fn prepared_batch_carries_derived_columns() -> anyhow::Result<()> {
        let raw = raw_batch(&[title("Movie", "France", "2001", "100 min", "Dramas", "R", "2020-01-02")]);
        let table = prepare(&raw)?;
        let schema = table.batch().schema();
        for name in [MAIN_COUNTRY, DURATION_VALUE, DURATION_UNIT, ADDED_MONTH] {
            assert!(schema.index_of(name).is_ok(), "missing {name}");
        }
        assert_eq!(
            schema.field_with_name(RELEASE_YEAR)?.data_type(),
            &DataType::Int64
        );

        let added = table
            .batch()
            .column_by_name(DATE_ADDED)
            .unwrap()
            .as_any()
            .downcast_ref::<arrow::array::Date32Array>()
            .unwrap()
            .value_as_date(0);
        assert_eq!(added, chrono::NaiveDate::from_ymd_opt(2020, 1, 2));
        Ok(())
    }

    #[test]
    fn unit_mismatch_is_counted_not_rejected() -> anyhow::Result<()> {
        let raw = raw_batch(&[
            title("Movie", "France", "2001", "1 Season", "Dramas", "R", ""),
            title("TV Show", "France", "2001", "45 min", "Dramas", "R", ""),
        ]);
        let table = prepare(&raw)?;
        assert_eq!(table.report().unit_mismatches, 2);
        assert_eq!(table.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn missing_release_year_column_is_schema_error() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(TYPE, DataType::Utf8, true),
            Field::new(COUNTRY, DataType::Utf8, true),
            Field::new(DURATION, DataType::Utf8, true),
            Field::new(LISTED_IN, DataType::Utf8, true),
            Field::new(RATING, DataType::Utf8, true),
            Field::new(DATE_ADDED, DataType::Utf8, true),
        ]));
        let cols: Vec<ArrayRef> = (0..6)
            .map(|_| Arc::new(StringArray::from(vec![Some("x")])) as ArrayRef)
            .collect();
        let raw = RecordBatch::try_new(schema, cols).unwrap();

        let err = prepare(&raw).unwrap_err();
        assert!(matches!(err, ChartError::Schema(ref m) if m.contains(RELEASE_YEAR)));
    }

    #[test]
    fn one_bad_year_rejects_dataset() {
        let raw = raw_batch(&[
            title("Movie", "France", "2001", "90 min", "Dramas", "R", ""),
            title("Movie", "France", "n/a", "90 min", "Dramas", "R", ""),
        ]);
        let err = prepare(&raw).unwrap_err();
        assert!(matches!(err, ChartError::Schema(ref m) if m.contains("row 1")));
    }

    #[test]
    fn missing_type_becomes_unknown() -> anyhow::Result<()> {
        let raw = raw_batch(&[title("", "France", "2001", "90 min", "Dramas", "R", "")]);
        let table = prepare(&raw)?;
        assert_eq!(table.types().value(0), UNKNOWN);
        assert!(!table.is_movie(0));
        Ok(())
    }
}
