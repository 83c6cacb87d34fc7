// src/dataset/mod.rs

pub mod cache;
pub mod date_parser;
pub mod load;
pub mod prepare;
pub mod schema;
pub mod utils;

use std::path::Path;

pub use cache::DatasetCache;
pub use load::load_raw;
pub use prepare::{prepare, PrepareReport, PreparedTable, MOVIE};

use crate::error::ChartResult;

/// Read `path` and derive the prepared table in one step.
pub fn load_prepared<P: AsRef<Path>>(path: P) -> ChartResult<PreparedTable> {
    let raw = load_raw(path)?;
    prepare(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{aggregate_id, ChartId};
    use crate::error::ChartError;
    use crate::test_support::{init_test_logging, write_csv};
    use arrow::{
        array::{ArrayRef, StringArray},
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };
    use parquet::arrow::ArrowWriter;
    use std::{fs, fs::File, sync::Arc};
    use tempfile::tempdir;

    const ROWS: [&str; 3] = [
        r#"Movie,"United States, India",2020,90 min,"Dramas, Comedies",PG,"September 25, 2021""#,
        r#"TV Show,,2019,2 Seasons,Kids' TV,,"#,
        r#"Movie,Japan,2018,,Anime Features,TV-14," August 4, 2017""#,
    ];

    #[test]
    fn csv_without_release_year_is_schema_error() -> anyhow::Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = dir.path().join("titles.csv");
        fs::write(
            &path,
            "type,country,duration,listed_in,rating,date_added\nMovie,France,90 min,Dramas,R,\n",
        )?;
        let err = load_prepared(&path).unwrap_err();
        assert!(matches!(err, ChartError::Schema(ref m) if m.contains("release_year")));
        assert!(err.is_fatal());
        Ok(())
    }

    #[test]
    fn csv_pipeline_end_to_end() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = write_csv(dir.path(), "titles.csv", &ROWS)?;
        let table = load_prepared(&path)?;

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.main_countries().value(1), "Unknown");
        assert_eq!(table.added_months().value(2), 8);
        assert_eq!(table.report().unparsed_dates, 1);
        Ok(())
    }

    #[test]
    fn parquet_and_csv_agree() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let csv_path = write_csv(dir.path(), "titles.csv", &ROWS)?;
        let from_csv = load_prepared(&csv_path)?;

        // write the same raw table as Parquet
        let raw = load_raw(&csv_path)?;
        let pq_path = dir.path().join("titles.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&pq_path)?, raw.schema(), None)?;
        writer.write(&raw)?;
        writer.close()?;
        let from_parquet = load_prepared(&pq_path)?;

        for id in ChartId::ALL {
            let a = aggregate_id(id, &from_csv)?;
            let b = aggregate_id(id, &from_parquet)?;
            assert_eq!(a.table, b.table, "{id}");
        }
        Ok(())
    }

    #[test]
    fn typed_parquet_year_column_is_accepted() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("typed.parquet");
        let text = |v: &str| Arc::new(StringArray::from(vec![v])) as ArrayRef;
        let schema = Arc::new(Schema::new(vec![
            Field::new("type", DataType::Utf8, true),
            Field::new("country", DataType::Utf8, true),
            Field::new("release_year", DataType::Float64, true),
            Field::new("duration", DataType::Utf8, true),
            Field::new("listed_in", DataType::Utf8, true),
            Field::new("rating", DataType::Utf8, true),
            Field::new("date_added", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                text("Movie"),
                text("Spain"),
                Arc::new(arrow::array::Float64Array::from(vec![2016.0])) as ArrayRef,
                text("100 min"),
                text("Dramas"),
                text("R"),
                text("2020-03-01"),
            ],
        )?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let table = load_prepared(&path)?;
        assert_eq!(table.release_years().value(0), 2016);
        assert_eq!(table.added_months().value(0), 3);
        Ok(())
    }
}
