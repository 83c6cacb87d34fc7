use arrow::{
    array::ArrayRef,
    compute::{cast, concat_batches},
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema, SchemaRef},
    error::ArrowError,
    record_batch::RecordBatch,
};
use parquet::{arrow::arrow_reader::ParquetRecordBatchReaderBuilder, errors::ParquetError};
use std::{
    fs::File,
    io::Seek,
    path::Path,
    sync::Arc,
};
use tracing::{debug, info};

use crate::error::{ChartResult, DataLoadError};

/// Read the source at `path` into a single batch of nullable Utf8 columns.
///
/// `.csv` goes through the Arrow CSV reader (header row required);
/// `.parquet` through the Parquet Arrow reader, with every column cast to
/// Utf8 so both formats feed the same preparation step.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_raw<P: AsRef<Path>>(path: P) -> ChartResult<RecordBatch> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let batch = match ext.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("parquet") => read_parquet(path)?,
        _ => return Err(DataLoadError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded raw table"
    );
    Ok(batch)
}

fn read_csv(path: &Path) -> Result<RecordBatch, DataLoadError> {
    let io_err = |source: std::io::Error| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: ArrowError| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;

    // Only the header matters here; every column is read as text.
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(1))
        .map_err(csv_err)?;
    file.rewind().map_err(io_err)?;

    let schema = utf8_schema(&inferred);
    debug!(columns = ?column_names(&schema), "csv header");

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_quote(b'"')
        .with_delimiter(b',')
        .with_truncated_rows(true)
        .build(file)
        .map_err(csv_err)?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;
    concat_batches(&schema, &batches).map_err(csv_err)
}

fn read_parquet(path: &Path) -> Result<RecordBatch, DataLoadError> {
    let pq_err = |source: ParquetError| DataLoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(pq_err)?;
    let schema = utf8_schema(builder.schema());
    let reader = builder.build().map_err(pq_err)?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch = batch
            .and_then(|b| to_utf8_batch(&b, &schema))
            .map_err(|e| pq_err(ParquetError::from(e)))?;
        batches.push(batch);
    }
    concat_batches(&schema, &batches).map_err(|e| pq_err(ParquetError::from(e)))
}

/// Same column names, every field nullable Utf8.
fn utf8_schema(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

fn to_utf8_batch(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch, ArrowError> {
    let columns = batch
        .columns()
        .iter()
        .map(|col| match col.data_type() {
            DataType::Utf8 => Ok(col.clone()),
            _ => cast(col, &DataType::Utf8),
        })
        .collect::<Result<Vec<ArrayRef>, _>>()?;
    RecordBatch::try_new(schema.clone(), columns)
}

fn column_names(schema: &Schema) -> Vec<&str> {
    schema.fields().iter().map(|f| f.name().as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::test_support::{init_test_logging, write_csv, FIXTURE_HEADER};
    use arrow::array::{Int64Array, StringArray};
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    #[test]
    fn csv_columns_are_text() -> anyhow::Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = write_csv(
            dir.path(),
            "titles.csv",
            &[r#"Movie,"United States, India",2020,90 min,"Dramas, Comedies",PG,"September 25, 2021""#],
        )?;

        let batch = load_raw(&path)?;
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(
            column_names(&batch.schema()),
            FIXTURE_HEADER.split(',').collect::<Vec<_>>()
        );
        for field in batch.schema().fields() {
            assert_eq!(field.data_type(), &DataType::Utf8);
        }
        let country = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(country.value(0), "United States, India");
        Ok(())
    }

    #[test]
    fn parquet_columns_are_cast_to_text() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("titles.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("type", DataType::Utf8, true),
            Field::new("release_year", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Movie", "TV Show"])) as ArrayRef,
                Arc::new(Int64Array::from(vec![1999, 2021])) as ArrayRef,
            ],
        )?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let loaded = load_raw(&path)?;
        assert_eq!(loaded.num_rows(), 2);
        let years = loaded
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(years.value(1), "2021");
        Ok(())
    }

    #[test]
    fn missing_file_is_data_load_error() {
        let err = load_raw("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(
            err,
            ChartError::DataLoad(DataLoadError::Io { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_raw("titles.xlsx").unwrap_err();
        assert!(matches!(
            err,
            ChartError::DataLoad(DataLoadError::UnsupportedFormat(_))
        ));
    }
}
