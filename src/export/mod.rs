// src/export/mod.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::Path,
    sync::Arc,
};
use tracing::info;

use crate::process::{CleanRecord, COLUMNS};

/// Arrow schema of the cleaned table, in display column order.
pub fn clean_schema() -> Schema {
    let ty = |name: &str| match name {
        "tickets_sold" | "tickets_available" => (DataType::UInt64, false),
        "Revenue" => (DataType::Float64, false),
        "Cost_per_ticket" => (DataType::Float64, true),
        _ => (DataType::Utf8, true),
    };
    Schema::new(
        COLUMNS
            .iter()
            .map(|name| {
                let (dt, nullable) = ty(*name);
                Field::new(*name, dt, nullable)
            })
            .collect::<Vec<_>>(),
    )
}

/// Build one `RecordBatch` holding every record. Missing text and missing
/// cost per ticket become nulls.
pub fn to_record_batch(records: &[CleanRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        text_column(records, |r| r.city.as_deref()),
        text_column(records, |r| r.country.as_deref()),
        text_column(records, |r| r.venue.as_deref()),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.tickets_sold),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.tickets_available),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.revenue),
        )),
        Arc::new(
            records
                .iter()
                .map(|r| r.cost_per_ticket)
                .collect::<Float64Array>(),
        ),
        text_column(records, |r| r.tour.as_deref()),
        text_column(records, |r| r.opening_act.as_deref()),
    ];

    RecordBatch::try_new(Arc::new(clean_schema()), columns).context("building clean record batch")
}

fn text_column(records: &[CleanRecord], f: fn(&CleanRecord) -> Option<&str>) -> ArrayRef {
    Arc::new(records.iter().map(f).collect::<StringArray>())
}

/// Write `records` to a Brotli-compressed Parquet file and return its size.
#[tracing::instrument(level = "info", skip(records, output_path), fields(rows = records.len(), path = %output_path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(records: &[CleanRecord], output_path: P) -> Result<u64> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let batch = to_record_batch(records)?;
    let file = File::create(output_path)
        .with_context(|| format!("creating file {}", output_path.display()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(&batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    let bytes = fs::metadata(output_path)
        .context("getting file metadata")?
        .len();
    info!(bytes, "wrote parquet export");
    Ok(bytes)
}

/// Read a file written by [`write_parquet`] back into records.
///
/// Fails if the file's columns are not the cleaned table's columns.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Vec<CleanRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?
        .build()
        .context("building parquet reader")?;

    let expected = clean_schema();
    let mut out = Vec::new();
    for batch in reader {
        let batch = batch.context("reading parquet batch")?;
        let names: Vec<&str> = batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        if names != COLUMNS {
            bail!("{} is not a cleaned tour table (columns {:?})", path.display(), names);
        }
        for (i, field) in expected.fields().iter().enumerate() {
            if batch.column(i).data_type() != field.data_type() {
                bail!(
                    "column {} has type {}, expected {}",
                    field.name(),
                    batch.column(i).data_type(),
                    field.data_type()
                );
            }
        }
        out.extend(records_from_batch(&batch)?);
    }
    Ok(out)
}

fn records_from_batch(batch: &RecordBatch) -> Result<Vec<CleanRecord>> {
    fn col<'a, T: 'static>(batch: &'a RecordBatch, i: usize) -> Result<&'a T> {
        batch
            .column(i)
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| anyhow!("unexpected array type for column {}", COLUMNS[i]))
    }
    let text = |a: &StringArray, row: usize| a.is_valid(row).then(|| a.value(row).to_string());

    let city = col::<StringArray>(batch, 0)?;
    let country = col::<StringArray>(batch, 1)?;
    let venue = col::<StringArray>(batch, 2)?;
    let sold = col::<UInt64Array>(batch, 3)?;
    let available = col::<UInt64Array>(batch, 4)?;
    let revenue = col::<Float64Array>(batch, 5)?;
    let cost = col::<Float64Array>(batch, 6)?;
    let tour = col::<StringArray>(batch, 7)?;
    let act = col::<StringArray>(batch, 8)?;

    Ok((0..batch.num_rows())
        .map(|row| CleanRecord {
            city: text(city, row),
            country: text(country, row),
            venue: text(venue, row),
            tickets_sold: sold.value(row),
            tickets_available: available.value(row),
            revenue: revenue.value(row),
            cost_per_ticket: cost.is_valid(row).then(|| cost.value(row)),
            tour: text(tour, row),
            opening_act: text(act, row),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn records() -> Vec<CleanRecord> {
        vec![
            CleanRecord {
                city: Some("Glendale".into()),
                tickets_sold: 500,
                tickets_available: 600,
                revenue: 10_000.0,
                cost_per_ticket: Some(20.0),
                tour: Some("Eras".into()),
                opening_act: Some("Muna".into()),
                ..Default::default()
            },
            CleanRecord {
                city: Some("Tokyo".into()),
                tour: Some("Reputation".into()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn batch_has_display_columns_and_nulls() -> Result<()> {
        let batch = to_record_batch(&records())?;
        assert_eq!(batch.num_rows(), 2);
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, COLUMNS);

        let cost = batch
            .column(6)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(cost.value(0), 20.0);
        assert!(cost.is_null(1));

        let country = batch.column(1);
        assert_eq!(country.null_count(), 2);
        Ok(())
    }

    #[test]
    fn parquet_round_trip_keeps_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out").join("clean.parquet");
        let bytes = write_parquet(&records(), &path)?;
        assert!(bytes > 0);

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let mut rows = 0;
        let mut null_costs = 0;
        for batch in reader {
            let batch = batch?;
            rows += batch.num_rows();
            null_costs += batch.column(6).null_count();
        }
        assert_eq!(rows, 2);
        assert_eq!(null_costs, 1);

        assert_eq!(read_parquet(&path)?, records());
        Ok(())
    }

    #[test]
    fn rejects_foreign_parquet() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("other.parquet");
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::UInt64, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(UInt64Array::from(vec![1u64, 2])) as ArrayRef],
        )?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        assert!(read_parquet(&path).is_err());
        Ok(())
    }
}
