use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::{
    ArrowTemporalType, DataType, Date32Type, Date64Type, Int16Type, Int8Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataFormatError;
use super::model::{CellValue, Dataset, RawRow};
use super::normalize::{check_columns, normalize};

/// Cells pandas' `read_csv` treats as missing by default.
const NA_TOKENS: [&str; 9] = ["NaN", "nan", "NA", "N/A", "n/a", "null", "NULL", "#N/A", "None"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a rental file and normalize it in one go.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataFormatError> {
    let rows = load_rows(path)?;
    let dataset = normalize(&rows)?;
    info!(
        "Loaded {} records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Read raw rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (the published format)
/// * `.json`    – `[{ "dteday": "2011-01-01", "season": 1, ... }, ...]`
/// * `.parquet` – flat columns with the same names as the CSV header
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, DataFormatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataFormatError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell type-guessed.
fn load_csv(path: &Path) -> Result<Vec<RawRow>, DataFormatError> {
    let csv_err = |source| DataFormatError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("CSV header: {headers:?}");
    check_columns(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value.trim())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<RawRow>, DataFormatError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataFormatError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root
        .as_array()
        .ok_or(DataFormatError::NotAnArray { row: 0 })?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or(DataFormatError::NotAnArray { row: i })?;
            let row: RawRow = obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect();
            Ok(row)
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per CSV header field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); dates may be stored as text, `date`
/// or timestamp columns.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>, DataFormatError> {
    let parquet_err = |source| DataFormatError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|source| arrow_err(path.to_path_buf(), source))?;
        let schema = batch.schema();
        let names: Vec<&String> = schema.fields().iter().map(|f| f.name()).collect();

        for row in 0..batch.num_rows() {
            let raw: RawRow = names
                .iter()
                .enumerate()
                .map(|(col_idx, name)| {
                    ((*name).clone(), extract_cell(batch.column(col_idx), row))
                })
                .collect();
            rows.push(raw);
        }
    }

    Ok(rows)
}

fn arrow_err(path: PathBuf, source: arrow::error::ArrowError) -> DataFormatError {
    DataFormatError::Arrow { path, source }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => CellValue::String(s.value(row).to_string()),
            None => CellValue::Null,
        },
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or_else(|_| CellValue::String(v.to_string()), CellValue::Integer)
        }
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map_or(CellValue::Null, |d| CellValue::String(d.to_string())),
        DataType::Date64 => datetime_cell::<Date64Type>(col, row),
        DataType::Timestamp(TimeUnit::Second, _) => datetime_cell::<TimestampSecondType>(col, row),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            datetime_cell::<TimestampMillisecondType>(col, row)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            datetime_cell::<TimestampMicrosecondType>(col, row)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            datetime_cell::<TimestampNanosecondType>(col, row)
        }
        other => CellValue::String(format!("{other:?}")),
    }
}

/// Temporal column as `YYYY-MM-DD HH:MM:SS` text; the time zone is ignored.
fn datetime_cell<T>(col: &Arc<dyn Array>, row: usize) -> CellValue
where
    T: ArrowTemporalType,
    i64: From<T::Native>,
{
    col.as_primitive::<T>()
        .value_as_datetime(row)
        .map_or(CellValue::Null, |dt| {
            CellValue::String(dt.format("%Y-%m-%d %H:%M:%S").to_string())
        })
}
