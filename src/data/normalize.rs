use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;

use super::error::DataFormatError;
use super::model::{CellValue, Dataset, RawRow, Record, Season, Weather};

/// Columns every row must carry.  `hr` is optional: the daily file has none.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "dteday",
    "season",
    "weathersit",
    "temp",
    "hum",
    "windspeed",
    "casual",
    "cnt",
    "yr",
];

/// Fail with [`DataFormatError::MissingColumn`] (row 0) unless every
/// required column is among `columns`.  Used on file headers, so a file
/// without data rows is still rejected when its schema is wrong.
pub fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<(), DataFormatError> {
    let present: Vec<&str> = columns.into_iter().collect();
    match REQUIRED_COLUMNS.into_iter().find(|c| !present.contains(c)) {
        Some(column) => Err(DataFormatError::MissingColumn { row: 0, column }),
        None => Ok(()),
    }
}

/// Turn raw rows into [`Record`]s, deriving the weekday and category labels.
///
/// The load is atomic: the first bad row aborts with a [`DataFormatError`]
/// and nothing is returned.  Input order is preserved and `rows` is not
/// modified.
pub fn normalize(rows: &[RawRow]) -> Result<Dataset, DataFormatError> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("normalized {} rows", records.len());
    Ok(Dataset::new(records))
}

fn normalize_row(row_no: usize, row: &RawRow) -> Result<Record, DataFormatError> {
    let cell = move |column: &'static str| {
        row.get(column).ok_or(DataFormatError::MissingColumn {
            row: row_no,
            column,
        })
    };

    // All required columns present before anything is parsed.
    for column in REQUIRED_COLUMNS {
        cell(column)?;
    }

    let date = parse_date(cell("dteday")?).ok_or_else(|| DataFormatError::InvalidDate {
        row: row_no,
        raw: cell("dteday").map(|c| c.to_string()).unwrap_or_default(),
    })?;

    let season_code = parse_code(row_no, "season", cell("season")?)?;
    let weather_code = parse_code(row_no, "weathersit", cell("weathersit")?)?;
    let hour = match row.get("hr") {
        Some(c) => parse_code(row_no, "hr", c)?
            .map(|h| {
                u8::try_from(h)
                    .ok()
                    .filter(|h| *h < 24)
                    .ok_or_else(|| invalid(row_no, "hr", c))
            })
            .transpose()?,
        None => None,
    };

    Ok(Record {
        date,
        weekday: date.weekday(),
        season_code,
        season: Season::from_code(season_code),
        weather_code,
        weather: Weather::from_code(weather_code),
        temperature: parse_real(row_no, "temp", cell("temp")?)?,
        humidity: parse_real(row_no, "hum", cell("hum")?)?,
        windspeed: parse_real(row_no, "windspeed", cell("windspeed")?)?,
        casual_count: parse_count(row_no, "casual", cell("casual")?)?,
        total_count: parse_count(row_no, "cnt", cell("cnt")?)?,
        year: parse_code(row_no, "yr", cell("yr")?)?.ok_or_else(|| {
            invalid(row_no, "yr", &CellValue::Null)
        })?,
        hour,
    })
}

fn invalid(row: usize, column: &'static str, value: &CellValue) -> DataFormatError {
    DataFormatError::InvalidValue {
        row,
        column,
        raw: value.to_string(),
    }
}

/// Accepts `2011-01-01`, `2011-01-01 00:00:00`, `2011-01-01T00:00:00` and
/// `2011/01/01`.
fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    let CellValue::String(s) = value else {
        return None;
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// NaN is how pandas and Arrow writers mark a missing number.
fn is_missing(value: &CellValue) -> bool {
    value.is_null() || value.as_f64().is_some_and(f64::is_nan)
}

/// Integer code; empty cells are `None`.
fn parse_code(
    row: usize,
    column: &'static str,
    value: &CellValue,
) -> Result<Option<i64>, DataFormatError> {
    if is_missing(value) {
        return Ok(None);
    }
    value.as_i64().map(Some).ok_or_else(|| invalid(row, column, value))
}

fn parse_real(
    row: usize,
    column: &'static str,
    value: &CellValue,
) -> Result<Option<f64>, DataFormatError> {
    if is_missing(value) {
        return Ok(None);
    }
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| invalid(row, column, value))
}

fn parse_count(
    row: usize,
    column: &'static str,
    value: &CellValue,
) -> Result<Option<u64>, DataFormatError> {
    if is_missing(value) {
        return Ok(None);
    }
    value
        .as_i64()
        .and_then(|v| u64::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| invalid(row, column, value))
}
