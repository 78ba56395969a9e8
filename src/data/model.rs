use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, Weekday};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe would infer.
/// Must be `Ord` so unique values can live in a `BTreeSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text, bools and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view of the cell.  Floats with no fractional part count
    /// (Parquet writers often store codes as doubles).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// One source row: column name → raw cell.
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Category labels
// ---------------------------------------------------------------------------

/// Season label derived from the `season` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
    /// Code outside 1..=4, or no code at all.
    Unknown,
}

impl Season {
    /// The four labels a user can filter on.
    pub const KNOWN: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Season::Winter,
            Some(2) => Season::Spring,
            Some(3) => Season::Summer,
            Some(4) => Season::Fall,
            _ => Season::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Unknown => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Season::Unknown
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather label derived from the `weathersit` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Cloudy,
    LightRain,
    HeavyRain,
    /// Code outside 1..=4, or no code at all.
    Unknown,
}

impl Weather {
    pub const KNOWN: [Weather; 4] = [
        Weather::Clear,
        Weather::Cloudy,
        Weather::LightRain,
        Weather::HeavyRain,
    ];

    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Weather::Clear,
            Some(2) => Weather::Cloudy,
            Some(3) => Weather::LightRain,
            Some(4) => Weather::HeavyRain,
            _ => Weather::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Cloudy => "Cloudy",
            Weather::LightRain => "Light Rain",
            Weather::HeavyRain => "Heavy Rain",
            Weather::Unknown => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Weather::Unknown
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monday-first list of all weekdays.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English day name, independent of the system locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized row
// ---------------------------------------------------------------------------

/// A single day (or hour) of rental data with its derived labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// Derived from `date`.
    pub weekday: Weekday,
    pub season_code: Option<i64>,
    pub season: Season,
    pub weather_code: Option<i64>,
    pub weather: Weather,
    /// Normalized temperature.  `None` when the cell was empty.
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub casual_count: Option<u64>,
    pub total_count: Option<u64>,
    /// Year category (0 = 2011, 1 = 2012 in the published dataset).
    pub year: i64,
    /// Hour of day, only present in the hourly file.
    pub hour: Option<u8>,
}

impl Record {
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Build a record from its date, deriving the weekday.
    #[cfg(test)]
    pub fn on(date: NaiveDate) -> Self {
        use chrono::Datelike;

        Record {
            date,
            weekday: date.weekday(),
            season_code: None,
            season: Season::Unknown,
            weather_code: None,
            weather: Weather::Unknown,
            temperature: None,
            humidity: None,
            windspeed: None,
            casual_count: None,
            total_count: None,
            year: 0,
            hour: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized table
// ---------------------------------------------------------------------------

/// All records in source order.  Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date present, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }

    /// Distinct year categories, sorted.
    pub fn years(&self) -> BTreeSet<i64> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
