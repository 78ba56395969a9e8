//! Per-group summaries feeding the metric cards and charts.
//!
//! Every function takes any iterator of borrowed records, so the same code
//! serves the full [`Dataset`](super::model::Dataset) and a filtered view.
//! Empty input gives empty output, never an error.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};

use super::model::{Dataset, Record, Season, WEEKDAYS};

/// Numeric column a trend can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Temperature,
    Humidity,
    Windspeed,
    Casual,
    Total,
}

impl Measure {
    /// The record's value for this measure, `None` when missing.
    pub fn of(self, record: &Record) -> Option<f64> {
        match self {
            Measure::Temperature => record.temperature,
            Measure::Humidity => record.humidity,
            Measure::Windspeed => record.windspeed,
            Measure::Casual => record.casual_count.map(|c| c as f64),
            Measure::Total => record.total_count.map(|c| c as f64),
        }
    }
}

// ---------------------------------------------------------------------------
// Daily trends
// ---------------------------------------------------------------------------

/// One value per calendar date, in date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTrend {
    pub points: BTreeMap<NaiveDate, f64>,
}

impl DailyTrend {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value on the latest date.
    pub fn latest(&self) -> Option<f64> {
        self.points.values().next_back().copied()
    }

    /// Latest value minus the one before it.  Undefined with fewer than
    /// two dates.
    pub fn delta(&self) -> Option<f64> {
        let mut rev = self.points.values().rev();
        let last = rev.next()?;
        let previous = rev.next()?;
        Some(last - previous)
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
    max: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Group available values by a key.  Missing values are skipped, so a key
/// whose values are all missing does not appear at all.
fn accumulate<'a, K, I, F>(records: I, measure: Measure, key: F) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&Record) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for r in records {
        if let Some(v) = measure.of(r) {
            groups.entry(key(r)).or_default().push(v);
        }
    }
    groups
}

/// Arithmetic mean of `measure` per date.
pub fn daily_mean<'a, I>(records: I, measure: Measure) -> DailyTrend
where
    I: IntoIterator<Item = &'a Record>,
{
    DailyTrend {
        points: accumulate(records, measure, |r| r.date)
            .into_iter()
            .filter_map(|(date, acc)| acc.mean().map(|m| (date, m)))
            .collect(),
    }
}

/// Maximum of `measure` per date.
pub fn daily_max<'a, I>(records: I, measure: Measure) -> DailyTrend
where
    I: IntoIterator<Item = &'a Record>,
{
    DailyTrend {
        points: accumulate(records, measure, |r| r.date)
            .into_iter()
            .filter_map(|(date, acc)| acc.max.map(|m| (date, m)))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Latest daily value of a trend and its change since the previous date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Headline {
    pub latest: Option<f64>,
    pub delta: Option<f64>,
}

impl From<&DailyTrend> for Headline {
    fn from(trend: &DailyTrend) -> Self {
        Headline {
            latest: trend.latest(),
            delta: trend.delta(),
        }
    }
}

/// The four metric cards.  Always computed over the whole dataset, not the
/// filtered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headlines {
    /// Daily mean temperature.
    pub temperature: Headline,
    /// Daily maximum humidity.
    pub humidity: Headline,
    /// Daily mean windspeed.
    pub windspeed: Headline,
    /// Daily mean casual riders.
    pub casual: Headline,
}

impl Headlines {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Headlines {
            temperature: (&daily_mean(dataset, Measure::Temperature)).into(),
            humidity: (&daily_max(dataset, Measure::Humidity)).into(),
            windspeed: (&daily_mean(dataset, Measure::Windspeed)).into(),
            casual: (&daily_mean(dataset, Measure::Casual)).into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered-view aggregates
// ---------------------------------------------------------------------------

/// Mean total rentals per season label.
pub fn seasonal_average<'a, I>(records: I) -> BTreeMap<Season, f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    accumulate(records, Measure::Total, |r| r.season)
        .into_iter()
        .filter_map(|(season, acc)| acc.mean().map(|m| (season, m)))
        .collect()
}

/// Mean total rentals per weekday, Monday first.  Days with no records are
/// left out.
pub fn weekday_average<'a, I>(records: I) -> Vec<(Weekday, f64)>
where
    I: IntoIterator<Item = &'a Record>,
{
    let groups = accumulate(records, Measure::Total, |r| {
        r.weekday.num_days_from_monday()
    });
    WEEKDAYS
        .into_iter()
        .filter_map(|day| {
            let mean = groups.get(&day.num_days_from_monday())?.mean()?;
            Some((day, mean))
        })
        .collect()
}

/// `(temperature, total rentals)` for every record carrying both, in input
/// order.
pub fn temperature_vs_rentals<'a, I>(records: I) -> Vec<(f64, u64)>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|r| Some((r.temperature?, r.total_count?)))
        .collect()
}

/// Total rentals over time, one series per year category.  Points keep the
/// input order.
pub fn rentals_by_year<'a, I>(records: I) -> BTreeMap<i64, Vec<(NaiveDate, u64)>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut series: BTreeMap<i64, Vec<(NaiveDate, u64)>> = BTreeMap::new();
    for r in records {
        if let Some(cnt) = r.total_count {
            series.entry(r.year).or_default().push((r.date, cnt));
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, m, day).unwrap()
    }

    fn rec(date: NaiveDate, temp: f64, cnt: u64) -> Record {
        let mut r = Record::on(date);
        r.temperature = Some(temp);
        r.humidity = Some(temp + 0.3);
        r.windspeed = Some(temp / 2.0);
        r.casual_count = Some(cnt / 10);
        r.total_count = Some(cnt);
        r
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_day_temperature_trend() {
        let ds = Dataset::new(vec![
            rec(d(1, 1), 0.2, 100),
            rec(d(1, 2), 0.4, 100),
            rec(d(1, 3), 0.6, 100),
        ]);
        let trend = daily_mean(&ds, Measure::Temperature);
        let points: Vec<(NaiveDate, f64)> = trend.points.clone().into_iter().collect();
        assert_eq!(points, vec![(d(1, 1), 0.2), (d(1, 2), 0.4), (d(1, 3), 0.6)]);
        assert!(close(trend.latest().unwrap(), 0.6));
        assert!(close(trend.delta().unwrap(), 0.2));
    }

    #[test]
    fn delta_is_by_date_not_input_order() {
        let ds = Dataset::new(vec![
            rec(d(1, 3), 0.6, 100),
            rec(d(1, 1), 0.2, 100),
            rec(d(1, 2), 0.5, 100),
        ]);
        let trend = daily_mean(&ds, Measure::Temperature);
        assert!(close(trend.delta().unwrap(), 0.1));
    }

    #[test]
    fn hourly_rows_are_averaged_per_day() {
        let ds = Dataset::new(vec![
            rec(d(1, 1), 0.2, 10),
            rec(d(1, 1), 0.4, 30),
            rec(d(1, 2), 0.9, 50),
        ]);
        let temp = daily_mean(&ds, Measure::Temperature);
        assert!(close(temp.points[&d(1, 1)], 0.3));
        let hum = daily_max(&ds, Measure::Humidity);
        assert!(close(hum.points[&d(1, 1)], 0.7));
    }

    #[test]
    fn single_day_has_no_delta() {
        let ds = Dataset::new(vec![rec(d(1, 1), 0.2, 10), rec(d(1, 1), 0.4, 30)]);
        let h = Headlines::from_dataset(&ds);
        for headline in [h.temperature, h.humidity, h.windspeed, h.casual] {
            assert!(headline.latest.is_some());
            assert_eq!(headline.delta, None);
        }
    }

    #[test]
    fn empty_input_gives_empty_results() {
        let ds = Dataset::default();
        assert!(daily_mean(&ds, Measure::Casual).is_empty());
        assert!(seasonal_average(&ds).is_empty());
        assert!(weekday_average(&ds).is_empty());
        assert!(temperature_vs_rentals(&ds).is_empty());
        assert!(rentals_by_year(&ds).is_empty());
        assert_eq!(Headlines::from_dataset(&ds), Headlines::default());
    }

    #[test]
    fn means_skip_missing_values() {
        let mut gap = rec(d(1, 1), 0.0, 0);
        gap.temperature = None;
        gap.total_count = None;
        let ds = Dataset::new(vec![rec(d(1, 1), 0.4, 200), gap]);
        assert!(close(daily_mean(&ds, Measure::Temperature).points[&d(1, 1)], 0.4));
        assert_eq!(temperature_vs_rentals(&ds), vec![(0.4, 200)]);
    }

    #[test]
    fn date_with_only_missing_values_is_omitted() {
        let mut gap = rec(d(1, 2), 0.0, 0);
        gap.windspeed = None;
        let ds = Dataset::new(vec![rec(d(1, 1), 0.4, 200), gap]);
        let trend = daily_mean(&ds, Measure::Windspeed);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend.delta(), None);
    }

    #[test]
    fn seasonal_average_groups_by_label() {
        let mut records = vec![rec(d(1, 1), 0.2, 100), rec(d(1, 2), 0.2, 300), rec(d(7, 1), 0.8, 900)];
        records[0].season = Season::Winter;
        records[1].season = Season::Winter;
        records[2].season = Season::Summer;
        let avg = seasonal_average(&records);
        assert_eq!(avg.len(), 2);
        assert!(close(avg[&Season::Winter], 200.0));
        assert!(close(avg[&Season::Summer], 900.0));
    }

    #[test]
    fn weekday_average_is_monday_first() {
        // 2011-01-01 Saturday, 01-02 Sunday, 01-03 Monday, 01-08 Saturday.
        let ds = Dataset::new(vec![
            rec(d(1, 1), 0.2, 100),
            rec(d(1, 2), 0.2, 50),
            rec(d(1, 3), 0.2, 70),
            rec(d(1, 8), 0.2, 300),
        ]);
        let avg = weekday_average(&ds);
        let days: Vec<Weekday> = avg.iter().map(|(day, _)| *day).collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Sat, Weekday::Sun]);
        assert!(close(avg[1].1, 200.0));
    }

    #[test]
    fn rentals_split_by_year() {
        let mut late = rec(d(1, 1), 0.2, 40);
        late.year = 1;
        let ds = Dataset::new(vec![rec(d(1, 1), 0.2, 10), late, rec(d(1, 2), 0.2, 20)]);
        let series = rentals_by_year(&ds);
        assert_eq!(series[&0], vec![(d(1, 1), 10), (d(1, 2), 20)]);
        assert_eq!(series[&1], vec![(d(1, 1), 40)]);
    }
}
