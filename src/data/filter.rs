use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};
use log::warn;

use super::error::InvalidRangeError;
use super::model::{Dataset, Record, Season, Weather, WEEKDAYS};

// ---------------------------------------------------------------------------
// FilterSpec – the user's current selection
// ---------------------------------------------------------------------------

/// Predicates applied before aggregation.  `None` for season or weather
/// means "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    /// Days to keep.  Empty keeps nothing.
    pub weekdays: HashSet<Weekday>,
}

impl FilterSpec {
    /// Everything between the two dates, no category restriction, all days.
    pub fn between(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        FilterSpec {
            date_from,
            date_to,
            season: None,
            weather: None,
            weekdays: WEEKDAYS.into_iter().collect(),
        }
    }

    /// The selection a fresh dashboard starts with: the dataset's full date
    /// span and every category.  `None` for an empty dataset.
    pub fn covering(dataset: &Dataset) -> Option<Self> {
        dataset
            .date_bounds()
            .map(|(from, to)| FilterSpec::between(from, to))
    }

    pub fn with_season(mut self, season: Option<Season>) -> Self {
        self.season = season;
        self
    }

    pub fn with_weather(mut self, weather: Option<Weather>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    /// The date window actually applied, plus the error when the bounds
    /// were inverted.  An inverted window is clamped to `date_from`.
    pub fn effective_range(&self) -> ((NaiveDate, NaiveDate), Option<InvalidRangeError>) {
        if self.date_from > self.date_to {
            let err = InvalidRangeError {
                from: self.date_from,
                to: self.date_to,
            };
            ((self.date_from, self.date_from), Some(err))
        } else {
            ((self.date_from, self.date_to), None)
        }
    }

    // -- single-dimension predicates --

    pub fn matches_date(&self, record: &Record) -> bool {
        let ((from, to), _) = self.effective_range();
        from <= record.date && record.date <= to
    }

    /// An `Unknown` record never matches a specific season.
    pub fn matches_season(&self, record: &Record) -> bool {
        match self.season {
            None => true,
            Some(s) => s.is_known() && record.season == s,
        }
    }

    pub fn matches_weather(&self, record: &Record) -> bool {
        match self.weather {
            None => true,
            Some(w) => w.is_known() && record.weather == w,
        }
    }

    pub fn matches_weekday(&self, record: &Record) -> bool {
        self.weekdays.contains(&record.weekday)
    }

    /// Conjunction of every dimension.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_date(record)
            && self.matches_season(record)
            && self.matches_weather(record)
            && self.matches_weekday(record)
    }
}

// ---------------------------------------------------------------------------
// Applying a filter
// ---------------------------------------------------------------------------

/// Records that passed a [`FilterSpec`], borrowed from the dataset in their
/// original order.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    pub records: Vec<&'a Record>,
    /// Set when the date bounds were inverted and had to be clamped.
    pub range_error: Option<InvalidRangeError>,
}

impl<'a> Filtered<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }
}

/// Single pass over `dataset` keeping the records `spec` accepts.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Filtered<'a> {
    let ((from, to), range_error) = spec.effective_range();
    if let Some(err) = &range_error {
        warn!("{err}");
    }

    let records = dataset
        .iter()
        .filter(|r| {
            from <= r.date
                && r.date <= to
                && spec.matches_season(r)
                && spec.matches_weather(r)
                && spec.matches_weekday(r)
        })
        .collect();

    Filtered {
        records,
        range_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(date: NaiveDate, season: i64, weather: i64) -> Record {
        let mut r = Record::on(date);
        r.season_code = Some(season);
        r.season = Season::from_code(Some(season));
        r.weather_code = Some(weather);
        r.weather = Weather::from_code(Some(weather));
        r
    }

    /// Two weeks in spring 2012 with rotating seasons and weather codes,
    /// plus one record with an unmapped season.
    fn sample() -> Dataset {
        let mut records: Vec<Record> = (0..14)
            .map(|i| {
                let date = d(2012, 5, 1) + chrono::Days::new(i);
                rec(date, (i % 4 + 1) as i64, (i % 3 + 1) as i64)
            })
            .collect();
        records.push(rec(d(2012, 5, 7), 9, 1));
        Dataset::new(records)
    }

    fn is_subsequence(sub: &[&Record], of: &Dataset) -> bool {
        let mut it = of.iter();
        sub.iter().all(|s| it.any(|r| std::ptr::eq(r, *s)))
    }

    #[test]
    fn covering_spec_keeps_everything() {
        let ds = sample();
        let spec = FilterSpec::covering(&ds).unwrap();
        let out = apply(&ds, &spec);
        assert_eq!(out.len(), ds.len());
        assert!(out.range_error.is_none());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ds = sample();
        let spec = FilterSpec::between(d(2012, 5, 2), d(2012, 5, 4));
        let dates: Vec<NaiveDate> = apply(&ds, &spec).iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2012, 5, 2), d(2012, 5, 3), d(2012, 5, 4)]);
    }

    #[test]
    fn inverted_range_is_clamped_to_start() {
        let mut records = sample().records;
        records.push(rec(d(2012, 6, 1), 2, 1));
        records.push(rec(d(2012, 5, 20), 2, 1));
        let ds = Dataset::new(records);

        let spec = FilterSpec::between(d(2012, 6, 1), d(2012, 5, 1));
        let out = apply(&ds, &spec);

        assert_eq!(
            out.range_error,
            Some(InvalidRangeError {
                from: d(2012, 6, 1),
                to: d(2012, 5, 1)
            })
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].date, d(2012, 6, 1));
    }

    #[test]
    fn empty_weekday_set_yields_nothing() {
        let ds = sample();
        let spec = FilterSpec::covering(&ds)
            .unwrap()
            .with_weekdays(std::iter::empty());
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn weekday_set_is_a_membership_test() {
        let ds = sample();
        let spec = FilterSpec::covering(&ds)
            .unwrap()
            .with_weekdays([Weekday::Sat, Weekday::Sun]);
        let out = apply(&ds, &spec);
        assert!(!out.is_empty());
        assert!(out
            .iter()
            .all(|r| matches!(r.weekday, Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn unknown_season_is_excluded_by_specific_filters() {
        let ds = sample();
        for season in Season::KNOWN.into_iter().chain([Season::Unknown]) {
            let spec = FilterSpec::covering(&ds).unwrap().with_season(Some(season));
            assert!(
                apply(&ds, &spec).iter().all(|r| r.season.is_known()),
                "{season} let an unknown record through"
            );
        }
        // ...but passes the "all" filter.
        let all = FilterSpec::covering(&ds).unwrap();
        assert!(apply(&ds, &all).iter().any(|r| r.season == Season::Unknown));
    }

    #[test]
    fn weather_filter_matches_exact_label() {
        let ds = sample();
        let spec = FilterSpec::covering(&ds)
            .unwrap()
            .with_weather(Some(Weather::LightRain));
        let out = apply(&ds, &spec);
        assert!(!out.is_empty());
        assert!(out.iter().all(|r| r.weather == Weather::LightRain));
    }

    #[test]
    fn result_is_an_ordered_subsequence() {
        let ds = sample();
        let specs = [
            FilterSpec::between(d(2012, 5, 3), d(2012, 5, 10)),
            FilterSpec::covering(&ds).unwrap().with_season(Some(Season::Summer)),
            FilterSpec::covering(&ds).unwrap().with_weekdays([Weekday::Wed]),
            FilterSpec::between(d(2012, 5, 9), d(2012, 5, 3)),
        ];
        for spec in &specs {
            let out = apply(&ds, spec);
            assert!(out.len() <= ds.len());
            assert!(is_subsequence(&out.records, &ds), "{spec:?}");
        }
    }

    #[test]
    fn combined_filter_equals_intersection_of_single_filters() {
        let ds = sample();
        let base = FilterSpec::covering(&ds).unwrap();
        let combined = FilterSpec::between(d(2012, 5, 2), d(2012, 5, 12))
            .with_season(Some(Season::Spring))
            .with_weather(Some(Weather::Clear))
            .with_weekdays([Weekday::Mon, Weekday::Thu, Weekday::Sat]);

        let singles = [
            FilterSpec::between(combined.date_from, combined.date_to),
            base.clone().with_season(combined.season),
            base.clone().with_weather(combined.weather),
            base.clone().with_weekdays(combined.weekdays.iter().copied()),
        ];

        // Apply one dimension at a time, in reverse order, each on the
        // previous output.
        let mut narrowed: Vec<&Record> = ds.iter().collect();
        for single in singles.iter().rev() {
            narrowed.retain(|r| single.matches(r));
        }

        let at_once = apply(&ds, &combined);
        assert_eq!(at_once.len(), 1);
        assert_eq!(at_once.records, narrowed);
    }
}
