use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use log::debug;

use super::aggregate::{
    rentals_by_year, seasonal_average, temperature_vs_rentals, weekday_average, Headlines,
};
use super::error::InvalidRangeError;
use super::filter::{apply, FilterSpec};
use super::model::{Dataset, Season};

/// Everything one render pass of the dashboard shows.
///
/// Built from scratch on every interaction; nothing here is cached or
/// mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Metric cards, from the full dataset.
    pub headlines: Headlines,
    /// Rentals over time per year category, from the filtered records.
    pub rentals_by_year: BTreeMap<i64, Vec<(NaiveDate, u64)>>,
    pub seasonal: BTreeMap<Season, f64>,
    pub weekday: Vec<(Weekday, f64)>,
    pub scatter: Vec<(f64, u64)>,
    /// Number of records that passed the filter.
    pub visible: usize,
    pub range_error: Option<InvalidRangeError>,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, spec: &FilterSpec) -> Self {
        let filtered = apply(dataset, spec);
        debug!("{} of {} records pass the filter", filtered.len(), dataset.len());

        DashboardView {
            headlines: Headlines::from_dataset(dataset),
            rentals_by_year: rentals_by_year(filtered.iter()),
            seasonal: seasonal_average(filtered.iter()),
            weekday: weekday_average(filtered.iter()),
            scatter: temperature_vs_rentals(filtered.iter()),
            visible: filtered.len(),
            range_error: filtered.range_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, m, day).unwrap()
    }

    fn dataset() -> Dataset {
        let records = (1..=10)
            .map(|day| {
                let mut r = Record::on(d(5, day));
                r.temperature = Some(day as f64 / 10.0);
                r.total_count = Some(day as u64 * 100);
                r.season = Season::Spring;
                r
            })
            .collect();
        Dataset::new(records)
    }

    #[test]
    fn headlines_ignore_the_filter() {
        let ds = dataset();
        let narrow = FilterSpec::between(d(5, 2), d(5, 3));
        let wide = FilterSpec::covering(&ds).unwrap();
        let a = DashboardView::compute(&ds, &narrow);
        let b = DashboardView::compute(&ds, &wide);
        assert_eq!(a.headlines, b.headlines);
        assert_eq!(a.visible, 2);
        assert_eq!(a.scatter, vec![(0.2, 200), (0.3, 300)]);
    }

    #[test]
    fn inverted_range_still_produces_a_view() {
        let ds = dataset();
        let spec = FilterSpec::between(d(6, 1), d(5, 1));
        let view = DashboardView::compute(&ds, &spec);
        assert!(view.range_error.is_some());
        assert_eq!(view.visible, 0);
        assert!(view.seasonal.is_empty());
        assert!(view.headlines.temperature.delta.is_some());
    }
}
