//! End-to-end tests: CSV fixture -> normalize -> filter -> aggregate.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};
use rusty_pedals::data::loader::load_dataset;
use rusty_pedals::data::{
    DashboardView, DataFormatError, Dataset, FilterSpec, InvalidRangeError, Season, Weather,
};

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture() -> Dataset {
    load_dataset(&fixture_path("day_sample.csv")).expect("fixture should parse")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fixture_loads_in_source_order() {
    let ds = fixture();
    assert_eq!(ds.len(), 12);
    assert_eq!(ds.records[0].date, d(2011, 1, 1));
    assert_eq!(ds.records[0].weekday_name(), "Saturday");
    assert_eq!(ds.records[8].season, Season::Summer);
    assert_eq!(ds.records[9].weather, Weather::LightRain);
    assert_eq!(ds.date_bounds(), Some((d(2011, 1, 1), d(2012, 12, 31))));
    assert_eq!(ds.years().into_iter().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn loading_twice_gives_equal_datasets() {
    assert_eq!(fixture(), fixture());
}

#[test]
fn headlines_compare_the_last_two_days() {
    let ds = fixture();
    let view = DashboardView::compute(&ds, &FilterSpec::covering(&ds).unwrap());
    let h = view.headlines;

    assert!(close(h.temperature.latest.unwrap(), 0.215833));
    assert!(close(h.temperature.delta.unwrap(), 0.215833 - 0.255833));
    assert!(close(h.humidity.latest.unwrap(), 0.5775));
    assert!(close(h.humidity.delta.unwrap(), 0.5775 - 0.483333));
    assert!(close(h.windspeed.delta.unwrap(), 0.154846 - 0.350754));
    assert!(close(h.casual.latest.unwrap(), 439.0));
    assert!(close(h.casual.delta.unwrap(), 75.0));
}

#[test]
fn first_week_saturdays() {
    let ds = fixture();
    let spec = FilterSpec::between(d(2011, 1, 1), d(2011, 1, 8)).with_weekdays([Weekday::Sat]);
    let view = DashboardView::compute(&ds, &spec);

    assert_eq!(view.visible, 2);
    assert_eq!(view.weekday.len(), 1);
    assert_eq!(view.weekday[0].0, Weekday::Sat);
    assert!(close(view.weekday[0].1, 972.0));
    assert!(close(view.seasonal[&Season::Winter], 972.0));
    assert_eq!(view.scatter, vec![(0.344167, 985), (0.165, 959)]);
}

#[test]
fn season_and_weather_narrow_together() {
    let ds = fixture();
    let summer = FilterSpec::covering(&ds)
        .unwrap()
        .with_season(Some(Season::Summer));
    let view = DashboardView::compute(&ds, &summer);
    assert_eq!(view.visible, 2);
    assert!(close(view.seasonal[&Season::Summer], 3771.5));

    let rainy_summer = summer.with_weather(Some(Weather::LightRain));
    let view = DashboardView::compute(&ds, &rainy_summer);
    assert_eq!(view.visible, 1);
    assert_eq!(view.scatter, vec![(0.7, 1500)]);
}

#[test]
fn empty_weekday_selection_empties_every_chart() {
    let ds = fixture();
    let spec = FilterSpec::covering(&ds)
        .unwrap()
        .with_weekdays(std::iter::empty());
    let view = DashboardView::compute(&ds, &spec);

    assert_eq!(view.visible, 0);
    assert!(view.rentals_by_year.is_empty());
    assert!(view.seasonal.is_empty());
    assert!(view.weekday.is_empty());
    assert!(view.scatter.is_empty());
    // Metric cards do not follow the filter.
    assert!(view.headlines.casual.latest.is_some());
}

#[test]
fn inverted_range_clamps_to_start_date() {
    let ds = fixture();
    let spec = FilterSpec::between(d(2011, 7, 5), d(2011, 7, 1));
    let view = DashboardView::compute(&ds, &spec);

    assert_eq!(
        view.range_error,
        Some(InvalidRangeError {
            from: d(2011, 7, 5),
            to: d(2011, 7, 1),
        })
    );
    assert_eq!(view.visible, 1);
    assert_eq!(view.scatter, vec![(0.7, 1500)]);
}

#[test]
fn trend_series_are_split_by_year() {
    let ds = fixture();
    let view = DashboardView::compute(&ds, &FilterSpec::covering(&ds).unwrap());
    assert_eq!(view.rentals_by_year[&0].len(), 10);
    assert_eq!(
        view.rentals_by_year[&1],
        vec![(d(2012, 12, 30), 1796), (d(2012, 12, 31), 2729)]
    );
}

#[test]
fn missing_column_aborts_the_load() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "dteday,season,yr,weathersit,temp,hum,windspeed,casual").unwrap();
    writeln!(file, "2011-01-01,1,0,2,0.34,0.80,0.16,331").unwrap();

    match load_dataset(file.path()) {
        Err(DataFormatError::MissingColumn { row, column }) => {
            assert_eq!(row, 0);
            assert_eq!(column, "cnt");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn unparseable_date_aborts_the_load() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "dteday,season,yr,weathersit,temp,hum,windspeed,casual,cnt").unwrap();
    writeln!(file, "2011-01-01,1,0,2,0.34,0.80,0.16,331,985").unwrap();
    writeln!(file, "2011-13-45,1,0,2,0.36,0.69,0.24,131,801").unwrap();

    assert!(matches!(
        load_dataset(file.path()),
        Err(DataFormatError::InvalidDate { row: 1, .. })
    ));
}
