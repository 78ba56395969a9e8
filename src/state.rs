use std::path::Path;

use chrono::{NaiveDate, Weekday};
use log::error;

use crate::data::loader::load_dataset;
use crate::data::model::WEEKDAYS;
use crate::data::{DashboardView, Dataset, FilterSpec, Season, Weather};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Trend,
    Season,
    Weekday,
    Temperature,
}

impl ChartTab {
    pub const ALL: [ChartTab; 4] = [
        ChartTab::Trend,
        ChartTab::Season,
        ChartTab::Weekday,
        ChartTab::Temperature,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartTab::Trend => "📈 Rentals trend",
            ChartTab::Season => "🌦 Rentals per season",
            ChartTab::Weekday => "📊 Rentals per weekday",
            ChartTab::Temperature => "☀ Temperature vs rentals",
        }
    }
}

/// The full UI state, independent of rendering.
///
/// Every filter change goes through a method here that recomputes `view`,
/// so the charts always reflect the current selection.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Current selection; present whenever `dataset` is non-empty.
    pub filter: Option<FilterSpec>,

    /// Output of the last render pass.
    pub view: Option<DashboardView>,

    pub tab: ChartTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters to cover it.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filter = FilterSpec::covering(&dataset);
        self.status_message = dataset
            .is_empty()
            .then(|| "The file contains no records.".to_string());
        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Load a file, keeping the previous dataset if it fails.
    pub fn load_path(&mut self, path: &Path) {
        match load_dataset(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                let e = anyhow::Error::from(e);
                error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the view from the dataset and filter.
    pub fn refresh(&mut self) {
        self.view = match (&self.dataset, &self.filter) {
            (Some(ds), Some(spec)) => Some(DashboardView::compute(ds, spec)),
            _ => None,
        };
    }

    fn update_filter(&mut self, change: impl FnOnce(&mut FilterSpec)) {
        if let Some(spec) = &mut self.filter {
            change(spec);
            self.refresh();
        }
    }

    pub fn set_date_from(&mut self, date: NaiveDate) {
        self.update_filter(|f| f.date_from = date);
    }

    pub fn set_date_to(&mut self, date: NaiveDate) {
        self.update_filter(|f| f.date_to = date);
    }

    /// `None` selects every season.
    pub fn set_season(&mut self, season: Option<Season>) {
        self.update_filter(|f| f.season = season);
    }

    /// `None` selects every weather situation.
    pub fn set_weather(&mut self, weather: Option<Weather>) {
        self.update_filter(|f| f.weather = weather);
    }

    /// Toggle a single weekday in the filter.
    pub fn toggle_weekday(&mut self, day: Weekday) {
        self.update_filter(|f| {
            if !f.weekdays.remove(&day) {
                f.weekdays.insert(day);
            }
        });
    }

    pub fn select_all_weekdays(&mut self) {
        self.update_filter(|f| f.weekdays = WEEKDAYS.into_iter().collect());
    }

    pub fn select_no_weekdays(&mut self) {
        self.update_filter(|f| f.weekdays.clear());
    }
}
