use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{generate_palette, season_color, Gradient};
use crate::data::aggregate::Headline;
use crate::data::model::weekday_name;
use crate::data::DashboardView;
use crate::state::{AppState, ChartTab};

/// Number of colour buckets for the scatter plot.
const SCATTER_BUCKETS: usize = 8;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metric cards, the tab strip and the active chart.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = state.view.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a rental data file to begin  (File → Open…)");
        });
        return;
    };

    metric_cards(ui, &view);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in ChartTab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();

    if view.visible == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No records match the current filters.");
        });
        return;
    }

    match state.tab {
        ChartTab::Trend => trend_plot(ui, &view),
        ChartTab::Season => season_plot(ui, &view),
        ChartTab::Weekday => weekday_plot(ui, &view),
        ChartTab::Temperature => scatter_plot(ui, &view),
    }
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_cards(ui: &mut Ui, view: &DashboardView) {
    let h = &view.headlines;
    let cards = [
        ("Mean temperature", h.temperature),
        ("Max humidity", h.humidity),
        ("Mean windspeed", h.windspeed),
        ("Mean casual riders", h.casual),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (title, headline)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                metric_card(ui, title, headline);
            });
        }
    });
}

fn metric_card(ui: &mut Ui, title: &str, headline: Headline) {
    ui.label(title);
    let value = headline
        .latest
        .map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
    ui.label(RichText::new(value).size(24.0).strong());
    match headline.delta {
        Some(d) => {
            let (arrow, color) = if d >= 0.0 {
                ("▲", Color32::from_rgb(0x2E, 0xA0, 0x43))
            } else {
                ("▼", Color32::from_rgb(0xD0, 0x3A, 0x2F))
            };
            ui.label(RichText::new(format!("{arrow} {d:+.2}")).color(color));
        }
        None => {
            ui.label(RichText::new("no previous day").weak());
        }
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Dates are plotted as days since the common era.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date_label(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Year categories are offsets from 2011 in the published dataset.
fn year_label(year: i64) -> String {
    (2011 + year).to_string()
}

/// Label for category index `i`, empty between bars.
fn category_label(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        let i = mark.value.round();
        if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn trend_plot(ui: &mut Ui, view: &DashboardView) {
    let colors = generate_palette(view.rentals_by_year.len());

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Rentals")
        .x_axis_formatter(x_to_date_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for ((year, series), color) in view.rentals_by_year.iter().zip(colors) {
                let points: PlotPoints = series
                    .iter()
                    .map(|(date, cnt)| [date_to_x(*date), *cnt as f64])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(year_label(*year))
                        .color(color)
                        .width(1.5),
                );
            }
        });
}

fn season_plot(ui: &mut Ui, view: &DashboardView) {
    let labels: Vec<String> = view.seasonal.keys().map(|s| s.label().to_string()).collect();
    let bars: Vec<Bar> = view
        .seasonal
        .iter()
        .enumerate()
        .map(|(i, (season, mean))| {
            Bar::new(i as f64, *mean)
                .name(season.label())
                .fill(season_color(*season))
        })
        .collect();

    Plot::new("season_plot")
        .x_axis_label("Season")
        .y_axis_label("Mean rentals")
        .x_axis_formatter(category_label(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

fn weekday_plot(ui: &mut Ui, view: &DashboardView) {
    let gradient = Gradient::default();
    let min = view.weekday.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = view.weekday.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let labels: Vec<String> = view
        .weekday
        .iter()
        .map(|(day, _)| weekday_name(*day).to_string())
        .collect();
    let bars: Vec<Bar> = view
        .weekday
        .iter()
        .enumerate()
        .map(|(i, (day, mean))| {
            Bar::new(i as f64, *mean)
                .name(weekday_name(*day))
                .fill(gradient.scaled(*mean, min, max))
        })
        .collect();

    Plot::new("weekday_plot")
        .x_axis_label("Weekday")
        .y_axis_label("Mean rentals")
        .x_axis_formatter(category_label(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

fn scatter_plot(ui: &mut Ui, view: &DashboardView) {
    let gradient = Gradient::default();
    let min = view.scatter.iter().map(|(_, c)| *c).min().unwrap_or(0) as f64;
    let max = view.scatter.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;

    // One Points series per colour bucket; egui_plot colours whole series.
    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SCATTER_BUCKETS];
    for (temp, cnt) in &view.scatter {
        let t = if max > min {
            (*cnt as f64 - min) / (max - min)
        } else {
            0.0
        };
        let idx = ((t * SCATTER_BUCKETS as f64) as usize).min(SCATTER_BUCKETS - 1);
        buckets[idx].push([*temp, *cnt as f64]);
    }

    Plot::new("scatter_plot")
        .x_axis_label("Temperature (normalized)")
        .y_axis_label("Rentals")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (i, points) in buckets.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let t = (i as f64 + 0.5) / SCATTER_BUCKETS as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .radius(2.5)
                        .color(gradient.at(t)),
                );
            }
        });
}
