use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::{weekday_name, WEEKDAYS};
use crate::data::{Season, Weather};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🗓 Filters");
    ui.separator();

    // Clone the selection so we can mutate state from the widgets.
    let Some(spec) = state.filter.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            let mut from = spec.date_from;
            let mut to = spec.date_to;
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                ui.add(DatePickerButton::new(&mut from).id_salt("date_from"));
                ui.end_row();
                ui.label("To");
                ui.add(DatePickerButton::new(&mut to).id_salt("date_to"));
                ui.end_row();
            });
            if from != spec.date_from {
                state.set_date_from(from);
            }
            if to != spec.date_to {
                state.set_date_to(to);
            }
            if let Some(err) = state.view.as_ref().and_then(|v| v.range_error) {
                ui.label(RichText::new(err.to_string()).color(Color32::RED));
            }
            ui.separator();

            // ---- Season ----
            ui.strong("Season");
            let current = spec.season.map_or("All", Season::label);
            egui::ComboBox::from_id_salt("season")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(spec.season.is_none(), "All").clicked() {
                        state.set_season(None);
                    }
                    for season in Season::KNOWN {
                        if ui
                            .selectable_label(spec.season == Some(season), season.label())
                            .clicked()
                        {
                            state.set_season(Some(season));
                        }
                    }
                });
            ui.separator();

            // ---- Weather ----
            ui.strong("Weather");
            let current = spec.weather.map_or("All", Weather::label);
            egui::ComboBox::from_id_salt("weather")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(spec.weather.is_none(), "All").clicked() {
                        state.set_weather(None);
                    }
                    for weather in Weather::KNOWN {
                        if ui
                            .selectable_label(spec.weather == Some(weather), weather.label())
                            .clicked()
                        {
                            state.set_weather(Some(weather));
                        }
                    }
                });
            ui.separator();

            // ---- Weekdays ----
            let n_selected = spec.weekdays.len();
            ui.strong(format!("Weekdays  ({n_selected}/{})", WEEKDAYS.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_weekdays();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_weekdays();
                }
            });
            for day in WEEKDAYS {
                let mut checked = spec.weekdays.contains(&day);
                if ui.checkbox(&mut checked, weekday_name(day)).changed() {
                    state.toggle_weekday(day);
                }
            }
            ui.separator();

            // ---- About ----
            ui.collapsing("ℹ About", |ui: &mut Ui| {
                ui.label("Source: Bike Sharing Dataset (Capital Bikeshare, 2011–2012).");
                ui.label(
                    "Metric cards use the whole dataset; charts follow the filters.",
                );
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} records loaded, {} match the filters",
                ds.len(),
                view.visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
