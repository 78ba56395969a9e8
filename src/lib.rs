//! Bike-sharing usage dashboard.
//!
//! [`data`] holds the load → filter → aggregate pipeline and has no UI
//! dependencies; [`app`] and [`ui`] render its output with egui.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
