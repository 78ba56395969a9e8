use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use rusty_pedals::app::RustyPedalsApp;

#[derive(Parser)]
#[command(name = "rusty-pedals")]
#[command(about = "Interactive dashboard for bike-sharing rental data", long_about = None)]
struct Cli {
    /// Rental data to open at start-up (.csv, .json or .parquet)
    #[arg(value_name = "FILE")]
    data: Option<PathBuf>,

    /// Initial window width in points
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 860.0)]
    height: f32,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Pedals – Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = RustyPedalsApp::default();
            if let Some(path) = &cli.data {
                app.state.load_path(path);
            }
            Ok(Box::new(app))
        }),
    )
}
