#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::sync::Arc;

use trait_sketch::{AssetDirectory, EditorConfig, Exporter, FileSink, SessionController, TraitSketchApp};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = EditorConfig::from_env()?;
    let catalog = Arc::new(config.catalog()?);
    let controller = SessionController::new(&config, catalog)?;

    let assets = AssetDirectory::new(&config.asset_dir);
    let exporter = Exporter::new(
        Arc::new(assets.clone()),
        Arc::new(FileSink::new(&config.export_dir)),
        config.export_file_name.clone(),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trait Sketch")
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };
    eframe::run_native(
        "trait_sketch",
        native_options,
        Box::new(move |cc| Ok(Box::new(TraitSketchApp::new(cc, controller, exporter, assets)))),
    )?;
    Ok(())
}
