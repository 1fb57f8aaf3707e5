// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use clap::Parser;
use crash_scrape::{cli::DashboardArgs, gui, log::init_console};
use eframe::egui::ViewportBuilder;

fn main() {
    init_console();
    let opts = DashboardArgs::parse().into_options();

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Crash Game Scraper Dashboard")
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options, opts) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
