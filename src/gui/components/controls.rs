// src/gui/components/controls.rs

use eframe::egui::{self, Color32, RichText};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Scraper");
    ui.add_space(8.0);

    let state = app.supervisor.state();
    let can_start = state.can_start();
    let failed = state.is_failed();

    // Start only exists while idle. Failed sessions need an explicit Stop first.
    if can_start && ui.button("Start Scraping").clicked() {
        logf!("UI: Start clicked");
        app.start();
    }

    if ui.button("Stop Scraping").clicked() {
        logf!("UI: Stop clicked");
        app.stop();
    }

    if ui.button("Refresh").clicked() {
        logd!("UI: Refresh clicked");
        app.tick();
    }

    ui.add_space(8.0);
    ui.separator();

    if failed {
        ui.label(RichText::new("An ERROR was found in the logs. Press Stop to reset.").color(Color32::from_rgb(0xcc, 0x00, 0x00)));
    }
    ui.label(&app.status);

    ui.add_space(8.0);
    let opts = app.supervisor.options();
    ui.small(format!("Scraper: {}", opts.scraper.display()));
    ui.small(format!("Logs: {}", opts.logs_dir.display()));
}
