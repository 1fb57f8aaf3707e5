// src/gui/components/session_bar.rs
//
// Progress bar plus elapsed/remaining, straight from SessionState.

use std::time::Duration;

use eframe::egui::{self, ProgressBar};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let state = app.supervisor.state();
    let total = app.supervisor.options().duration;

    ui.add(ProgressBar::new(state.ratio).show_percentage());

    ui.horizontal(|ui| {
        ui.label(format!("Elapsed: {}", hms(state.elapsed)));
        ui.separator();
        ui.label(format!("Remaining: {}", hms(state.remaining)));
        ui.separator();
        ui.label(format!("Session: {}", hms(total)));
    });
}

/// `H:MM:SS`, hours unbounded.
pub fn hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
