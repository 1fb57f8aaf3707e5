// src/gui/components/log_view.rs
//
// Severity-colored tail of the newest session log. Purely a view.

use eframe::egui::{self, Color32, Label, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::{gui::app::App, log::Severity};

fn color(sev: Severity) -> Color32 {
    match sev {
        Severity::Info => Color32::from_rgb(0x00, 0x66, 0xcc),
        Severity::Warning => Color32::from_rgb(0xff, 0x99, 0x00),
        Severity::Error => Color32::from_rgb(0xcc, 0x00, 0x00),
        Severity::Debug | Severity::Other => Color32::from_rgb(0x66, 0x66, 0x66),
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Logs");

    let Some(view) = app.supervisor.state().log.as_ref() else {
        ui.label("No log file yet.");
        return;
    };

    ui.horizontal(|ui| {
        ui.label(format!(
            "Displayed {} lines from {}",
            view.lines.len(),
            view.path.display()
        ));
        if view.total > view.lines.len() {
            ui.small(format!("({} in file)", view.total));
        }
    });
    ui.small(format!("Last updated at {}", view.read_at.format("%H:%M:%S")));
    ui.add_space(4.0);

    let row_h = ui.text_style_height(&egui::TextStyle::Monospace) + 2.0;
    let avail_h = ui.available_height();
    TableBuilder::new(ui)
        .striped(true)
        .stick_to_bottom(true)
        .min_scrolled_height(0.0)
        .max_scroll_height(avail_h)
        .column(Column::remainder().clip(true))
        .body(|body| {
            body.rows(row_h, view.lines.len(), |mut row| {
                let line = &view.lines[row.index()];
                row.col(|ui| {
                    let text = RichText::new(&line.text).monospace().color(color(line.severity));
                    ui.add(Label::new(text).wrap_mode(TextWrapMode::Truncate));
                });
            });
        });
}
