// src/gui/app.rs
use std::{
    error::Error,
    time::{Duration, Instant},
};

use eframe::egui;

use crate::{
    config::{consts::REFRESH_EVERY_MS, options::DashboardOptions},
    supervisor::{EndReason, Supervisor},
};

use super::components::{controls, log_view, session_bar};

pub fn run(options: eframe::NativeOptions, opts: DashboardOptions) -> Result<(), Box<dyn Error>> {
    logf!(
        "Init: scraper={}, logs_dir={}, duration={}s",
        opts.scraper.display(),
        opts.logs_dir.display(),
        opts.duration.as_secs()
    );
    eframe::run_native(
        "Crash Game Scraper Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(Supervisor::with_command(opts))))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth for the session; UI only reads it
    pub supervisor: Supervisor,

    // one-line status under the buttons
    pub status: String,

    last_tick: Option<Instant>,
}

impl App {
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor, status: s!("Idle"), last_tick: None }
    }

    pub fn start(&mut self) {
        match self.supervisor.start() {
            Ok(()) => {
                let secs = self.supervisor.options().duration.as_secs();
                self.status = format!("Scraping started for {secs} seconds.");
                self.last_tick = None;
            }
            Err(e) => {
                loge!("UI: start failed: {}", e);
                self.status = e.to_string();
            }
        }
    }

    pub fn stop(&mut self) {
        self.supervisor.stop();
        self.status = EndReason::Manual.message();
    }

    /// One supervisor tick, regardless of the refresh cadence.
    pub fn tick(&mut self) {
        if let Some(reason) = self.supervisor.refresh() {
            self.status = reason.message();
        }
        self.last_tick = Some(Instant::now());
    }

    fn tick_due(&self, every: Duration) -> bool {
        self.last_tick.is_none_or(|t| t.elapsed() >= every)
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let every = Duration::from_millis(REFRESH_EVERY_MS);
        let running = self.supervisor.state().is_running();
        if running && self.tick_due(every) {
            self.tick();
        }

        egui::SidePanel::left("controls")
            .resizable(false)
            .min_width(180.0)
            .show(ctx, |ui| {
                controls::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            session_bar::draw(ui, self);

            ui.separator();

            log_view::draw(ui, self);
        });

        if self.supervisor.state().is_running() {
            ctx.request_repaint_after(every);
        }
    }
}

impl Drop for App {
    // Closing the window must not leave an orphaned scraper behind.
    fn drop(&mut self) {
        if self.supervisor.state().is_running() {
            self.supervisor.stop();
        }
    }
}
