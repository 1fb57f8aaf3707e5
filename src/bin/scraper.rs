// src/bin/scraper.rs
//
// One timed scraping session. Configured entirely from env/flags so the
// dashboard can start it with no arguments.

use clap::Parser;
use color_eyre::eyre::WrapErr;

use crash_scrape::{
    browser::WebDriverBrowser,
    cli::ScraperArgs,
    config::consts::SCRAPER_LOG_NAME,
    file::SessionPaths,
    log::init_session_log,
    progress::RowTicker,
    scrape::{self, Session, StopFlag},
};
use crash_scrape::{logf, loge, logw};

const TICK_EVERY_ROWS: usize = 100;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let opts = ScraperArgs::parse().into_options();
    let stop = StopFlag::new();
    let mut session = Session::begin(opts.duration, stop.clone());
    let paths = SessionPaths::new(&opts.out_dir, &session.started_at, opts.duration, opts.live_prediction);

    init_session_log(&paths.log, SCRAPER_LOG_NAME)
        .wrap_err_with(|| format!("cannot open session log {}", paths.log.display()))?;
    logf!("Session log: {}", paths.log.display());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .wrap_err("cannot start async runtime")?;
    rt.spawn(listen_for_stop(stop));

    let mut browser = match WebDriverBrowser::connect(rt.handle().clone(), &opts.webdriver) {
        Ok(b) => b,
        Err(e) => {
            loge!("Error in scraping process: cannot start browser: {}", e);
            rt.shutdown_background();
            std::process::exit(1);
        }
    };

    let mut ticker = RowTicker::new(TICK_EVERY_ROWS);
    let summary = scrape::run(&mut browser, &opts, &mut session, &paths, Some(&mut ticker));
    drop(browser);
    rt.shutdown_background();

    logf!(
        "Session over: {} ({} rows, target {})",
        summary.reason,
        summary.rows,
        summary.target_url.as_deref().unwrap_or("none")
    );
    if summary.reason.is_fault() {
        std::process::exit(1);
    }
    Ok(())
}

/// Flip the stop flag on SIGTERM (the dashboard's Stop) or Ctrl-C.
async fn listen_for_stop(stop: StopFlag) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = term.recv() => logw!("SIGTERM received, stopping."),
                    _ = tokio::signal::ctrl_c() => logw!("Ctrl-C received, stopping."),
                }
            }
            Err(e) => {
                logw!("SIGTERM handler unavailable: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                logw!("Ctrl-C received, stopping.");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        logw!("Ctrl-C received, stopping.");
    }
    stop.request();
}
