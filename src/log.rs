// src/log.rs
use std::{
    fmt::Write as _,
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
};

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, FmtContext, FormatEvent, FormatFields, MakeWriter, format::{DefaultFields, Writer}},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::consts::{CONSOLE_LOG_FILTER, SESSION_LOG_FILTER, TIMEZONE};
use crate::file::ensure_directory;

/// Severity vocabulary shared by the log writer (scraper) and the log reader (dashboard).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Other,
}

impl Severity {
    pub fn from_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Other => "",
        }
    }

    /// Substring that identifies this severity inside a log line.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Severity::Debug => Some(" - DEBUG - "),
            Severity::Info => Some(" - INFO - "),
            Severity::Warning => Some(" - WARNING - "),
            Severity::Error => Some(ERROR_MARKER),
            Severity::Other => None,
        }
    }

    /// Classify a raw line for display. First marker wins, in the order
    /// info → warning → error → debug.
    pub fn classify(line: &str) -> Self {
        [Severity::Info, Severity::Warning, Severity::Error, Severity::Debug]
            .into_iter()
            .find(|s| s.marker().is_some_and(|m| line.contains(m)))
            .unwrap_or(Severity::Other)
    }
}

pub const ERROR_MARKER: &str = " - ERROR - ";

/// True if the line carries the error marker anywhere.
#[inline]
pub fn is_error_line(line: &str) -> bool {
    line.contains(ERROR_MARKER)
}

/* ---------------- Writer side ---------------- */

/// `2025-01-31 21:04:05,123 - crash_scraper - INFO - message`
pub struct MarkerFormat {
    name: &'static str,
    tz: Tz,
}

impl MarkerFormat {
    pub fn new(name: &'static str) -> Self {
        Self { name, tz: TIMEZONE }
    }
}

impl<S, N> FormatEvent<S, N> for MarkerFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let now = Utc::now().with_timezone(&self.tz);
        let sev = Severity::from_level(event.metadata().level());
        write!(
            writer,
            "{} - {} - {} - ",
            now.format("%Y-%m-%d %H:%M:%S,%3f"),
            self.name,
            sev.label()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `RUST_LOG` if set, else `default`.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Formatting half of the session log layer, writer left open.
pub fn marker_layer<S, W>(name: &'static str, writer: W) -> fmt::Layer<S, DefaultFields, MarkerFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .event_format(MarkerFormat::new(name))
}

/// Scraper logging: marker-formatted lines into `path` (created with its parent dir)
/// plus a compact copy on stderr. Only this crate's events reach the file, so
/// a dependency's ERROR cannot trip the dashboard.
pub fn init_session_log(path: &Path, name: &'static str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let file_layer = marker_layer(name, Mutex::new(file)).with_filter(env_filter(SESSION_LOG_FILTER));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(env_filter(CONSOLE_LOG_FILTER));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(io::Error::other)
}

/// Dashboard logging: stderr only. The dashboard must never write into the
/// directory it watches for error markers.
pub fn init_console() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_filter(env_filter(CONSOLE_LOG_FILTER)),
        )
        .try_init();
}
