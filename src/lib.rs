// src/lib.rs

#[macro_use]
pub mod macros;

#[doc(hidden)]
pub use tracing as __tracing;

pub mod browser;
pub mod cli;
pub mod config;
pub mod csv;
pub mod file;
pub mod gui;
pub mod log;
pub mod progress;
pub mod scrape;
pub mod supervisor;
