// src/gui/components/mod.rs
pub mod controls;
pub mod log_view;
pub mod session_bar;
