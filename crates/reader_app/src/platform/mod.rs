mod app;
mod commands;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
