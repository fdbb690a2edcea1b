// Terminal front end: app state, the key dispatcher, and rendering
pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, Command};
pub use runner::run_tui;
