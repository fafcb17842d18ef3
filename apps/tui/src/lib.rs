// Export our modules for use in binaries and tests
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod event;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use app::{App, Clock};
pub use db::Backend;
