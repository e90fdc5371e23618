//! Application command handlers for sweepscope.
//!
//! # Commands
//! - `run`: Stream demo channels into the sweeping graph (default)
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod logs;
pub mod run;

pub use config::handle_config;
pub use logs::handle_logs;
pub use run::{handle_run, RunOverrides};
