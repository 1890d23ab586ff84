pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod menu;
pub mod models;
pub mod validate;

pub use config::Config;
pub use core::Scheduler;
pub use error::{Result, SchedulerError};
pub use models::*;
