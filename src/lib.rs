// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod error;
pub mod data;
pub mod config;
pub mod core;
pub mod specs;

pub mod analysis;
pub mod cli;
pub mod file;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod store;

pub use error::{ChartError, Result};
