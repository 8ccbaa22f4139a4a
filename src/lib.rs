//! Wiretap - Chat API fixture generator
//!
//! Library exports for testing and the binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod scenarios;
pub mod services;

pub use config::config;
pub use error::{Error, Result};
