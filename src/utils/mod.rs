//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, duration parsing and command
//! parameter extraction.

pub mod errors;
pub mod logging;
pub mod duration;
pub mod params;

pub use errors::{ChatWardenError, Result};
