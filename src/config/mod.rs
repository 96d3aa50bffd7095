//! Host configuration and constants.
//!
//! This module provides:
//! - Default bind address and runtime sizing
//! - HTTP header and content-type constants
//! - Configuration types

mod constants;
mod headers;
mod types;

pub use constants::*;
pub use headers::*;
pub use types::{LogFormat, LogLevel, MockHostConfig};
