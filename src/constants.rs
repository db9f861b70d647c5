//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Base URL of the Axora API (override with the AXORA_API_URL environment variable)
pub const DEFAULT_API_URL: &str = "https://api.axora.app";

/// Maximum accepted video size in bytes (50 MiB)
pub const MAX_VIDEO_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum accepted video duration in seconds
pub const MAX_VIDEO_DURATION_SECS: f64 = 60.0;

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Axora TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
