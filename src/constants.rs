//! Constants used throughout the application
//!
//! This module centralizes endpoint paths, default values and fixed
//! strings so they are defined in exactly one place.

// API endpoints (relative to the configured base URL)
pub const ENDPOINT_PERSONNEL: &str = "delivery-personnel";
pub const ENDPOINT_DELIVERY_REPORT: &str = "orders/reports/delivery";

/// Image shown whenever a product image is missing or fails to load
pub const DEFAULT_PLACEHOLDER: &str =
    "https://nftcalendar.io/storage/uploads/2022/02/21/image-not-found_0221202211372462137974b6c1a.png";

// Image cache defaults
/// Maximum number of URLs remembered as loadable
pub const IMAGE_CACHE_DEFAULT_CAPACITY: usize = 512;
/// Seconds a validated URL stays trusted without a new probe
pub const IMAGE_CACHE_DEFAULT_TTL_SECS: u64 = 3600;
/// Seconds before an image probe is abandoned
pub const IMAGE_PROBE_DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Largest image body a probe downloads before giving up
pub const IMAGE_PROBE_MAX_BYTES: usize = 10 * 1024 * 1024;

// API defaults
pub const API_DEFAULT_BASE_URL: &str = "http://localhost:3000/api/";
pub const API_DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_TOKEN_DEFAULT_ENV: &str = "DELIVERY_API_TOKEN";

// Date display
/// Rendered by the formatter when no date was given
pub const DATE_NOT_AVAILABLE: &str = "N/A";
/// Rendered by the formatter when the input could not be parsed
pub const DATE_INVALID: &str = "Invalid Date";

// Config file locations
pub const CONFIG_FILE_NAME: &str = "delivery-desk.toml";
pub const CONFIG_DIR_NAME: &str = "delivery-desk";
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Logging
/// Number of recent log lines kept in memory
pub const LOG_BUFFER_CAPACITY: usize = 500;
