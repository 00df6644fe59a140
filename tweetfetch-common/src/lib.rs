//! Shared helpers for the tweetfetch crates.
//!
//! Today this is only the logging bootstrap in [`observability`]; binaries
//! and integration tests call [`observability::init_logging`] once at start.
//!
//! ```rust
//! use tweetfetch_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "tweetfetch");
//! assert_eq!(cfg.default_filter, "info");
//! ```
pub mod observability;
