//! File front end, configuration constants and errors

/// Command-line parsing and batch file processing
pub mod cli;
/// Defaults and fixed constants of the engine
pub mod configuration;
/// Error type shared by every module
pub mod error;
/// Image decoding and PNG export
pub mod image;
/// Terminal progress bars
pub mod progress;
