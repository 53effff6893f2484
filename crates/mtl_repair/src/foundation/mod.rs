//! Foundation module - Core utilities shared by the repair pipeline
//!
//! - Logging setup and re-exported log macros
//! - Lossy text decoding for asset files of unknown encoding

pub mod logging;
pub mod text;
