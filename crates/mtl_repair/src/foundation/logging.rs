//! Logging utilities and structured logging support

use std::io::Write;

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// `default_level` is used as the filter unless `RUST_LOG` is set. Records go to
/// standard output as `[LEVEL] message`, interleaving cleanly with the prompts.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let result = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();

    // A second init (tests, embedding apps) keeps the first logger
    if let Err(e) = result {
        log::debug!("Logger already initialized: {}", e);
    }
}
