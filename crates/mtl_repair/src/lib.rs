//! # mtl_repair
//!
//! Repairs broken texture references in Wavefront OBJ/MTL assets.
//!
//! Assets copied between machines keep absolute or stale texture paths in
//! their `.mtl` files. Given an asset folder, this crate finds the single
//! `.obj`, follows its `mtllib` directive, indexes every image under the
//! folder, and rewrites each `map_*` line to a folder-relative path. References
//! with no exact file name match are resolved by fuzzy name matching and an
//! explicit decision (interactive, scripted, or automatic).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mtl_repair::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), RepairError> {
//!     let mut prompt = ConsolePrompt::stdio("n");
//!     let report = TextureRepair::new(RepairConfig::default())
//!         .run(Path::new("assets/crate"), &mut prompt)?;
//!     println!("{} line(s) changed", report.changed_lines);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod foundation;
pub mod config;
pub mod core;
pub mod assets;
pub mod resolver;

mod error;
mod repair;

pub use error::RepairError;
pub use repair::{RepairReport, TextureRepair};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        RepairError, RepairReport, TextureRepair,
        assets::{TextureIndex, similarity_ratio},
        config::{Config, ConfigError},
        core::config::RepairConfig,
        resolver::{BestCandidate, ConsolePrompt, Decision, DecisionProvider, ScriptedDecisions},
    };
}
