//! Core repair settings

pub mod config;
