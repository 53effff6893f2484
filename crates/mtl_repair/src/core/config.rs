//! # Repair Configuration
//!
//! Settings shared by every stage of the repair pipeline: which files count
//! as meshes and textures, which directives are recognized, and how eager the
//! fuzzy matcher is.
//!
//! All fields have defaults, so a config file only needs the keys it changes.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Image extensions indexed by default (lowercase, no dot)
pub const DEFAULT_TEXTURE_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "bmp", "tga", "dds", "tiff", "tif"];

/// Minimum similarity for a texture to be offered as a replacement
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// # Repair Configuration
///
/// Top-level configuration for a repair run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Minimum similarity ratio (0.0 to 1.0) for replacement candidates
    pub similarity_threshold: f64,
    /// File extensions treated as textures (case-insensitive, no dot)
    pub texture_extensions: Vec<String>,
    /// Extension of the mesh file to locate
    pub mesh_extension: String,
    /// Mesh directive naming the material library
    pub material_directive: String,
    /// Keyword prefix marking texture reference lines in the material file
    pub reference_prefix: String,
    /// Console answer meaning "skip this texture"
    pub skip_token: String,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl RepairConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            texture_extensions: DEFAULT_TEXTURE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            mesh_extension: "obj".to_string(),
            material_directive: "mtllib".to_string(),
            reference_prefix: "map_".to_string(),
            skip_token: "n".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Replace the indexed texture extensions
    pub fn with_texture_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texture_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the console skip token
    pub fn with_skip_token(mut self, token: impl Into<String>) -> Self {
        self.skip_token = token.into();
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Whether `extension` (any case, no dot) is an indexed texture type
    pub fn is_texture_extension(&self, extension: &str) -> bool {
        self.texture_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.texture_extensions.is_empty() {
            return Err(ConfigError::Invalid("texture_extensions cannot be empty".to_string()));
        }

        for (name, value) in [
            ("mesh_extension", &self.mesh_extension),
            ("material_directive", &self.material_directive),
            ("reference_prefix", &self.reference_prefix),
            ("skip_token", &self.skip_token),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for RepairConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        let config = RepairConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.texture_extensions.len(), 8);
        assert!(config.is_texture_extension("PNG"));
        assert!(config.is_texture_extension("tif"));
        assert!(!config.is_texture_extension("gif"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = RepairConfig::default().with_similarity_threshold(1.5);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_skip_token_rejected() {
        let config = RepairConfig::default().with_skip_token("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = "similarity_threshold = 0.75\ntexture_extensions = [\"png\", \"ktx2\"]\n";
        let config = RepairConfig::from_str_as(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.similarity_threshold, 0.75);
        assert!(config.is_texture_extension("ktx2"));
        assert_eq!(config.mesh_extension, "obj");
        assert_eq!(config.skip_token, "n");
    }

    #[test]
    fn test_ron_config() {
        let ron = "(skip_token: \"s\", log_level: \"debug\")";
        let config = RepairConfig::from_str_as(ron, ConfigFormat::Ron).unwrap();
        assert_eq!(config.skip_token, "s");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD);
    }
}
