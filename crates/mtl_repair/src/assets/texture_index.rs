//! Texture index
//!
//! Catalog of image files present under an asset folder, keyed by lowercase
//! file name. Directory structure is deliberately ignored: material files
//! from other machines carry stale directories, but file names survive.

use std::collections::HashMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::core::config::RepairConfig;
use crate::error::RepairError;

/// An indexed texture file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    /// File name as found on disk
    pub file_name: String,
    /// Path relative to the indexed root, `/`-separated
    pub relative_path: String,
}

/// Lowercase file name -> texture, in enumeration order
///
/// When two folders contain the same file name the later one replaces the
/// earlier one in place. This ambiguity is reported, not resolved.
#[derive(Debug, Clone, Default)]
pub struct TextureIndex {
    entries: Vec<TextureEntry>,
    by_name: HashMap<String, usize>,
}

impl TextureIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively index every texture file under `root`
    ///
    /// Each directory lists its own files (sorted by name) before descending
    /// into its subdirectories, so a nested duplicate overrides its ancestor.
    /// Symlinked files are indexed; symlinked directories are not followed.
    pub fn build(root: &Path, config: &RepairConfig) -> Result<Self, RepairError> {
        let mut index = Self::new();

        let walker = WalkDir::new(root)
            .sort_by_key(|e| (e.file_type().is_dir(), e.file_name().to_os_string()));
        for entry in walker {
            let entry = entry?;
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let is_texture = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| config.is_texture_extension(ext));
            if !is_texture {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            index.insert(relative.to_string_lossy().into_owned());
        }

        log::debug!("Indexed {} texture(s) under {:?}", index.len(), root);
        Ok(index)
    }

    /// Build an index from paths already relative to the root
    pub fn from_relative_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for path in paths {
            index.insert(path.as_ref().to_string());
        }
        index
    }

    /// Add one texture by relative path
    pub fn insert(&mut self, relative_path: String) {
        let relative_path = relative_path.replace('\\', "/");
        let file_name = file_name_of(&relative_path).to_string();
        let key = file_name.to_lowercase();
        let entry = TextureEntry { file_name, relative_path };

        match self.by_name.get(&key) {
            Some(&slot) => {
                log::warn!(
                    "Duplicate texture name '{}': '{}' overrides '{}'",
                    key, entry.relative_path, self.entries[slot].relative_path
                );
                self.entries[slot] = entry;
            }
            None => {
                self.by_name.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Relative path of the texture with this file name (any case)
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.by_name
            .get(&file_name.to_lowercase())
            .map(|&slot| self.entries[slot].relative_path.as_str())
    }

    /// Whether a texture with this file name (any case) is indexed
    pub fn contains(&self, file_name: &str) -> bool {
        self.by_name.contains_key(&file_name.to_lowercase())
    }

    /// Indexed textures in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = &TextureEntry> {
        self.entries.iter()
    }

    /// Number of indexed textures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no textures were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final component of a texture path, accepting `/` and `\` separators
///
/// Material files written on Windows keep backslashes even when read elsewhere.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}
