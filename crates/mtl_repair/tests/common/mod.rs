//! Common test utilities: throwaway asset folders on disk
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary asset folder
pub struct AssetFolder {
    dir: TempDir,
}

impl AssetFolder {
    /// Create an empty folder
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("create temp dir") }
    }

    /// Folder root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file (creating parent directories) and return its full path
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Create empty texture files
    pub fn touch_all(&self, relatives: &[&str]) {
        for relative in relatives {
            self.write(relative, "");
        }
    }

    /// Read a file back
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read fixture file")
    }
}

/// Minimal mesh referencing `material`
pub fn mesh_with_material(material: &str) -> String {
    format!("# test mesh\nmtllib {}\no cube\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Crate\nf 1 2 3\n", material)
}
