//! Mesh and material file discovery
//!
//! Finds the single OBJ file in an asset folder and follows its `mtllib`
//! directive to the material library that needs repairing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::RepairConfig;
use crate::error::RepairError;
use crate::foundation::text;

/// Locates mesh and material files inside one asset folder
pub struct ReferenceLocator<'a> {
    folder: &'a Path,
    config: &'a RepairConfig,
}

impl<'a> ReferenceLocator<'a> {
    /// Create a locator for `folder`
    pub fn new(folder: &'a Path, config: &'a RepairConfig) -> Self {
        Self { folder, config }
    }

    /// Find the one mesh file directly inside the folder
    ///
    /// Subfolders are not searched. Zero or several matches abort the run.
    pub fn locate_mesh(&self) -> Result<PathBuf, RepairError> {
        let read_dir = fs::read_dir(self.folder).map_err(|e| RepairError::io(self.folder, e))?;

        let mut meshes = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| RepairError::io(self.folder, e))?;
            let path = entry.path();
            if path.is_file() && self.has_mesh_extension(&path) {
                meshes.push(path);
            }
        }
        meshes.sort();

        match meshes.len() {
            0 => Err(RepairError::NoMeshFile {
                extension: self.config.mesh_extension.clone(),
            }),
            1 => Ok(meshes.remove(0)),
            _ => Err(RepairError::AmbiguousMeshFile {
                extension: self.config.mesh_extension.clone(),
                found: meshes
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect(),
            }),
        }
    }

    /// Material library file name declared by the mesh, if any
    pub fn material_reference(&self, mesh_path: &Path) -> Result<Option<String>, RepairError> {
        let contents = text::read_lossy(mesh_path)?;
        Ok(find_material_directive(&contents, &self.config.material_directive))
    }

    /// Path of the declared material file, which must exist in the folder
    pub fn resolve_material(&self, material_name: &str) -> Result<PathBuf, RepairError> {
        let path = self.folder.join(material_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RepairError::MaterialNotFound(material_name.to_string()))
        }
    }

    fn has_mesh_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.mesh_extension))
    }
}

/// Second token of the first `<directive> <file>` line
///
/// The directive match is case-insensitive. A bare directive with no file name
/// is skipped and the search continues.
pub fn find_material_directive(contents: &str, directive: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(command), Some(file)) if command.eq_ignore_ascii_case(directive) => {
                Some(file.to_string())
            }
            _ => None,
        }
    })
}
