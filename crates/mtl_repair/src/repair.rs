//! Repair orchestration
//!
//! Runs the pipeline for one asset folder: mesh -> material -> texture index
//! -> material rewrite. Every structural problem aborts before the material
//! file is touched.

use std::path::{Path, PathBuf};

use crate::assets::{MaterialRewriter, ReferenceLocator, TextureIndex};
use crate::core::config::RepairConfig;
use crate::error::RepairError;
use crate::resolver::{DecisionProvider, Resolver};

/// Summary of a finished repair
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Mesh file that was followed
    pub mesh_path: PathBuf,
    /// Material file that was repaired
    pub material_path: PathBuf,
    /// Number of texture files found
    pub textures_indexed: usize,
    /// Missing references discovered (occurrences)
    pub missing_textures: usize,
    /// Replacements the user accepted
    pub replacements_accepted: usize,
    /// Lines rewritten from exact file name matches
    pub direct_matches: usize,
    /// Lines rewritten from accepted replacements
    pub replacements_applied: usize,
    /// References left unresolved
    pub unresolved: usize,
    /// Lines whose text changed
    pub changed_lines: usize,
    /// Non-fatal problems, in the order they happened
    pub warnings: Vec<String>,
    /// Whether the material file was overwritten
    pub written: bool,
}

/// Texture reference repair for an OBJ/MTL asset folder
#[derive(Debug, Clone, Default)]
pub struct TextureRepair {
    config: RepairConfig,
    dry_run: bool,
}

impl TextureRepair {
    /// Create a repair run with the given configuration
    pub fn new(config: RepairConfig) -> Self {
        Self { config, dry_run: false }
    }

    /// Run every pass but never write the material file
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Repair the material referenced by the mesh in `folder`
    pub fn run<P: DecisionProvider + ?Sized>(
        &self,
        folder: &Path,
        provider: &mut P,
    ) -> Result<RepairReport, RepairError> {
        self.config.validate()?;
        if !folder.is_dir() {
            return Err(RepairError::InvalidDirectory(folder.to_path_buf()));
        }
        log::info!("Working in folder: {}", folder.display());

        let locator = ReferenceLocator::new(folder, &self.config);
        let mesh_path = locator.locate_mesh()?;
        log::info!("Found mesh file: {}", display_name(&mesh_path));

        let material_name = locator
            .material_reference(&mesh_path)?
            .ok_or_else(|| RepairError::NoMaterialReference(mesh_path.clone()))?;
        log::info!("Mesh references material file: {}", material_name);
        let material_path = locator.resolve_material(&material_name)?;

        let mut report = RepairReport {
            mesh_path,
            material_path,
            ..RepairReport::default()
        };

        let index = TextureIndex::build(folder, &self.config)?;
        if index.is_empty() {
            let warning = "No texture files found in the folder or its subfolders".to_string();
            log::warn!("{}", warning);
            report.warnings.push(warning);
        } else {
            log::info!("Found {} texture file(s) in the folder and subfolders", index.len());
        }
        report.textures_indexed = index.len();

        let rewriter = MaterialRewriter::new(&index, &self.config);
        let mut resolver = Resolver::new(&index, self.config.similarity_threshold, provider);
        let repair = rewriter.repair_file(&report.material_path, &mut resolver, self.dry_run)?;

        report.missing_textures = repair.missing.len();
        report.replacements_accepted = repair.replacements.len();
        report.direct_matches = repair.rewritten.direct_matches;
        report.replacements_applied = repair.rewritten.replacements_applied;
        report.unresolved = repair.rewritten.unresolved.len();
        report.changed_lines = repair.rewritten.changed_lines;
        report.warnings.extend(
            repair.rewritten.unresolved.iter().map(|path| format!("No replacement found for texture: {}", path)),
        );
        report.written = repair.written;

        if report.written {
            log::info!(
                "Material file '{}' has been updated with correct texture paths",
                display_name(&report.material_path)
            );
        }
        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
