//! Material library texture path rewriting
//!
//! Repairs `map_*` lines of an MTL file in two passes over the file text:
//! discovery collects references with no indexed texture and asks for
//! replacements, then the rewrite pass substitutes every path it can. The
//! file is only written once both passes finished without an abort.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::assets::texture_index::{file_name_of, TextureIndex};
use crate::core::config::RepairConfig;
use crate::error::RepairError;
use crate::foundation::text;
use crate::resolver::{DecisionProvider, Resolver};

/// A `<keyword> <path>` texture line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureReference<'a> {
    /// Map keyword as written, e.g. `map_Kd`
    pub keyword: &'a str,
    /// Everything after the keyword, trimmed (may contain spaces or options)
    pub path: &'a str,
}

impl<'a> TextureReference<'a> {
    /// Parse a material line; `None` for anything that is not a texture reference
    ///
    /// The keyword must start with `prefix` (case-insensitive), continue with at
    /// least one word character, and be followed by whitespace and a path.
    pub fn parse(line: &'a str, prefix: &str) -> Option<Self> {
        let line = line.trim();
        let split = line.find(char::is_whitespace)?;
        let (keyword, rest) = line.split_at(split);

        let has_prefix = keyword
            .get(..prefix.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(prefix));
        let is_word = keyword.chars().all(|c| c.is_alphanumeric() || c == '_');
        if !has_prefix || keyword.len() == prefix.len() || !is_word {
            return None;
        }

        let path = rest.trim_start();
        if path.is_empty() {
            return None;
        }
        Some(Self { keyword, path })
    }

    /// Texture file name, without any directories
    pub fn file_name(&self) -> &'a str {
        file_name_of(self.path)
    }
}

/// A reference whose file name is not in the texture index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTexture {
    /// 1-based line in the material file
    pub line_number: usize,
    /// Path exactly as written
    pub path: String,
}

/// Missing path (lowercase) -> accepted replacement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    replacements: HashMap<String, String>,
}

impl ReplacementMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted replacement; a later choice for the same path wins
    pub fn insert(&mut self, missing: &str, replacement: impl Into<String>) {
        self.replacements.insert(missing.to_lowercase(), replacement.into());
    }

    /// Replacement for a missing path (any case)
    pub fn get(&self, missing: &str) -> Option<&str> {
        self.replacements.get(&missing.to_lowercase()).map(String::as_str)
    }

    /// Number of accepted replacements
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Whether nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Output of the rewrite pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenMaterial {
    /// Output lines, each with its line terminator
    pub lines: Vec<String>,
    /// References rewritten from an exact file name match
    pub direct_matches: usize,
    /// References rewritten from an accepted replacement
    pub replacements_applied: usize,
    /// Reference paths left as they were
    pub unresolved: Vec<String>,
    /// Lines whose text actually changed
    pub changed_lines: usize,
}

impl RewrittenMaterial {
    /// Full file text
    pub fn contents(&self) -> String {
        self.lines.concat()
    }
}

/// Everything a material repair produced
#[derive(Debug, Clone, Default)]
pub struct MaterialRepair {
    /// References discovered as missing, in file order
    pub missing: Vec<MissingTexture>,
    /// Replacements accepted for them
    pub replacements: ReplacementMap,
    /// Rewrite pass result
    pub rewritten: RewrittenMaterial,
    /// Whether the file was overwritten
    pub written: bool,
}

/// Rewrites texture references of one material file
pub struct MaterialRewriter<'a> {
    index: &'a TextureIndex,
    config: &'a RepairConfig,
}

impl<'a> MaterialRewriter<'a> {
    /// Create a rewriter over an already built index
    pub fn new(index: &'a TextureIndex, config: &'a RepairConfig) -> Self {
        Self { index, config }
    }

    /// Discovery pass: references whose file name is not indexed
    ///
    /// Repeated paths are reported once per occurrence.
    pub fn discover(&self, contents: &str) -> Vec<MissingTexture> {
        contents
            .lines()
            .enumerate()
            .filter_map(|(n, line)| {
                let reference = TextureReference::parse(line, &self.config.reference_prefix)?;
                (!self.index.contains(reference.file_name())).then(|| MissingTexture {
                    line_number: n + 1,
                    path: reference.path.to_string(),
                })
            })
            .collect()
    }

    /// Ask the resolver about each missing reference, in discovery order
    pub fn collect_replacements<P: DecisionProvider + ?Sized>(
        &self,
        missing: &[MissingTexture],
        resolver: &mut Resolver<'_, P>,
    ) -> Result<ReplacementMap, RepairError> {
        let mut replacements = ReplacementMap::new();
        if missing.is_empty() {
            return Ok(replacements);
        }

        log::warn!("Some textures are missing. Starting interactive replacement process...");
        for texture in missing {
            match resolver.resolve(&texture.path)? {
                Some(replacement) => replacements.insert(&texture.path, replacement),
                None => log::info!("No replacement selected for {}", texture.path),
            }
        }
        Ok(replacements)
    }

    /// Rewrite pass over the file text
    ///
    /// Exact file name matches take priority over accepted replacements.
    /// Non-reference lines are kept byte for byte.
    pub fn rewrite(&self, contents: &str, replacements: &ReplacementMap) -> RewrittenMaterial {
        let mut out = RewrittenMaterial::default();

        for line in contents.split_inclusive('\n') {
            let Some(reference) = TextureReference::parse(line, &self.config.reference_prefix) else {
                out.lines.push(line.to_string());
                continue;
            };

            let new_path = if let Some(path) = self.index.get(reference.file_name()) {
                log::info!("Direct match - Rewriting {}: {} -> {}", reference.keyword, reference.path, path);
                out.direct_matches += 1;
                path
            } else if let Some(path) = replacements.get(reference.path) {
                log::info!("Using replacement - Rewriting {}: {} -> {}", reference.keyword, reference.path, path);
                out.replacements_applied += 1;
                path
            } else {
                log::warn!("No replacement found for texture: {}", reference.path);
                out.unresolved.push(reference.path.to_string());
                out.lines.push(line.to_string());
                continue;
            };

            let updated = format!("{} {}\n", reference.keyword, new_path.replace('\\', "/"));
            if updated != line {
                out.changed_lines += 1;
            }
            out.lines.push(updated);
        }

        out
    }

    /// Run both passes on `path` and overwrite it unless `dry_run`
    ///
    /// Aborts without touching the file when references are missing and no
    /// replacement was accepted for any of them.
    pub fn repair_file<P: DecisionProvider + ?Sized>(
        &self,
        path: &Path,
        resolver: &mut Resolver<'_, P>,
        dry_run: bool,
    ) -> Result<MaterialRepair, RepairError> {
        let missing = self.discover(&text::read_lossy(path)?);
        let replacements = self.collect_replacements(&missing, resolver)?;

        if !missing.is_empty() && replacements.is_empty() {
            return Err(RepairError::NoReplacementsSelected { missing: missing.len() });
        }

        let rewritten = self.rewrite(&text::read_lossy(path)?, &replacements);

        let written = if dry_run {
            log::info!("Dry run, {:?} left unchanged", path);
            false
        } else {
            fs::write(path, rewritten.contents()).map_err(|e| RepairError::io(path, e))?;
            true
        };

        Ok(MaterialRepair { missing, replacements, rewritten, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Decision, ScriptedDecisions};

    const MTL: &str = "\
newmtl Crate
Kd 0.8 0.8 0.8
map_Kd C:\\Users\\artist\\Desktop\\wood.png
map_Bump /old/brick_old.png
# map_Ks commented out
bump legacy_normal.png
";

    fn index() -> TextureIndex {
        TextureIndex::from_relative_paths(["tex/wood.png", "tex/walls/brick_new.png"])
    }

    #[test]
    fn test_parse_reference() {
        let r = TextureReference::parse("  map_Kd   textures/my wood.png \r\n", "map_").unwrap();
        assert_eq!(r.keyword, "map_Kd");
        assert_eq!(r.path, "textures/my wood.png");
        assert_eq!(r.file_name(), "my wood.png");

        let upper = TextureReference::parse("MAP_KA ao.tga", "map_").unwrap();
        assert_eq!(upper.keyword, "MAP_KA");
    }

    #[test]
    fn test_parse_rejects_non_references() {
        for line in ["map_Kd", "map_ x.png", "bump n.png", "map_Kd-x a.png", "# map_Kd a.png", "", "Kd 1 1 1"] {
            assert_eq!(TextureReference::parse(line, "map_"), None, "{:?}", line);
        }
    }

    #[test]
    fn test_discover_missing() {
        let config = RepairConfig::default();
        let index = index();
        let missing = MaterialRewriter::new(&index, &config).discover(MTL);
        assert_eq!(
            missing,
            vec![MissingTexture { line_number: 4, path: "/old/brick_old.png".to_string() }]
        );
    }

    #[test]
    fn test_discover_keeps_duplicates() {
        let config = RepairConfig::default();
        let index = TextureIndex::new();
        let mtl = "map_Kd a.png\nmap_Ks a.png\nmap_Ka A.PNG\n";
        let missing = MaterialRewriter::new(&index, &config).discover(mtl);
        assert_eq!(missing.len(), 3);
        assert_eq!(missing[2].path, "A.PNG");
    }

    #[test]
    fn test_rewrite_priorities() {
        let config = RepairConfig::default();
        let index = index();
        let mut replacements = ReplacementMap::new();
        replacements.insert("/OLD/brick_old.png", "tex/walls/brick_new.png");

        let out = MaterialRewriter::new(&index, &config).rewrite(MTL, &replacements);
        assert_eq!(
            out.contents(),
            "\
newmtl Crate
Kd 0.8 0.8 0.8
map_Kd tex/wood.png
map_Bump tex/walls/brick_new.png
# map_Ks commented out
bump legacy_normal.png
"
        );
        assert_eq!(out.direct_matches, 1);
        assert_eq!(out.replacements_applied, 1);
        assert!(out.unresolved.is_empty());
        assert_eq!(out.changed_lines, 2);
    }

    #[test]
    fn test_rewrite_leaves_unresolved_verbatim() {
        let config = RepairConfig::default();
        let index = index();
        let mtl = "map_d   lost.png\r\nKd 1 1 1";
        let out = MaterialRewriter::new(&index, &config).rewrite(mtl, &ReplacementMap::new());
        assert_eq!(out.contents(), mtl);
        assert_eq!(out.unresolved, vec!["lost.png".to_string()]);
        assert_eq!(out.changed_lines, 0);
    }

    #[test]
    fn test_collect_replacements_later_choice_wins() {
        let config = RepairConfig::default();
        let index = index();
        let missing = vec![
            MissingTexture { line_number: 1, path: "brick_old.png".to_string() },
            MissingTexture { line_number: 2, path: "Brick_Old.png".to_string() },
        ];
        let mut provider = ScriptedDecisions::new([Decision::Skip, Decision::Accept(0)]);
        let mut resolver = Resolver::new(&index, 0.6, &mut provider);

        let map = MaterialRewriter::new(&index, &config)
            .collect_replacements(&missing, &mut resolver)
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("BRICK_OLD.PNG"), Some("tex/walls/brick_new.png"));
    }
}
