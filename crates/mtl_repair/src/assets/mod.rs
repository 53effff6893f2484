//! Asset file handling: texture discovery, OBJ/MTL references and rewriting

pub mod similarity;
pub mod texture_index;
pub mod reference_locator;
pub mod material_rewriter;

pub use similarity::{similarity_ratio, normalize_name};
pub use texture_index::{TextureIndex, TextureEntry};
pub use reference_locator::ReferenceLocator;
pub use material_rewriter::{
    MaterialRewriter, MaterialRepair, MissingTexture, ReplacementMap,
    RewrittenMaterial, TextureReference,
};
