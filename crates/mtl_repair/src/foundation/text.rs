//! Tolerant text decoding for OBJ/MTL files
//!
//! Asset files exported by DCC tools are frequently Latin-1 or mixed encodings.
//! Only ASCII directives matter to the repair pipeline, so invalid UTF-8 byte
//! sequences are dropped instead of failing the read.

use std::fs;
use std::path::Path;

use crate::error::RepairError;

/// Decode bytes as UTF-8, skipping any invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Read a whole file and decode it with [`decode_lossy`]
pub fn read_lossy(path: &Path) -> Result<String, RepairError> {
    let bytes = fs::read(path).map_err(|source| RepairError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_lossy(&bytes))
}
