//! Thin demonstration harness over `Engine`: loads a JSON snapshot
//! fixture and prints the six decisions for observability during
//! development. Not part of the core's contract — see `src/bin/decide.rs`.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::snapshot::GameSnapshot;

/// Reads and parses a `GameSnapshot` fixture from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<GameSnapshot> {
    let contents = fs::read_to_string(path)
        .map_err(|e| EngineError::InvalidArgument(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| EngineError::InvalidArgument(format!("malformed snapshot JSON: {e}")))
}
