//! Export/import of the line set as a JSON array.

use crate::document::LineSet;
use crate::line::Line;
use std::collections::HashSet;
use thiserror::Error;

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "project.txt";

/// Errors reading or writing the persisted representation.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Malformed line data: {0}")]
    Malformed(String),
    #[error("Duplicate line id: {0}")]
    DuplicateId(u64),
}

/// Serialize lines in order as `[{id, start:{x,y}, end:{x,y}}, ...]`.
pub fn export_lines(lines: &LineSet) -> Result<String, PersistError> {
    serde_json::to_string_pretty(lines.as_slice()).map_err(|e| PersistError::Malformed(e.to_string()))
}

/// Parse an exported array.
///
/// Fails on anything that is not an array of well-formed lines with finite
/// coordinates and distinct ids; a failed parse yields nothing.
pub fn import_lines(input: &str) -> Result<Vec<Line>, PersistError> {
    let lines: Vec<Line> =
        serde_json::from_str(input).map_err(|e| PersistError::Malformed(e.to_string()))?;

    let mut seen = HashSet::with_capacity(lines.len());
    for line in &lines {
        let coords = [line.start.x, line.start.y, line.end.x, line.end.y];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(PersistError::Malformed(format!(
                "line {} has a non-finite coordinate",
                line.id
            )));
        }
        if !seen.insert(line.id) {
            return Err(PersistError::DuplicateId(line.id.0));
        }
    }
    Ok(lines)
}
