use std::fs;
use std::path::Path;

use crate::error::ManifestError;

/// Read the full text of a manifest file.
///
/// # Errors
///
/// Returns an error when the file cannot be read as UTF-8 text or is empty.
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Err(ManifestError::EmptyContent);
    }
    Ok(content)
}
