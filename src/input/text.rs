use super::{LoadError, LoadedDocument};
use std::path::Path;

/// Load a plain UTF-8 text file for pacing.
pub fn load(path: &str) -> Result<LoadedDocument, LoadError> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LoadedDocument::new(text, format!("file:{}", path.display()))
}
