//! Plain text reads with path-annotated errors

use crate::{Error, NormalizedPath, Result};
use std::fs;

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}
