use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes any serializable value (suggestions, approved maps) as pretty JSON.
pub fn export_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    export_text(&json, path)
}

/// Writes text as-is, e.g. a rewritten IFC file.
pub fn export_text<P: AsRef<Path>>(text: &str, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(text.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}
