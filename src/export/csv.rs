use crate::error::ExportError;
use crate::export::table::{MaterialTable, HEADER};
use std::fs::File;
use std::path::Path;

/// Writes the material table as a `;`-delimited file.
pub fn export_table<P: AsRef<Path>>(table: &MaterialTable, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(file);

    writer.write_record(HEADER)?;
    for record in table.records() {
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
