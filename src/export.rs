use log::info;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pipeline::{ResultRow, ScanMode};

pub const HEADERS: [&str; 5] = [
    "Name",
    "Profile URL",
    "Snippet / Full Text",
    "Emails Found",
    "Phones Found",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Header row, then one record per row. Emails and phones are comma-joined.
pub fn write_csv<W: Write>(writer: W, rows: &[ResultRow]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for row in rows {
        let emails = row.contacts.emails_joined();
        let phones = row.contacts.phones_joined();
        csv_writer.write_record([
            row.name.as_str(),
            row.profile_url.as_str(),
            row.display_text.as_str(),
            emails.as_str(),
            phones.as_str(),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serializes the rows into a UTF-8 byte buffer, ready for a download.
pub fn to_csv_bytes(rows: &[ResultRow]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(buf)
}

/// Writes `rows` to the mode's fixed file name inside `dir`, replacing any
/// previous export.
pub fn export_to_file(dir: &Path, mode: &ScanMode, rows: &[ResultRow]) -> Result<PathBuf, ExportError> {
    let path = dir.join(mode.export_file_name());
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    write_csv(file, rows)?;
    info!("Wrote {} row(s) to {}", rows.len(), path.display());
    Ok(path)
}
