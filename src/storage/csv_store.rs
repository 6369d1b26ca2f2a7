use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Reads every row that deserializes; malformed rows are logged and skipped.
pub fn read_records_from_reader<T: DeserializeOwned, R: Read>(rdr: R) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(rec) => records.push(rec),
            Err(e) => warn!("skipping malformed row {}: {}", line + 2, e),
        }
    }
    Ok(records)
}

pub fn read_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let file = fs::File::open(path.as_ref())?;
    read_records_from_reader(file)
}

/// Like [`read_records`] but a missing file is `None` rather than an error.
pub fn read_records_if_exists<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Option<Vec<T>>> {
    if !path.as_ref().exists() {
        return Ok(None);
    }
    read_records(path).map(Some)
}

pub fn write_records_to_writer<T: Serialize, W: Write>(w: W, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for rec in records {
        writer.serialize(rec)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `records` with a header row, creating parent directories.
///
/// An empty slice produces an empty file since the header comes from the first row.
pub fn write_records<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_records_to_writer(file, records)?;
    info!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}
