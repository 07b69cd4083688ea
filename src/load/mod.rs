// src/load/mod.rs
pub mod encoding;
pub mod raw_record;

use csv::{ReaderBuilder, Trim};
use std::{fs, io::Read, path::Path};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
pub use raw_record::{is_missing_marker, RawRecord};

/// Source path that means "read the upload from standard input".
pub const STDIN: &str = "-";

/// Read the tour sheet at `path`, decoding it with `encoding_label`.
///
/// A missing or unreadable file is `Error::SourceUnavailable`; nothing is
/// returned for a partially read file.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P, encoding_label: &str) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), "read source file");

    let records = load_bytes(&bytes, encoding_label)?;
    info!(rows = records.len(), "loaded raw records");
    Ok(records)
}

/// Parse an in-memory file (e.g. an upload) of the same shape as the tour sheet.
pub fn load_bytes(bytes: &[u8], encoding_label: &str) -> Result<Vec<RawRecord>> {
    let enc = encoding::resolve(encoding_label)?;
    let text = encoding::decode(bytes, enc);
    parse_content(&text)
}

/// Read an upload to the end and parse it like [`load_bytes`].
///
/// `source` only labels the input in errors and logs (e.g. `<stdin>`).
#[tracing::instrument(level = "info", skip(reader))]
pub fn load_reader<R: Read>(
    mut reader: R,
    source: &str,
    encoding_label: &str,
) -> Result<Vec<RawRecord>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::SourceUnavailable {
            path: source.into(),
            source: e,
        })?;
    debug!(bytes = bytes.len(), "read upload");

    let records = load_bytes(&bytes, encoding_label)?;
    info!(rows = records.len(), "loaded raw records");
    Ok(records)
}

/// Parse decoded CSV text with a header row into raw records, in file order.
///
/// Rows shorter than the header leave trailing columns missing; a row with
/// more fields than the header is `Error::Csv`.
pub fn parse_content(content: &str) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| Error::Csv {
            row: 0,
            reason: format!("header: {e}"),
        })?
        .clone();

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            row,
            reason: e.to_string(),
        })?;
        if record.len() > headers.len() {
            warn!(row, fields = record.len(), expected = headers.len(), "row longer than header");
            return Err(Error::Csv {
                row,
                reason: format!(
                    "{} fields, header has {}",
                    record.len(),
                    headers.len()
                ),
            });
        }
        let raw: RawRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| Error::Csv {
                row,
                reason: e.to_string(),
            })?;
        out.push(raw);
    }
    Ok(out)
}
