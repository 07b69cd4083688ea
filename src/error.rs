// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a load or a normalization call.
///
/// Field-level degradations (unparsable revenue, attendance without a `/`,
/// zero tickets sold) are not errors; they are folded into the output as
/// zero or missing values.
#[derive(Debug, Error)]
pub enum Error {
    /// The source file is missing or could not be read.
    #[error("source file {} is unavailable: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding label {0:?}")]
    UnknownEncoding(String),

    /// A record could not be split into fields, or has more fields than the
    /// header. `row` is the 0-based data row.
    #[error("malformed CSV record at row {row}: {reason}")]
    Csv { row: usize, reason: String },

    /// A present attendance value containing `/` had a side that is not a
    /// non-negative integer.
    #[error("malformed attendance {raw:?} at row {row}")]
    AttendanceMalformed { row: usize, raw: String },
}

pub type Result<T> = std::result::Result<T, Error>;
