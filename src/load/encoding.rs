use encoding_rs::Encoding;
use tracing::warn;

use crate::error::{Error, Result};

/// Encoding of the published tour sheet.
pub const SOURCE_ENCODING: &str = "windows-1252";

/// Encoding assumed for uploaded files.
pub const UPLOAD_ENCODING: &str = "utf-8";

/// Resolve a WHATWG encoding label (`"1252"`, `"cp1252"`, `"latin1"`,
/// `"utf-8"`, ...).
pub fn resolve(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    // bare code page numbers are not WHATWG labels
    let lookup = if label.chars().all(|c| c.is_ascii_digit()) {
        format!("windows-{}", label)
    } else {
        label.to_string()
    };
    Encoding::for_label(lookup.as_bytes()).ok_or_else(|| Error::UnknownEncoding(label.into()))
}

/// Decode `bytes` into text. A leading BOM overrides `encoding`.
/// Unmappable sequences become U+FFFD and are logged, not rejected.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "input contained byte sequences invalid for the encoding; replaced"
        );
    }
    text.into_owned()
}
