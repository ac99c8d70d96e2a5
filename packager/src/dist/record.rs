//! The wheel `RECORD` file.
//!
//! Each line is `path,sha256=<digest>,size`, where the digest is the
//! URL-safe base64 encoding of the SHA-256 hash without padding. The
//! `RECORD` file lists itself last with empty hash and size fields.

use super::payload::ArchiveEntry;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Return the `sha256=<digest>` field for `contents`.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::record::record_digest;
///
/// assert_eq!(
///     record_digest(b""),
///     "sha256=47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
/// );
/// ```
#[must_use]
pub fn record_digest(contents: &[u8]) -> String {
    format!("sha256={}", URL_SAFE_NO_PAD.encode(Sha256::digest(contents)))
}

/// Render the `RECORD` file for `entries`, listing `record_path` last.
#[must_use]
pub fn render_record(entries: &[ArchiveEntry], record_path: &str) -> String {
    let mut record = String::new();
    for entry in entries {
        record.push_str(&format!(
            "{},{},{}\n",
            quote_csv(&entry.path),
            record_digest(&entry.contents),
            entry.contents.len()
        ));
    }
    record.push_str(&format!("{},,\n", quote_csv(record_path)));
    record
}

/// Quote a CSV field when it contains a separator or quote.
fn quote_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
