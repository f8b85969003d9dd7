//! Text I/O with a legacy-encoding fallback.
//!
//! Decks and reports produced on the simulator's native platform are
//! usually UTF-8 but occasionally GBK. Reads try UTF-8 first and fall back
//! to GBK; writes must use whichever encoding the read detected so the
//! round trip stays byte-stable.

use std::fs;
use std::path::Path;

use encoding_rs::GBK;

use crate::errors::ErrorInfo;

/// Encoding detected while reading a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain UTF-8.
    Utf8,
    /// Legacy simplified-Chinese double-byte encoding.
    Gbk,
}

/// Reads a text file, trying UTF-8 first and falling back to GBK.
///
/// Errors are returned as bare [`ErrorInfo`] payloads so callers can wrap
/// them in the error family that fits their pipeline stage.
pub fn read_text(path: &Path) -> Result<(String, TextEncoding), ErrorInfo> {
    let bytes = fs::read(path).map_err(|err| {
        ErrorInfo::new("file-read", "failed to read text file")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string())
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, TextEncoding::Utf8)),
        Err(err) => {
            let bytes = err.into_bytes();
            let (text, _, had_errors) = GBK.decode(&bytes);
            if had_errors {
                return Err(ErrorInfo::new(
                    "file-encoding",
                    "file is neither valid UTF-8 nor valid GBK",
                )
                .with_context("path", path.display().to_string()));
            }
            Ok((text.into_owned(), TextEncoding::Gbk))
        }
    }
}

/// Writes a text file using the encoding detected when it was read.
pub fn write_text(path: &Path, text: &str, encoding: TextEncoding) -> Result<(), ErrorInfo> {
    let bytes = match encoding {
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
        TextEncoding::Gbk => {
            let (bytes, _, had_errors) = GBK.encode(text);
            if had_errors {
                return Err(ErrorInfo::new(
                    "file-encoding",
                    "text contains characters not representable in GBK",
                )
                .with_context("path", path.display().to_string()));
            }
            bytes.into_owned()
        }
    };
    fs::write(path, bytes).map_err(|err| {
        ErrorInfo::new("file-write", "failed to write text file")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string())
    })
}
