//! Raw deck model with byte-stable round trips.

use std::path::{Path, PathBuf};

use keff_core::encoding::{read_text, write_text, TextEncoding};
use keff_core::{ErrorInfo, KeffError};

/// An input deck loaded into memory.
///
/// Lines keep their original terminators so every byte the patcher does not
/// touch is written back unchanged, including mixed `\r\n` endings produced
/// on the simulator's native platform.
#[derive(Debug, Clone)]
pub struct Deck {
    path: PathBuf,
    lines: Vec<String>,
    encoding: TextEncoding,
}

impl Deck {
    /// Loads a deck, trying UTF-8 first and falling back to GBK.
    pub fn load(path: &Path) -> Result<Self, KeffError> {
        let (text, encoding) = read_text(path).map_err(KeffError::Deck)?;
        let lines = text.split_inclusive('\n').map(str::to_string).collect();
        Ok(Self {
            path: path.to_path_buf(),
            lines,
            encoding,
        })
    }

    /// Writes the deck back to its source path with the encoding it was
    /// read with.
    pub fn write(&self) -> Result<(), KeffError> {
        let text: String = self.lines.concat();
        write_text(&self.path, &text, self.encoding).map_err(KeffError::Deck)
    }

    /// Path the deck was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines in the deck.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the raw line (terminator included) at a 1-based index.
    pub fn line(&self, lineno: usize) -> Result<&str, KeffError> {
        lineno
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
            .ok_or_else(|| {
                KeffError::Patch(
                    ErrorInfo::new("line-out-of-range", "target line beyond end of deck")
                        .with_context("line", lineno.to_string())
                        .with_context("lines", self.lines.len().to_string())
                        .with_context("path", self.path.display().to_string()),
                )
            })
    }

    pub(crate) fn set_line(&mut self, lineno: usize, content: String) {
        self.lines[lineno - 1] = content;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn line_access_is_one_based() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deck.i");
        fs::write(&path, "first\r\nsecond\nthird").unwrap();
        let deck = Deck::load(&path).expect("load");
        assert_eq!(deck.line_count(), 3);
        assert_eq!(deck.line(1).unwrap(), "first\r\n");
        assert_eq!(deck.line(3).unwrap(), "third");
        let err = deck.line(4).unwrap_err();
        assert_eq!(err.info().code, "line-out-of-range");
    }

    #[test]
    fn unmodified_decks_round_trip_byte_exactly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deck.i");
        let original = b"a 1\r\nb 2\nc 3";
        fs::write(&path, original).unwrap();
        let deck = Deck::load(&path).expect("load");
        deck.write().expect("write");
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}
