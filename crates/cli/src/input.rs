//! Transcript input

use lingo_core::{LingoError, Result};
use std::io::Read;
use std::path::Path;

/// Read the transcript from `path`, or from stdin when no path is given.
///
/// Whitespace-only input is rejected as [`LingoError::EmptyInput`].
pub fn read_transcript(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| LingoError::input_unavailable(path.display().to_string(), e))?;
            non_empty(text)
        }
        None => read_from(std::io::stdin().lock(), "stdin"),
    }
}

/// Read a whole transcript from any reader
pub fn read_from<R: Read>(mut reader: R, name: &str) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| LingoError::input_unavailable(name, e))?;
    non_empty(text)
}

fn non_empty(text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(LingoError::EmptyInput);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "You: I want a flat.").unwrap();

        let text = read_transcript(Some(file.path())).unwrap();
        assert_eq!(text, "You: I want a flat.\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_transcript(Some(&dir.path().join("missing.txt"))).unwrap_err();

        assert!(matches!(err, LingoError::InputUnavailable { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_blank_input_rejected() {
        let err = read_from("  \n\t\n".as_bytes(), "stdin").unwrap_err();
        assert!(matches!(err, LingoError::EmptyInput));
    }

    #[test]
    fn test_invalid_utf8_is_unavailable() {
        let err = read_from(&[0xff, 0xfe, 0x00][..], "stdin").unwrap_err();
        assert!(matches!(err, LingoError::InputUnavailable { .. }));
    }
}
