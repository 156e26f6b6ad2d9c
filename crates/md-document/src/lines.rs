//! Whole-file, line-oriented UTF-8 I/O

use std::fs;
use std::path::Path;

use crate::error::{MdDocumentError, Result};

/// Read a UTF-8 file as lines
///
/// A leading byte order mark is dropped; `\n` and `\r\n` both end a line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| MdDocumentError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(content.lines().map(String::from).collect())
}

/// Write lines to a file, each terminated by `\n`
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).map_err(|e| MdDocumentError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_lines_strips_bom_and_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "\u{feff}---\r\ntitle: x\r\n---\r\nbody").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["---", "title: x", "---", "body"]);
    }

    #[test]
    fn test_write_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_lines(&path, &["a".to_string(), "".to_string(), "b".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\nb\n");
        assert_eq!(read_lines(&path).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_lines(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, MdDocumentError::Read { .. }));
    }
}
