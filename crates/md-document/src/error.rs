//! Error and warning types

use std::path::PathBuf;

use pandoc_opts::PandocVersion;
use serde::Serialize;

/// Errors that can occur while building or running the markdown format
#[derive(Debug, thiserror::Error)]
pub enum MdDocumentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Pandoc was not found (set RSTUDIO_PANDOC or add pandoc to PATH)")]
    PandocNotFound,

    #[error("Failed to run pandoc at {path}: {source}")]
    PandocSpawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Pandoc failed converting {input} ({}): {stderr}", exit_label(.status))]
    PandocFailed {
        input: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Unknown Lua filter: {0}")]
    UnknownLuaFilter(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for markdown format operations
pub type Result<T> = std::result::Result<T, MdDocumentError>;

/// Non-fatal problems found while building the output format
///
/// Each warning means an option was downgraded to a safe default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FormatWarning {
    #[error(
        "number_sections requires Pandoc {required} or later (found {}); section numbering disabled",
        version_label(.found)
    )]
    NumberSectionsUnsupported {
        required: PandocVersion,
        found: Option<PandocVersion>,
    },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn version_label(version: &Option<PandocVersion>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_message() {
        let warning = FormatWarning::NumberSectionsUnsupported {
            required: PandocVersion::new(&[2, 1]),
            found: Some(PandocVersion::new(&[2, 0, 6])),
        };
        assert_eq!(
            warning.to_string(),
            "number_sections requires Pandoc 2.1 or later (found 2.0.6); section numbering disabled"
        );
    }

    #[test]
    fn test_warning_without_pandoc() {
        let warning = FormatWarning::NumberSectionsUnsupported {
            required: PandocVersion::new(&[2, 1]),
            found: None,
        };
        assert!(warning.to_string().contains("(found none)"));
    }

    #[test]
    fn test_pandoc_failed_message() {
        let err = MdDocumentError::PandocFailed {
            input: PathBuf::from("doc.md"),
            status: Some(64),
            stderr: "Unknown option".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pandoc failed converting doc.md (exit status 64): Unknown option"
        );
    }
}
