//! Lua filters bundled with the crate
//!
//! Filters are embedded at compile time and written to a resource directory
//! the first time their path is requested, so Pandoc can load them from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::{MdDocumentError, Result};

/// Filter that numbers section headers
pub const NUMBER_SECTIONS: &str = "number-sections.lua";

const BUNDLED_FILTERS: &[(&str, &str)] = &[(
    NUMBER_SECTIONS,
    include_str!("../resources/lua/number-sections.lua"),
)];

const TEMP_PREFIX: &str = "md-document-lua-";

/// Locator for bundled Lua filters
///
/// Filters are executed by Pandoc, so the directory must not be writable by
/// other users. [`LuaFilters::temporary`] and [`LuaFilters::persistent`]
/// create a fresh private directory; [`LuaFilters::new`] trusts the caller.
#[derive(Debug, Clone)]
pub struct LuaFilters {
    dir: PathBuf,
    // Removed when the last clone is dropped
    _temp: Option<Arc<TempDir>>,
}

impl LuaFilters {
    /// Write filters into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _temp: None,
        }
    }

    /// Write filters into a private temporary directory that is deleted
    /// together with the last clone of the returned locator
    pub fn temporary() -> Result<Self> {
        let temp = create_private_dir()?;
        Ok(Self {
            dir: temp.path().to_path_buf(),
            _temp: Some(Arc::new(temp)),
        })
    }

    /// Write filters into a private temporary directory that is left on disk
    ///
    /// For callers that hand the filter path to another process.
    pub fn persistent() -> Result<Self> {
        Ok(Self::new(create_private_dir()?.keep()))
    }

    /// Directory the filters are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Source of a bundled filter
    pub fn source(name: &str) -> Option<&'static str> {
        BUNDLED_FILTERS
            .iter()
            .find(|(filter, _)| *filter == name)
            .map(|(_, source)| *source)
    }

    /// Path to the named filter, writing it to disk if needed
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        let source =
            Self::source(name).ok_or_else(|| MdDocumentError::UnknownLuaFilter(name.to_string()))?;
        let path = self.dir.join(name);

        let up_to_date = fs::read_to_string(&path).is_ok_and(|existing| existing == source);
        if !up_to_date {
            fs::create_dir_all(&self.dir).map_err(|e| MdDocumentError::Write {
                path: self.dir.clone(),
                source: e,
            })?;
            fs::write(&path, source).map_err(|e| MdDocumentError::Write {
                path: path.clone(),
                source: e,
            })?;
            tracing::debug!("Wrote Lua filter {}", path.display());
        }

        Ok(path)
    }
}

fn create_private_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .map_err(|e| MdDocumentError::Write {
            path: std::env::temp_dir(),
            source: e,
        })
}
