//! Access to the Pandoc conversion engine
//!
//! The format builder and the processors never look Pandoc up on their own;
//! they receive something implementing [`Pandoc`]. [`SystemPandoc`] talks to
//! an installed binary, [`FixedPandoc`] reports a fixed version and cannot
//! convert (useful when only the option assembly matters).
//!
//! # Finding Pandoc
//!
//! [`SystemPandoc::find`] searches in this order:
//! 1. `RSTUDIO_PANDOC` environment variable (directory containing pandoc, or
//!    the binary itself)
//! 2. System PATH via `which`

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use pandoc_opts::PandocVersion;

use crate::error::{MdDocumentError, Result};

/// A Pandoc installation
pub trait Pandoc {
    /// Installed version, or `None` if Pandoc is not available
    fn version(&self) -> Option<PandocVersion>;

    /// Whether Pandoc is installed with at least version `min`
    fn available(&self, min: &PandocVersion) -> bool {
        self.version().is_some_and(|v| v >= *min)
    }

    /// Convert `input` to format `to`, writing `output`
    ///
    /// `options` are passed to Pandoc verbatim after the standard arguments.
    /// `input` and `output` may be the same path.
    fn convert(&self, input: &Path, to: &str, output: &Path, options: &[String]) -> Result<()>;
}

/// Pandoc binary installed on the system
#[derive(Debug)]
pub struct SystemPandoc {
    path: PathBuf,
    version: OnceLock<Option<PandocVersion>>,
}

impl SystemPandoc {
    /// Use the Pandoc binary at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: OnceLock::new(),
        }
    }

    /// Locate Pandoc via `RSTUDIO_PANDOC` or the PATH
    pub fn find() -> Option<Self> {
        find_pandoc().map(Self::new)
    }

    /// Path of the Pandoc binary
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query_version(&self) -> Option<PandocVersion> {
        let output = Command::new(&self.path).arg("--version").output();
        match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let version = PandocVersion::from_version_output(&stdout);
                if version.is_none() {
                    tracing::warn!(
                        "Could not parse pandoc version from {}",
                        self.path.display()
                    );
                }
                version
            }
            Ok(output) => {
                tracing::warn!(
                    "{} --version exited with {}",
                    self.path.display(),
                    output.status
                );
                None
            }
            Err(e) => {
                tracing::warn!("Failed to run {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl Pandoc for SystemPandoc {
    fn version(&self) -> Option<PandocVersion> {
        self.version.get_or_init(|| self.query_version()).clone()
    }

    fn convert(&self, input: &Path, to: &str, output: &Path, options: &[String]) -> Result<()> {
        let mut cmd = Command::new(&self.path);
        cmd.arg(input)
            .arg("--to")
            .arg(to)
            .arg("--output")
            .arg(output)
            .args(options);

        tracing::debug!("Running {:?}", cmd);

        let result = cmd.output().map_err(|e| MdDocumentError::PandocSpawn {
            path: self.path.clone(),
            source: e,
        })?;

        if !result.status.success() {
            return Err(MdDocumentError::PandocFailed {
                input: input.to_path_buf(),
                status: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// A Pandoc stand-in with a fixed version
///
/// [`Pandoc::convert`] always fails with [`MdDocumentError::PandocNotFound`].
#[derive(Debug, Clone, Default)]
pub struct FixedPandoc {
    version: Option<PandocVersion>,
}

impl FixedPandoc {
    /// Pretend Pandoc `version` is installed (`None` for not installed)
    pub fn new(version: Option<PandocVersion>) -> Self {
        Self { version }
    }
}

impl Pandoc for FixedPandoc {
    fn version(&self) -> Option<PandocVersion> {
        self.version.clone()
    }

    fn convert(
        &self,
        _input: &Path,
        _to: &str,
        _output: &Path,
        _options: &[String],
    ) -> Result<()> {
        Err(MdDocumentError::PandocNotFound)
    }
}

/// Find the Pandoc binary on the system.
///
/// `RSTUDIO_PANDOC` may point to the directory containing Pandoc or directly
/// to the binary. Falls back to a PATH lookup.
pub fn find_pandoc() -> Option<PathBuf> {
    if let Some(rstudio_pandoc) = std::env::var_os("RSTUDIO_PANDOC") {
        let path = PathBuf::from(rstudio_pandoc);

        if path.is_file() {
            return Some(path);
        }

        if path.is_dir() {
            let candidate = path.join(pandoc_name());
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    which::which("pandoc").ok()
}

/// Platform-appropriate Pandoc binary name
fn pandoc_name() -> &'static str {
    #[cfg(windows)]
    {
        "pandoc.exe"
    }
    #[cfg(not(windows))]
    {
        "pandoc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_pandoc_available() {
        let pandoc = FixedPandoc::new(Some(PandocVersion::new(&[2, 13])));
        assert!(pandoc.available(&PandocVersion::new(&[2, 1])));
        assert!(pandoc.available(&PandocVersion::new(&[2, 13, 0])));
        assert!(!pandoc.available(&PandocVersion::new(&[2, 14])));
    }

    #[test]
    fn test_fixed_pandoc_missing() {
        let pandoc = FixedPandoc::default();
        assert_eq!(pandoc.version(), None);
        assert!(!pandoc.available(&PandocVersion::new(&[1])));
    }

    #[test]
    fn test_fixed_pandoc_cannot_convert() {
        let pandoc = FixedPandoc::default();
        let path = Path::new("doc.md");
        let err = pandoc.convert(path, "markdown", path, &[]).unwrap_err();
        assert!(matches!(err, MdDocumentError::PandocNotFound));
    }

    #[test]
    fn test_system_pandoc_with_missing_binary() {
        let pandoc = SystemPandoc::new("/nonexistent/pandoc-binary");
        assert_eq!(pandoc.version(), None);

        let path = Path::new("doc.md");
        let err = pandoc.convert(path, "markdown", path, &[]).unwrap_err();
        assert!(matches!(err, MdDocumentError::PandocSpawn { .. }));
    }
}
