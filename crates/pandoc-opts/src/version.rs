//! Pandoc version numbers
//!
//! Pandoc uses dotted versions with a variable number of components
//! (`2.1`, `2.19.2`, `3.1.11.1`). Missing trailing components compare as zero,
//! so `2.1` and `2.1.0` are the same version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error returned when a version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("empty version string")]
    Empty,

    #[error("invalid version component {component:?} in {input:?}")]
    InvalidComponent { input: String, component: String },
}

/// A dotted Pandoc version such as `3.1.11.1`
#[derive(Debug, Clone, Eq)]
pub struct PandocVersion {
    components: Vec<u32>,
}

impl PandocVersion {
    /// Create a version from its numeric components
    pub fn new(components: &[u32]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }

    /// Numeric components in order (major first)
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Extract the version from the output of `pandoc --version`
    ///
    /// The first line looks like `pandoc 3.1.11.1` (or `pandoc.exe 2.19.2` on
    /// Windows). Development builds carry a suffix such as `3.1.12-nightly-2024-03-01`;
    /// everything from the first `-` is ignored. Returns `None` if no version
    /// can be found.
    pub fn from_version_output(output: &str) -> Option<Self> {
        let first_line = output.lines().next()?;
        let word = first_line.split_whitespace().nth(1)?;
        word.split('-').next()?.parse().ok()
    }

    fn component(&self, index: usize) -> u32 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for PandocVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let components = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| VersionParseError::InvalidComponent {
                        input: s.to_string(),
                        component: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

impl fmt::Display for PandocVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Ord for PandocVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PandocVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PandocVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PandocVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PandocVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
