//! Markdown variant strings
//!
//! A variant names a Pandoc markdown flavor followed by extension toggles:
//! `gfm+footnotes-raw_html` is the base `gfm` with `+footnotes` and
//! `-raw_html`. The base is everything before the first `+` or `-`.

use std::fmt;

use crate::version::PandocVersion;

/// First Pandoc release that knows the `yaml_metadata_block` extension for
/// the commonmark family of readers/writers.
pub const COMMONMARK_YAML_MIN_VERSION: [u32; 2] = [2, 13];

const YAML_METADATA_BLOCK: &str = "yaml_metadata_block";

/// A variant split into its base name and extension suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Base format name (e.g. `markdown_strict`)
    pub base: String,
    /// Extension suffix including its leading `+`/`-` (may be empty)
    pub extensions: String,
}

impl Variant {
    /// Split a variant at the first `+` or `-`
    pub fn parse(variant: &str) -> Self {
        let split_at = variant.find(['+', '-']).unwrap_or(variant.len());
        let (base, extensions) = variant.split_at(split_at);
        Self {
            base: base.to_string(),
            extensions: extensions.to_string(),
        }
    }

    /// Whether the suffix mentions `name`, either enabled or disabled
    pub fn mentions(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    /// Append `-name` unless that exact flag already occurs in the suffix
    ///
    /// The check is a plain substring search: a flag whose text contains
    /// `-name` counts as present.
    pub fn disable(&mut self, name: &str) {
        let flag = format!("-{}", name);
        if !self.extensions.contains(&flag) {
            self.extensions.push_str(&flag);
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.extensions)
    }
}

/// Adapt a variant so Pandoc does not write a metadata block itself
///
/// Front matter is restored from the source document by the YAML
/// post-processor, so the writer's own metadata and title blocks are turned
/// off. A variant that already mentions `yaml_metadata_block` is returned as
/// is; unknown bases pass through unchanged.
///
/// `pandoc_version` is the installed Pandoc version, `None` when Pandoc is
/// not available.
///
/// # Example
///
/// ```
/// use pandoc_opts::{PandocVersion, adapt_variant};
///
/// let v3 = PandocVersion::new(&[3, 1]);
/// assert_eq!(adapt_variant("gfm", Some(&v3)), "gfm-yaml_metadata_block");
/// assert_eq!(
///     adapt_variant("markdown+footnotes", Some(&v3)),
///     "markdown+footnotes-yaml_metadata_block-pandoc_title_block"
/// );
/// ```
pub fn adapt_variant(variant: &str, pandoc_version: Option<&PandocVersion>) -> String {
    let mut parsed = Variant::parse(variant);

    if parsed.mentions(YAML_METADATA_BLOCK) {
        return variant.to_string();
    }

    match parsed.base.as_str() {
        "gfm" | "commonmark" | "commonmark_x" => {
            let min = PandocVersion::new(&COMMONMARK_YAML_MIN_VERSION);
            if pandoc_version.is_some_and(|v| *v >= min) {
                parsed.disable(YAML_METADATA_BLOCK);
            }
        }
        "markdown" => {
            parsed.disable(YAML_METADATA_BLOCK);
            parsed.disable("pandoc_title_block");
        }
        "markdown_mmd" => {
            parsed.disable(YAML_METADATA_BLOCK);
            parsed.disable("mmd_title_block");
        }
        "markdown_github" | "markdown_phpextra" | "markdown_strict" => {
            parsed.disable(YAML_METADATA_BLOCK);
        }
        _ => {}
    }

    parsed.to_string()
}
