//! Configuration file support for mddoc CLI
//!
//! Loads settings from `_mddoc.toml` configuration file.

use anyhow::{Context, Result};
use md_document::MdDocumentOptions;
use pandoc_opts::Includes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name (following Quarto's `_quarto.yml` convention)
pub const CONFIG_FILE_NAME: &str = "_mddoc.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/eitsupi/md-document/main/crates/md-document-cli/schema/mddoc.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Markdown format options
    #[serde(skip_serializing_if = "FormatConfig::is_empty")]
    pub format: FormatConfig,
    /// Pandoc installation
    #[serde(skip_serializing_if = "PandocConfig::is_empty")]
    pub pandoc: PandocConfig,
    /// Lua filter resources
    #[serde(skip_serializing_if = "LuaConfig::is_empty")]
    pub lua: LuaConfig,
}

/// Markdown format options
///
/// Unset fields keep the value from lower-priority sources.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct FormatConfig {
    /// Markdown variant, e.g. "gfm" or "markdown+footnotes" (default: "markdown_strict")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Keep the source YAML front matter in the output (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_yaml: Option<bool>,
    /// Include a table of contents (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc: Option<bool>,
    /// Deepest header level in the table of contents (default: 3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc_depth: Option<u32>,
    /// Number section headers (requires Pandoc 2.1) (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_sections: Option<bool>,
    /// Produce a standalone document (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standalone: Option<bool>,
    /// Figure width in inches (default: 7)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fig_width: Option<f64>,
    /// Figure height in inches (default: 5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fig_height: Option<f64>,
    /// Retina scaling for figures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fig_retina: Option<f64>,
    /// Graphics device (default: "png")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    /// Data frame printing method (default: "default")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub df_print: Option<String>,
    /// Files to include in the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<IncludesConfig>,
    /// Input format extensions, e.g. ["+gfm_auto_identifiers"]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md_extensions: Option<Vec<String>>,
    /// Extra Pandoc arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pandoc_args: Option<Vec<String>>,
    /// Output file extension (default: ".md")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl FormatConfig {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `options` that are set here
    pub fn apply(&self, options: &mut MdDocumentOptions) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut options.variant, &self.variant);
        set(&mut options.preserve_yaml, &self.preserve_yaml);
        set(&mut options.toc, &self.toc);
        set(&mut options.toc_depth, &self.toc_depth);
        set(&mut options.number_sections, &self.number_sections);
        set(&mut options.standalone, &self.standalone);
        set(&mut options.fig_width, &self.fig_width);
        set(&mut options.fig_height, &self.fig_height);
        set(&mut options.dev, &self.dev);
        set(&mut options.df_print, &self.df_print);
        set(&mut options.ext, &self.ext);

        if self.fig_retina.is_some() {
            options.fig_retina = self.fig_retina;
        }
        if let Some(includes) = &self.includes {
            options.includes = Some(includes.to_includes());
        }
        if self.md_extensions.is_some() {
            options.md_extensions = self.md_extensions.clone();
        }
        if self.pandoc_args.is_some() {
            options.pandoc_args = self.pandoc_args.clone();
        }
    }
}

/// Files to include in the output
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct IncludesConfig {
    /// Included at the end of the header
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub in_header: Vec<PathBuf>,
    /// Included at the start of the body
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before_body: Vec<PathBuf>,
    /// Included at the end of the body
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after_body: Vec<PathBuf>,
}

impl IncludesConfig {
    pub fn to_includes(&self) -> Includes {
        Includes {
            in_header: self.in_header.clone(),
            before_body: self.before_body.clone(),
            after_body: self.after_body.clone(),
        }
    }
}

/// Pandoc installation
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PandocConfig {
    /// Path to the pandoc binary (default: RSTUDIO_PANDOC, then PATH)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Assume this Pandoc version instead of asking the binary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PandocConfig {
    fn is_empty(&self) -> bool {
        self.path.is_none() && self.version.is_none()
    }
}

/// Lua filter resources
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct LuaConfig {
    /// Directory bundled Lua filters are written to (default: a private temporary directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl LuaConfig {
    fn is_empty(&self) -> bool {
        self.dir.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_mddoc.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            format: FormatConfig {
                variant: Some("gfm".to_string()),
                preserve_yaml: Some(true),
                toc: Some(false),
                toc_depth: Some(3),
                number_sections: Some(false),
                standalone: Some(false),
                fig_width: Some(7.0),
                fig_height: Some(5.0),
                dev: Some("png".to_string()),
                ext: Some(".md".to_string()),
                ..Default::default()
            },
            pandoc: PandocConfig::default(), // auto-detect
            lua: LuaConfig::default(),       // use system default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.format.variant.is_none());
        assert!(config.pandoc.path.is_none());
    }

    #[test]
    fn test_parse_format_section() {
        let config: Config = toml::from_str(
            r#"
            [format]
            variant = "gfm"
            preserve_yaml = true
            toc = true
            toc_depth = 2
            md_extensions = ["+gfm_auto_identifiers"]
            pandoc_args = ["--wrap=none"]

            [format.includes]
            in_header = ["header.md"]
            "#,
        )
        .unwrap();

        assert_eq!(config.format.variant, Some("gfm".to_string()));
        assert_eq!(config.format.preserve_yaml, Some(true));
        assert_eq!(config.format.toc_depth, Some(2));
        assert_eq!(
            config.format.md_extensions,
            Some(vec!["+gfm_auto_identifiers".to_string()])
        );
        assert_eq!(
            config.format.includes.unwrap().in_header,
            vec![PathBuf::from("header.md")]
        );
    }

    #[test]
    fn test_parse_pandoc_and_lua_sections() {
        let config: Config = toml::from_str(
            r#"
            [pandoc]
            path = "/opt/pandoc/bin/pandoc"
            version = "3.1.11"

            [lua]
            dir = "/tmp/mddoc-lua"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.pandoc.path,
            Some(PathBuf::from("/opt/pandoc/bin/pandoc"))
        );
        assert_eq!(config.pandoc.version, Some("3.1.11".to_string()));
        assert_eq!(config.lua.dir, Some(PathBuf::from("/tmp/mddoc-lua")));
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let format = FormatConfig {
            variant: Some("gfm".to_string()),
            fig_retina: Some(2.0),
            pandoc_args: Some(vec!["--wrap=none".to_string()]),
            ..Default::default()
        };
        let mut options = MdDocumentOptions {
            toc: true,
            ..Default::default()
        };
        format.apply(&mut options);

        assert_eq!(options.variant, "gfm");
        assert!(options.toc);
        assert_eq!(options.toc_depth, 3);
        assert_eq!(options.fig_retina, Some(2.0));
        assert_eq!(options.pandoc_args, Some(vec!["--wrap=none".to_string()]));
        assert_eq!(options.ext, ".md");
    }

    #[test]
    fn test_serialize_empty_config() {
        let config = Config::default();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        assert!(!toml.contains("[format]"));
    }

    #[test]
    fn test_serialize_sample_config() {
        let config = Config::sample();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        assert!(toml.contains("[format]"));
        assert!(toml.contains("variant = \"gfm\""));
        assert!(!toml.contains("[pandoc]"));
    }

    #[test]
    fn test_json_schema_generation() {
        let schema = Config::json_schema_string().unwrap();
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("FormatConfig"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::sample();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.format, parsed.format);
    }
}
