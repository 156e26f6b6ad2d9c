//! Format options from a document's YAML front matter
//!
//! Reads the `md_document` entry of the `output` field:
//!
//! ```yaml
//! ---
//! title: Report
//! output:
//!   md_document:
//!     variant: gfm
//!     preserve_yaml: true
//! ---
//! ```
//!
//! `output: md_document` (a plain string) selects the format with default
//! options. The `rmarkdown::md_document` spelling is accepted too.

use anyhow::{Context, Result, bail};
use saphyr::{LoadableYamlNode, Yaml};
use std::path::{Path, PathBuf};

use crate::config::{FormatConfig, IncludesConfig};

const FORMAT_NAMES: [&str; 2] = ["md_document", "rmarkdown::md_document"];

/// Read format options from the front matter of `path`
///
/// Returns `Ok(None)` if the document has no front matter or its `output`
/// does not mention the markdown document format.
pub fn load_format_config(path: &Path) -> Result<Option<FormatConfig>> {
    let lines = md_document::read_lines(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    format_config_from_lines(&lines)
        .with_context(|| format!("Invalid front matter in {}", path.display()))
}

/// Extract format options from document lines
pub fn format_config_from_lines(lines: &[String]) -> Result<Option<FormatConfig>> {
    let Some(front_matter) = pandoc_opts::partition(lines).front_matter else {
        return Ok(None);
    };

    // Drop the delimiters
    let yaml = front_matter[1..front_matter.len() - 1].join("\n");
    let docs = Yaml::load_from_str(&yaml).context("Failed to parse YAML front matter")?;
    let Some(doc) = docs.first() else {
        return Ok(None);
    };
    let Some(output) = doc.as_mapping_get("output") else {
        return Ok(None);
    };

    if let Some(name) = output.as_str() {
        return Ok(FORMAT_NAMES
            .contains(&name)
            .then(FormatConfig::default));
    }

    for name in FORMAT_NAMES {
        if let Some(node) = output.as_mapping_get(name) {
            return parse_format_options(node).map(Some);
        }
    }

    Ok(None)
}

fn parse_format_options(node: &Yaml) -> Result<FormatConfig> {
    // `md_document: default` or an empty entry
    if node.as_mapping().is_none() {
        return Ok(FormatConfig::default());
    }

    let get = |key: &str| node.as_mapping_get(key);

    Ok(FormatConfig {
        variant: get("variant").map(|v| string(v, "variant")).transpose()?,
        preserve_yaml: get("preserve_yaml")
            .map(|v| boolean(v, "preserve_yaml"))
            .transpose()?,
        toc: get("toc").map(|v| boolean(v, "toc")).transpose()?,
        toc_depth: get("toc_depth")
            .map(|v| unsigned(v, "toc_depth"))
            .transpose()?,
        number_sections: get("number_sections")
            .map(|v| boolean(v, "number_sections"))
            .transpose()?,
        standalone: get("standalone")
            .map(|v| boolean(v, "standalone"))
            .transpose()?,
        fig_width: get("fig_width").map(|v| number(v, "fig_width")).transpose()?,
        fig_height: get("fig_height")
            .map(|v| number(v, "fig_height"))
            .transpose()?,
        fig_retina: get("fig_retina")
            .map(|v| number(v, "fig_retina"))
            .transpose()?,
        dev: get("dev").map(|v| string(v, "dev")).transpose()?,
        df_print: get("df_print").map(|v| string(v, "df_print")).transpose()?,
        includes: get("includes").map(parse_includes).transpose()?,
        md_extensions: get("md_extensions")
            .map(|v| strings(v, "md_extensions"))
            .transpose()?,
        pandoc_args: get("pandoc_args")
            .map(|v| strings(v, "pandoc_args"))
            .transpose()?,
        ext: get("ext").map(|v| string(v, "ext")).transpose()?,
    })
}

fn parse_includes(node: &Yaml) -> Result<IncludesConfig> {
    let paths = |key: &str| -> Result<Vec<PathBuf>> {
        match node.as_mapping_get(key) {
            Some(v) => Ok(strings(v, key)?.into_iter().map(PathBuf::from).collect()),
            None => Ok(Vec::new()),
        }
    };

    Ok(IncludesConfig {
        in_header: paths("in_header")?,
        before_body: paths("before_body")?,
        after_body: paths("after_body")?,
    })
}

fn string(node: &Yaml, key: &str) -> Result<String> {
    match node.as_str() {
        Some(s) => Ok(s.to_string()),
        None => bail!("`{}` must be a string", key),
    }
}

fn boolean(node: &Yaml, key: &str) -> Result<bool> {
    match node.as_bool() {
        Some(b) => Ok(b),
        None => bail!("`{}` must be true or false", key),
    }
}

fn unsigned(node: &Yaml, key: &str) -> Result<u32> {
    match node.as_integer().and_then(|i| u32::try_from(i).ok()) {
        Some(n) => Ok(n),
        None => bail!("`{}` must be a non-negative integer", key),
    }
}

fn number(node: &Yaml, key: &str) -> Result<f64> {
    match node
        .as_floating_point()
        .or_else(|| node.as_integer().map(|i| i as f64))
    {
        Some(n) => Ok(n),
        None => bail!("`{}` must be a number", key),
    }
}

/// A single string or a sequence of strings
fn strings(node: &Yaml, key: &str) -> Result<Vec<String>> {
    if let Some(s) = node.as_str() {
        return Ok(vec![s.to_string()]);
    }
    let Some(items) = node.as_sequence() else {
        bail!("`{}` must be a string or a list of strings", key);
    };
    items.iter().map(|item| string(item, key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(String::from).collect()
    }

    #[test]
    fn test_no_front_matter() {
        assert_eq!(format_config_from_lines(&lines("# Title\n")).unwrap(), None);
    }

    #[test]
    fn test_other_output_format() {
        let doc = lines("---\ntitle: x\noutput: html_document\n---\n");
        assert_eq!(format_config_from_lines(&doc).unwrap(), None);
    }

    #[test]
    fn test_output_as_string() {
        let doc = lines("---\ntitle: x\noutput: md_document\n---\nbody\n");
        assert_eq!(
            format_config_from_lines(&doc).unwrap(),
            Some(FormatConfig::default())
        );
    }

    #[test]
    fn test_format_options() {
        let doc = lines(
            r#"---
title: "Report"
output:
  html_document: default
  rmarkdown::md_document:
    variant: gfm
    preserve_yaml: true
    toc: true
    toc_depth: 2
    fig_width: 6
    fig_retina: 1.5
    md_extensions: "+gfm_auto_identifiers"
    pandoc_args: ["--wrap=none", "--columns=80"]
    includes:
      after_body: footer.md
---

# Intro
"#,
        );
        let config = format_config_from_lines(&doc).unwrap().unwrap();

        assert_eq!(config.variant, Some("gfm".to_string()));
        assert_eq!(config.preserve_yaml, Some(true));
        assert_eq!(config.toc, Some(true));
        assert_eq!(config.toc_depth, Some(2));
        assert_eq!(config.fig_width, Some(6.0));
        assert_eq!(config.fig_retina, Some(1.5));
        assert_eq!(
            config.md_extensions,
            Some(vec!["+gfm_auto_identifiers".to_string()])
        );
        assert_eq!(
            config.pandoc_args,
            Some(vec!["--wrap=none".to_string(), "--columns=80".to_string()])
        );
        assert_eq!(
            config.includes.unwrap().after_body,
            vec![PathBuf::from("footer.md")]
        );
        assert_eq!(config.number_sections, None);
    }

    #[test]
    fn test_invalid_option_type() {
        let doc = lines("---\noutput:\n  md_document:\n    toc: maybe\n---\n");
        let err = format_config_from_lines(&doc).unwrap_err();
        assert!(err.to_string().contains("`toc` must be true or false"));
    }
}
