//! Output format descriptor consumed by the rendering driver

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FormatWarning, Result};
use crate::knitr::KnitrOptions;
use crate::processors::{PostProcessor, PreProcessor};

/// Pandoc settings of an output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PandocOptions {
    /// Output format (`--to`)
    pub to: String,
    /// Input format (`--from`)
    pub from: String,
    /// Additional command-line arguments, in order
    pub args: Vec<String>,
    /// Lua filters applied during the main conversion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lua_filters: Vec<PathBuf>,
    /// Extension of the output file, including the dot
    pub ext: String,
}

/// A complete output format
#[derive(Debug, Clone, Serialize)]
pub struct OutputFormat {
    pub knitr: KnitrOptions,
    pub pandoc: PandocOptions,
    /// Whether supporting files (figures) are removed after rendering
    pub clean_supporting: bool,
    /// Data frame printing method, passed to knitr
    pub df_print: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_processor: Option<PreProcessor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_processor: Option<PostProcessor>,
    /// Options downgraded while building the format
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FormatWarning>,
}

impl OutputFormat {
    /// Serialize the format to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Full `pandoc` argument list for the main conversion, excluding the
    /// input and output files
    pub fn pandoc_command_args(&self) -> Vec<String> {
        let mut args = vec![
            "--from".to_string(),
            self.pandoc.from.clone(),
            "--to".to_string(),
            self.pandoc.to.clone(),
        ];
        for filter in &self.pandoc.lua_filters {
            args.push("--lua-filter".to_string());
            args.push(pandoc_opts::path_arg(filter));
        }
        args.extend(self.pandoc.args.iter().cloned());
        args
    }
}
