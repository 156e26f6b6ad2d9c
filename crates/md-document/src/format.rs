//! The markdown document output format
//!
//! [`md_document`] turns [`MdDocumentOptions`] into an [`OutputFormat`]:
//! Pandoc arguments, the adapted output variant, knitr figure options and
//! the optional section-numbering and YAML-preserving hooks.

use pandoc_opts::{
    Includes, PandocVersion, adapt_variant, from_rmarkdown, includes_to_args, toc_args,
};
use serde::{Deserialize, Serialize};

use crate::engine::Pandoc;
use crate::error::{FormatWarning, Result};
use crate::knitr::knitr_options_html;
use crate::lua::{LuaFilters, NUMBER_SECTIONS};
use crate::output_format::{OutputFormat, PandocOptions};
use crate::processors::{PostProcessor, PreProcessor};

/// Oldest Pandoc that can run the number-sections Lua filter
pub const NUMBER_SECTIONS_MIN_VERSION: [u32; 2] = [2, 1];

/// Variant prefixes whose writers honor `gfm_auto_identifiers`
const AUTO_IDENTIFIER_VARIANTS: [&str; 3] = ["commonmark", "gfm", "markdown"];

/// Options for the markdown document format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdDocumentOptions {
    /// Markdown variant to produce, with optional extension toggles
    pub variant: String,
    /// Keep the source document's YAML front matter in the output
    pub preserve_yaml: bool,
    /// Include a table of contents (implies `standalone`)
    pub toc: bool,
    /// Deepest header level listed in the table of contents
    pub toc_depth: u32,
    /// Number section headers
    pub number_sections: bool,
    /// Produce a standalone document
    pub standalone: bool,
    /// Default figure width in inches
    pub fig_width: f64,
    /// Default figure height in inches
    pub fig_height: f64,
    /// Retina scaling for figures
    pub fig_retina: Option<f64>,
    /// Graphics device for figures
    pub dev: String,
    /// Data frame printing method
    pub df_print: String,
    /// Additional files to include
    pub includes: Option<Includes>,
    /// Extensions appended to the input format (e.g. `+gfm_auto_identifiers`)
    pub md_extensions: Option<Vec<String>>,
    /// Extra Pandoc arguments, appended verbatim
    pub pandoc_args: Option<Vec<String>>,
    /// Output file extension
    pub ext: String,
}

impl Default for MdDocumentOptions {
    fn default() -> Self {
        Self {
            variant: "markdown_strict".to_string(),
            preserve_yaml: false,
            toc: false,
            toc_depth: 3,
            number_sections: false,
            standalone: false,
            fig_width: 7.0,
            fig_height: 5.0,
            fig_retina: None,
            dev: "png".to_string(),
            df_print: "default".to_string(),
            includes: None,
            md_extensions: None,
            pandoc_args: None,
            ext: ".md".to_string(),
        }
    }
}

/// Build the markdown document output format
///
/// `pandoc` supplies the installed version; `filters` locates the bundled
/// Lua filters. Requesting `number_sections` on a Pandoc older than 2.1 is
/// not an error: numbering is turned off and a [`FormatWarning`] is logged
/// and recorded in the result. Fails only if a Lua filter cannot be written.
///
/// # Example
///
/// ```
/// use md_document::{FixedPandoc, LuaFilters, MdDocumentOptions, md_document};
/// use pandoc_opts::PandocVersion;
///
/// let pandoc = FixedPandoc::new(Some(PandocVersion::new(&[3, 1])));
/// let options = MdDocumentOptions {
///     variant: "gfm".to_string(),
///     toc: true,
///     ..Default::default()
/// };
/// let format = md_document(&options, &pandoc, &LuaFilters::temporary().unwrap()).unwrap();
/// assert_eq!(format.pandoc.to, "gfm-yaml_metadata_block");
/// assert_eq!(
///     format.pandoc.args,
///     ["--standalone", "--table-of-contents", "--toc-depth", "3"]
/// );
/// ```
pub fn md_document<P: Pandoc + ?Sized>(
    options: &MdDocumentOptions,
    pandoc: &P,
    filters: &LuaFilters,
) -> Result<OutputFormat> {
    let installed = pandoc.version();
    let mut warnings = Vec::new();

    // A table of contents needs a standalone document
    let standalone = options.standalone || options.toc;

    let mut args = Vec::new();
    if standalone {
        args.push("--standalone".to_string());
    }
    args.extend(toc_args(options.toc, options.toc_depth));
    args.extend(includes_to_args(options.includes.as_ref()));
    if let Some(pandoc_args) = &options.pandoc_args {
        args.extend(pandoc_args.iter().cloned());
    }

    let mut number_sections = options.number_sections;
    let required = PandocVersion::new(&NUMBER_SECTIONS_MIN_VERSION);
    if number_sections && !pandoc.available(&required) {
        let warning = FormatWarning::NumberSectionsUnsupported {
            required,
            found: installed.clone(),
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
        number_sections = false;
    }

    let md_extensions = options.md_extensions.as_deref().unwrap_or_default();

    let number_sections_filter = if number_sections {
        Some(filters.path(NUMBER_SECTIONS)?)
    } else {
        None
    };

    let pre_processor = match &number_sections_filter {
        Some(lua_filter) if needs_identifier_preprocessing(&options.variant, md_extensions) => {
            Some(PreProcessor::NumberSections {
                lua_filter: lua_filter.clone(),
            })
        }
        _ => None,
    };

    let to = adapt_variant(&options.variant, installed.as_ref());

    let post_processor = options.preserve_yaml.then_some(PostProcessor::PreserveYaml);

    tracing::debug!("Markdown document format: to={}, args={:?}", to, args);

    Ok(OutputFormat {
        knitr: knitr_options_html(
            options.fig_width,
            options.fig_height,
            options.fig_retina,
            &options.dev,
        ),
        pandoc: PandocOptions {
            to,
            from: from_rmarkdown(true, md_extensions),
            args,
            lua_filters: number_sections_filter.into_iter().collect(),
            ext: options.ext.clone(),
        },
        clean_supporting: false,
        df_print: options.df_print.clone(),
        pre_processor,
        post_processor,
        warnings,
    })
}

/// Whether header identifiers must be fixed before numbering
///
/// With `+gfm_auto_identifiers` the identifiers are derived from header text,
/// so numbering the headers during the main conversion would change them.
fn needs_identifier_preprocessing(variant: &str, md_extensions: &[String]) -> bool {
    AUTO_IDENTIFIER_VARIANTS
        .iter()
        .any(|prefix| variant.starts_with(prefix))
        && md_extensions
            .iter()
            .any(|ext| ext.contains("+gfm_auto_identifiers"))
}
