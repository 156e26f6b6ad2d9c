//! knitr options passed through to the rendering driver
//!
//! Field names follow knitr's chunk option names (`fig.width`, ...) so the
//! serialized form can be handed to knitr unchanged.

use serde::{Deserialize, Serialize};

/// Default figure resolution for HTML-like output
pub const DEFAULT_DPI: u32 = 96;

/// knitr configuration for a format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnitrOptions {
    /// Default chunk options
    pub opts_chunk: ChunkOptions,
}

/// Default chunk options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Graphics device (e.g. `png`, `svg`)
    pub dev: String,
    pub dpi: u32,
    #[serde(rename = "fig.width")]
    pub fig_width: f64,
    #[serde(rename = "fig.height")]
    pub fig_height: f64,
    /// Retina scaling; `None` leaves knitr's default
    #[serde(rename = "fig.retina")]
    pub fig_retina: Option<f64>,
}

/// knitr options for HTML-like output formats
pub fn knitr_options_html(
    fig_width: f64,
    fig_height: f64,
    fig_retina: Option<f64>,
    dev: &str,
) -> KnitrOptions {
    KnitrOptions {
        opts_chunk: ChunkOptions {
            dev: dev.to_string(),
            dpi: DEFAULT_DPI,
            fig_width,
            fig_height,
            fig_retina,
        },
    }
}
