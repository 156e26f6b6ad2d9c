//! md-document: Markdown document output format for Pandoc-based rendering
//!
//! This crate provides:
//! - The format builder ([`md_document`]) producing an [`OutputFormat`]
//! - The YAML-preserving post-processor and section-numbering pre-processor
//! - Access to an installed Pandoc through the [`Pandoc`] trait
//! - Bundled Lua filters
//!
//! ## Example
//!
//! ```rust
//! use md_document::{FixedPandoc, LuaFilters, MdDocumentOptions, PostProcessor, md_document};
//! use pandoc_opts::PandocVersion;
//!
//! let pandoc = FixedPandoc::new(Some(PandocVersion::new(&[3, 1])));
//! let options = MdDocumentOptions {
//!     preserve_yaml: true,
//!     ..Default::default()
//! };
//!
//! let format = md_document(&options, &pandoc, &LuaFilters::temporary().unwrap()).unwrap();
//! assert_eq!(format.pandoc.to, "markdown_strict-yaml_metadata_block");
//! assert_eq!(format.post_processor, Some(PostProcessor::PreserveYaml));
//! ```

pub mod engine;
pub mod error;
pub mod format;
pub mod knitr;
pub mod lines;
pub mod lua;
pub mod output_format;
pub mod processors;

pub use engine::{FixedPandoc, Pandoc, SystemPandoc, find_pandoc};
pub use error::{FormatWarning, MdDocumentError, Result};
pub use format::{MdDocumentOptions, md_document};
pub use knitr::{ChunkOptions, KnitrOptions, knitr_options_html};
pub use lines::{read_lines, write_lines};
pub use lua::LuaFilters;
pub use output_format::{OutputFormat, PandocOptions};
pub use processors::{PostProcessor, PreProcessor, preserve_yaml};
