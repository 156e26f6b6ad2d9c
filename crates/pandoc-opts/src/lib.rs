//! pandoc-opts: Pandoc command-line option helpers
//!
//! This crate provides:
//! - Pandoc version parsing and comparison
//! - Markdown variant parsing and adaptation
//! - Table of contents and include-file arguments
//! - The R Markdown input format string
//! - Leading YAML front matter partitioning
//!
//! # Example
//!
//! ```
//! use pandoc_opts::{PandocVersion, adapt_variant, toc_args};
//!
//! let version: PandocVersion = "3.1.11".parse().unwrap();
//! assert_eq!(
//!     adapt_variant("markdown_strict", Some(&version)),
//!     "markdown_strict-yaml_metadata_block"
//! );
//! assert_eq!(toc_args(true, 2), vec!["--table-of-contents", "--toc-depth", "2"]);
//! ```

pub mod args;
pub mod front_matter;
pub mod variant;
pub mod version;

// Re-export main types for convenient access
pub use args::{Includes, from_rmarkdown, includes_to_args, path_arg, toc_args};
pub use front_matter::{FrontMatterPartition, partition};
pub use variant::{Variant, adapt_variant};
pub use version::{PandocVersion, VersionParseError};
