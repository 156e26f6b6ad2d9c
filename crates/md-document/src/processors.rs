//! Pre- and post-processing hooks
//!
//! The rendering driver runs the pre-processor on the knitted markdown before
//! the main Pandoc conversion and the post-processor on the converted output
//! afterwards. Both rewrite files in place; running them concurrently on the
//! same path is not supported.

use std::path::{Path, PathBuf};

use pandoc_opts::partition;
use serde::{Deserialize, Serialize};

use crate::engine::Pandoc;
use crate::error::Result;
use crate::lines::{read_lines, write_lines};

/// Metadata flag telling the number-sections filter to run in
/// pre-processing mode
pub const PREPROCESS_NUMBER_SECTIONS_META: &str = "preprocess_number_sections=true";

/// Re-attach the front matter of `input` to `output`
///
/// If `input` starts with front matter, the result is that block, one blank
/// line, then `output`. Otherwise `output` is returned unchanged.
///
/// # Example
///
/// ```
/// use md_document::preserve_yaml;
///
/// let input: Vec<String> = ["---", "title: x", "---", "body"].map(String::from).into();
/// let output = vec!["converted body".to_string()];
/// assert_eq!(
///     preserve_yaml(&input, &output),
///     ["---", "title: x", "---", "", "converted body"]
/// );
/// ```
pub fn preserve_yaml(input: &[String], output: &[String]) -> Vec<String> {
    match partition(input).front_matter {
        Some(front_matter) => {
            let mut lines = front_matter;
            lines.push(String::new());
            lines.extend_from_slice(output);
            lines
        }
        None => output.to_vec(),
    }
}

/// Hook run on the input file before conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PreProcessor {
    /// Rewrite the input through Pandoc with the number-sections filter in
    /// pre-processing mode, keeping its front matter
    NumberSections {
        /// Path to `number-sections.lua`
        lua_filter: PathBuf,
    },
}

impl PreProcessor {
    /// Run the hook on `input_file`
    ///
    /// The file is rewritten in place. Returns the extra Pandoc arguments
    /// the hook contributes, which is always empty here.
    pub fn run<P: Pandoc + ?Sized>(&self, pandoc: &P, input_file: &Path) -> Result<Vec<String>> {
        match self {
            PreProcessor::NumberSections { lua_filter } => {
                let input_lines = read_lines(input_file)?;

                let options = vec![
                    "--lua-filter".to_string(),
                    pandoc_opts::path_arg(lua_filter),
                    "--metadata".to_string(),
                    PREPROCESS_NUMBER_SECTIONS_META.to_string(),
                ];
                pandoc.convert(input_file, "markdown", input_file, &options)?;

                let output_lines = read_lines(input_file)?;
                write_lines(input_file, &preserve_yaml(&input_lines, &output_lines))?;

                tracing::debug!("Pre-processed section numbers in {}", input_file.display());
                Ok(Vec::new())
            }
        }
    }
}

/// Hook run on the output file after conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PostProcessor {
    /// Copy the input's front matter to the top of the output
    PreserveYaml,
}

impl PostProcessor {
    /// Run the hook, returning the path of the final output
    pub fn run(&self, input_file: &Path, output_file: &Path) -> Result<PathBuf> {
        match self {
            PostProcessor::PreserveYaml => {
                let input_lines = read_lines(input_file)?;
                let output_lines = read_lines(output_file)?;
                write_lines(output_file, &preserve_yaml(&input_lines, &output_lines))?;

                tracing::debug!("Preserved front matter in {}", output_file.display());
                Ok(output_file.to_path_buf())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdDocumentError;
    use pandoc_opts::PandocVersion;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    /// Pandoc double that drops front matter and records its calls
    #[derive(Default)]
    struct RecordingPandoc {
        calls: RefCell<Vec<(PathBuf, String, PathBuf, Vec<String>)>>,
    }

    impl Pandoc for RecordingPandoc {
        fn version(&self) -> Option<PandocVersion> {
            Some(PandocVersion::new(&[3, 1]))
        }

        fn convert(
            &self,
            input: &Path,
            to: &str,
            output: &Path,
            options: &[String],
        ) -> Result<()> {
            self.calls.borrow_mut().push((
                input.to_path_buf(),
                to.to_string(),
                output.to_path_buf(),
                options.to_vec(),
            ));
            let body = partition(&read_lines(input)?).body;
            let rewritten: Vec<String> = body
                .into_iter()
                .map(|line| line.replace("# Intro", "# Intro {#intro}"))
                .collect();
            write_lines(output, &rewritten)
        }
    }

    #[test]
    fn test_preserve_yaml_with_front_matter() {
        let input = lines(&["---", "title: x", "---", "body"]);
        let output = lines(&["converted body"]);
        assert_eq!(
            preserve_yaml(&input, &output),
            lines(&["---", "title: x", "---", "", "converted body"])
        );
    }

    #[test]
    fn test_preserve_yaml_without_front_matter() {
        let input = lines(&["no front matter"]);
        let output = lines(&["out"]);
        assert_eq!(preserve_yaml(&input, &output), lines(&["out"]));
    }

    #[test]
    fn test_preserve_yaml_empty_output() {
        let input = lines(&["---", "a: 1", "..."]);
        assert_eq!(
            preserve_yaml(&input, &[]),
            lines(&["---", "a: 1", "...", ""])
        );
    }

    #[test]
    fn test_post_processor_preserves_front_matter() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.knit.md");
        let output = dir.path().join("doc.md");
        fs::write(&input, "---\ntitle: Report\n---\n\n# Intro\n").unwrap();
        fs::write(&output, "# Intro\n").unwrap();

        let result = PostProcessor::PreserveYaml.run(&input, &output).unwrap();

        assert_eq!(result, output);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "---\ntitle: Report\n---\n\n# Intro\n"
        );
    }

    #[test]
    fn test_post_processor_without_front_matter() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.knit.md");
        let output = dir.path().join("doc.md");
        fs::write(&input, "# Intro\n").unwrap();
        fs::write(&output, "Intro\n=====\n").unwrap();

        PostProcessor::PreserveYaml.run(&input, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "Intro\n=====\n");
    }

    #[test]
    fn test_post_processor_missing_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.knit.md");
        fs::write(&input, "text\n").unwrap();

        let err = PostProcessor::PreserveYaml
            .run(&input, &dir.path().join("missing.md"))
            .unwrap_err();
        assert!(matches!(err, MdDocumentError::Read { .. }));
    }

    #[test]
    fn test_pre_processor_rewrites_in_place() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.knit.md");
        fs::write(&input, "---\ntitle: Report\n---\n# Intro\n").unwrap();
        let lua_filter = dir.path().join("number-sections.lua");

        let pandoc = RecordingPandoc::default();
        let hook = PreProcessor::NumberSections {
            lua_filter: lua_filter.clone(),
        };
        let extra_args = hook.run(&pandoc, &input).unwrap();

        assert!(extra_args.is_empty());
        assert_eq!(
            fs::read_to_string(&input).unwrap(),
            "---\ntitle: Report\n---\n\n# Intro {#intro}\n"
        );

        let calls = pandoc.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (call_input, to, call_output, options) = &calls[0];
        assert_eq!(call_input, &input);
        assert_eq!(call_output, &input);
        assert_eq!(to, "markdown");
        assert_eq!(
            options,
            &vec![
                "--lua-filter".to_string(),
                pandoc_opts::path_arg(&lua_filter),
                "--metadata".to_string(),
                "preprocess_number_sections=true".to_string(),
            ]
        );
    }

    #[test]
    fn test_pre_processor_propagates_pandoc_failure() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.knit.md");
        fs::write(&input, "# Intro\n").unwrap();

        let hook = PreProcessor::NumberSections {
            lua_filter: dir.path().join("number-sections.lua"),
        };
        let err = hook
            .run(&crate::engine::FixedPandoc::default(), &input)
            .unwrap_err();

        assert!(matches!(err, MdDocumentError::PandocNotFound));
        assert_eq!(fs::read_to_string(&input).unwrap(), "# Intro\n");
    }

    #[test]
    fn test_hooks_serialize_with_type_tag() {
        let pre = PreProcessor::NumberSections {
            lua_filter: PathBuf::from("/tmp/number-sections.lua"),
        };
        assert_eq!(
            serde_json::to_value(&pre).unwrap(),
            serde_json::json!({
                "type": "number-sections",
                "lua_filter": "/tmp/number-sections.lua"
            })
        );
        assert_eq!(
            serde_json::to_value(PostProcessor::PreserveYaml).unwrap(),
            serde_json::json!({ "type": "preserve-yaml" })
        );
    }
}
