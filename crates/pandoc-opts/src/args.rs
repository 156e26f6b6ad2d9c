//! Builders for Pandoc command-line arguments

use std::path::{Path, PathBuf};

/// Extra content included into the output document
///
/// Each list is emitted in order as one `--include-*` flag per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Includes {
    /// Files included at the end of the header (`--include-in-header`)
    pub in_header: Vec<PathBuf>,
    /// Files included at the start of the body (`--include-before-body`)
    pub before_body: Vec<PathBuf>,
    /// Files included at the end of the body (`--include-after-body`)
    pub after_body: Vec<PathBuf>,
}

impl Includes {
    /// Whether no include files are configured
    pub fn is_empty(&self) -> bool {
        self.in_header.is_empty() && self.before_body.is_empty() && self.after_body.is_empty()
    }
}

/// Table of contents arguments
///
/// Returns `--table-of-contents --toc-depth <depth>` when `toc` is set and
/// nothing otherwise.
pub fn toc_args(toc: bool, toc_depth: u32) -> Vec<String> {
    if !toc {
        return Vec::new();
    }
    vec![
        "--table-of-contents".to_string(),
        "--toc-depth".to_string(),
        toc_depth.to_string(),
    ]
}

/// Convert include files to `--include-*` arguments
pub fn includes_to_args(includes: Option<&Includes>) -> Vec<String> {
    let Some(includes) = includes else {
        return Vec::new();
    };

    let groups = [
        ("--include-in-header", &includes.in_header),
        ("--include-before-body", &includes.before_body),
        ("--include-after-body", &includes.after_body),
    ];

    let mut args = Vec::new();
    for (flag, files) in groups {
        for file in files {
            args.push(flag.to_string());
            args.push(path_arg(file));
        }
    }
    args
}

/// Render a path the way Pandoc expects it on the command line
///
/// A leading `~` is expanded from `HOME`, and on Windows backslashes are
/// turned into forward slashes.
pub fn path_arg(path: &Path) -> String {
    let expanded = expand_tilde(path);
    let s = expanded.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Input format for R Markdown sources
///
/// Starts from `markdown` and turns on `autolink_bare_uris` and
/// `tex_math_single_backslash` unless the given extensions already mention
/// them. With `implicit_figures` disabled, `-implicit_figures` is prepended
/// unless the extensions mention it.
///
/// ```
/// use pandoc_opts::from_rmarkdown;
///
/// assert_eq!(
///     from_rmarkdown(true, &[]),
///     "markdown+autolink_bare_uris+tex_math_single_backslash"
/// );
/// assert_eq!(
///     from_rmarkdown(true, &["-autolink_bare_uris".to_string()]),
///     "markdown+tex_math_single_backslash-autolink_bare_uris"
/// );
/// ```
pub fn from_rmarkdown(implicit_figures: bool, extensions: &[String]) -> String {
    let mut extensions: String = extensions.concat();
    extensions.retain(|c| c != ' ');

    if !implicit_figures && !extensions.contains("implicit_figures") {
        extensions.insert_str(0, "-implicit_figures");
    }

    let mut format = String::from("markdown");
    for extension in ["autolink_bare_uris", "tex_math_single_backslash"] {
        if !extensions.contains(extension) {
            format.push('+');
            format.push_str(extension);
        }
    }
    format.push_str(&extensions);
    format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toc_args() {
        assert!(toc_args(false, 3).is_empty());
        assert_eq!(
            toc_args(true, 2),
            vec!["--table-of-contents", "--toc-depth", "2"]
        );
    }

    #[test]
    fn test_includes_to_args_none() {
        assert!(includes_to_args(None).is_empty());
        assert!(includes_to_args(Some(&Includes::default())).is_empty());
    }

    #[test]
    fn test_includes_to_args_order() {
        let includes = Includes {
            in_header: vec![PathBuf::from("header.html")],
            before_body: vec![PathBuf::from("before1.md"), PathBuf::from("before2.md")],
            after_body: vec![PathBuf::from("after.md")],
        };
        assert_eq!(
            includes_to_args(Some(&includes)),
            vec![
                "--include-in-header",
                "header.html",
                "--include-before-body",
                "before1.md",
                "--include-before-body",
                "before2.md",
                "--include-after-body",
                "after.md",
            ]
        );
    }

    #[test]
    fn test_path_arg_leaves_plain_paths() {
        assert_eq!(path_arg(Path::new("assets/footer.md")), "assets/footer.md");
    }

    #[test]
    fn test_path_arg_expands_tilde() {
        if let Some(home) = std::env::var_os("HOME") {
            let expected = PathBuf::from(home).join("notes/header.html");
            assert_eq!(
                path_arg(Path::new("~/notes/header.html")),
                path_arg(&expected)
            );
        }
    }

    #[test]
    fn test_from_rmarkdown_extensions() {
        assert_eq!(
            from_rmarkdown(true, &["+gfm_auto_identifiers".to_string()]),
            "markdown+autolink_bare_uris+tex_math_single_backslash+gfm_auto_identifiers"
        );
        assert_eq!(
            from_rmarkdown(true, &["+smart ".to_string(), " -raw_html".to_string()]),
            "markdown+autolink_bare_uris+tex_math_single_backslash+smart-raw_html"
        );
    }

    #[test]
    fn test_from_rmarkdown_without_implicit_figures() {
        assert_eq!(
            from_rmarkdown(false, &[]),
            "markdown+autolink_bare_uris+tex_math_single_backslash-implicit_figures"
        );
        assert_eq!(
            from_rmarkdown(false, &["+implicit_figures".to_string()]),
            "markdown+autolink_bare_uris+tex_math_single_backslash+implicit_figures"
        );
    }
}
