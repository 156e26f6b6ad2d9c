//! Leading YAML front matter detection
//!
//! Front matter is a block opened by `---` and closed by `---` or `...` at the
//! top of a document. Only blank lines may precede the opening delimiter, and
//! the line right after it must not be blank (a `---` followed by a blank
//! line is a horizontal rule).

/// Result of splitting a document into front matter and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatterPartition {
    /// Front matter lines including both delimiters, if present
    pub front_matter: Option<Vec<String>>,
    /// Remaining lines: anything before the opening delimiter followed by
    /// everything after the closing one
    pub body: Vec<String>,
}

/// Split `lines` into leading front matter and body
pub fn partition(lines: &[String]) -> FrontMatterPartition {
    match find_delimiters(lines) {
        Some((start, end)) => {
            let mut body = lines[..start].to_vec();
            body.extend_from_slice(&lines[end + 1..]);
            FrontMatterPartition {
                front_matter: Some(lines[start..=end].to_vec()),
                body,
            }
        }
        None => FrontMatterPartition {
            front_matter: None,
            body: lines.to_vec(),
        },
    }
}

/// Indices of the opening and closing delimiters of valid front matter
fn find_delimiters(lines: &[String]) -> Option<(usize, usize)> {
    let mut delimiters = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_delimiter(line))
        .map(|(i, _)| i);

    let start = delimiters.next()?;
    let end = delimiters.next()?;

    if end - start <= 1 || lines[start].trim_end() != "---" {
        return None;
    }
    if is_blank(&lines[start + 1]) {
        return None;
    }
    if !lines[..start].iter().all(|line| is_blank(line)) {
        return None;
    }

    Some((start, end))
}

fn is_delimiter(line: &str) -> bool {
    matches!(line.trim_end(), "---" | "...")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
