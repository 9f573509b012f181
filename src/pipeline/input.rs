//! Input specifiers: `report.pdf` or `report.pdf:2,5-10,15-`.
//!
//! The range suffix is split off at the **last** `:` so a path that itself
//! contains a colon can still be given by appending an empty suffix
//! (`odd:name.pdf:`). An empty suffix means "all pages" and never reaches
//! the range parser.

use std::fmt;
use std::path::{Path, PathBuf};

/// A PDF path plus the raw, still 1-based page-range string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: PathBuf,
    pub pages: Option<String>,
}

impl InputSpec {
    /// Split a command-line specifier into path and optional range.
    pub fn parse(spec: &str) -> Self {
        match spec.rsplit_once(':') {
            Some((path, pages)) => {
                let pages = pages.trim();
                Self {
                    path: PathBuf::from(path),
                    pages: (!pages.is_empty()).then(|| pages.to_string()),
                }
            }
            None => Self {
                path: PathBuf::from(spec),
                pages: None,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pages {
            Some(pages) => write!(f, "{}:{}", self.path.display(), pages),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_has_no_range() {
        let spec = InputSpec::parse("doc.pdf");
        assert_eq!(spec.path, PathBuf::from("doc.pdf"));
        assert_eq!(spec.pages, None);
    }

    #[test]
    fn suffix_is_split_off() {
        let spec = InputSpec::parse("dir/doc.pdf:2,5-10,15-");
        assert_eq!(spec.path, PathBuf::from("dir/doc.pdf"));
        assert_eq!(spec.pages.as_deref(), Some("2,5-10,15-"));
    }

    #[test]
    fn empty_suffix_means_all_pages() {
        let spec = InputSpec::parse("doc.pdf:");
        assert_eq!(spec.path, PathBuf::from("doc.pdf"));
        assert_eq!(spec.pages, None);

        let spec = InputSpec::parse("odd:name.pdf:");
        assert_eq!(spec.path, PathBuf::from("odd:name.pdf"));
        assert_eq!(spec.pages, None);
    }

    #[test]
    fn display_round_trips_the_specifier() {
        assert_eq!(InputSpec::parse("a.pdf:3").to_string(), "a.pdf:3");
        assert_eq!(InputSpec::parse("a.pdf").to_string(), "a.pdf");
    }
}
