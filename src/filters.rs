//! Path-list and regex filters for the recursive driver (spec.md §4.7).
//!
//! The two filter families are mutually exclusive; the CLI layer is
//! responsible for rejecting a mix (`Error::OptionConflict`) before a
//! `Filters` value is ever built. Grounded on `checkOption`/`isInList`
//! in `options.c`, generalized from global `OPT_SORT_DIR`/`OPT_EXCLUDE`
//! lists and an `fnmatch`-free exact/recursive split per spec.md §4.7.

use std::path::{Path, PathBuf};

use regex::Regex;

#[derive(Debug, Clone)]
pub enum Filters {
    /// No filter configured: every directory is sorted.
    All,
    PathList {
        include_exact: Vec<PathBuf>,
        include_recursive: Vec<PathBuf>,
        exclude_exact: Vec<PathBuf>,
        exclude_recursive: Vec<PathBuf>,
    },
    Regex {
        include: Vec<Regex>,
        exclude: Vec<Regex>,
    },
}

impl Filters {
    /// Whether `path` (the directory currently being considered) should
    /// be rewritten. The driver still recurses into its children
    /// regardless of this answer (spec.md §4.7).
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Filters::All => true,
            Filters::PathList {
                include_exact,
                include_recursive,
                exclude_exact,
                exclude_recursive,
            } => {
                let included = (include_exact.is_empty() && include_recursive.is_empty())
                    || include_exact.iter().any(|p| p == path)
                    || include_recursive.iter().any(|d| is_descendant(path, d));
                if !included {
                    return false;
                }
                if exclude_exact.iter().any(|p| p == path) {
                    return false;
                }
                if exclude_recursive.iter().any(|d| is_descendant(path, d)) {
                    return false;
                }
                true
            }
            Filters::Regex { include, exclude } => {
                let text = path.to_string_lossy();
                if exclude.iter().any(|re| re.is_match(&text)) {
                    return false;
                }
                include.is_empty() || include.iter().any(|re| re.is_match(&text))
            }
        }
    }
}

fn is_descendant(path: &Path, ancestor: &Path) -> bool {
    path != ancestor && path.starts_with(ancestor)
}
