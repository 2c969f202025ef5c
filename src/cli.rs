//! Command-line surface
//!
//! Exposes the option set of spec.md §6 via `clap`'s derive API, the
//! way the teacher's own std-side binary
//! (`examples/fat32-fs-std/src/main.rs`) builds its `clap::Command`
//! front end. Argument parsing itself is explicitly out of scope for
//! the core (spec.md §1); this module's job ends at turning parsed
//! flags into a `SortPolicy` + `Filters` the core consumes.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};
use crate::filters::Filters;
use crate::order::{DirBias, NameOrder, SortPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Directories first (default).
    D,
    /// Files first.
    F,
    /// No bias ("mixed").
    A,
}

#[derive(Debug, Parser)]
#[command(
    name = "fatsort",
    version,
    about = "Sorts directory entries on a FAT12/16/32 file system in place"
)]
pub struct Cli {
    /// Device or image path.
    pub device: PathBuf,

    /// Report FAT geometry and usage; does not modify the device.
    #[arg(long = "info", short = 'i')]
    pub info: bool,

    /// List directory contents in on-disk order without reordering.
    #[arg(long = "list-only", short = 'l')]
    pub list_only: bool,

    /// Sort even though the device appears to be mounted.
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Suppress informational messages.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Print the per-cluster FAT chain-length table in info mode.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// ASCII byte-order name comparison.
    #[arg(short = 'a')]
    pub ascii: bool,

    /// Case-insensitive name comparison.
    #[arg(short = 'c')]
    pub ignore_case: bool,

    /// Natural order: numeric runs compare as numbers.
    #[arg(short = 'n')]
    pub natural: bool,

    /// Reverse the final sort order.
    #[arg(short = 'r')]
    pub reverse: bool,

    /// Randomize order (excluding the leading volume label/"."/"..").
    #[arg(short = 'R')]
    pub random: bool,

    /// Sort by last-modified time instead of by name.
    #[arg(short = 't')]
    pub by_mtime: bool,

    /// Directory/file ordering bias: d(irs-first, default) / f(iles-first) / a(ll mixed).
    #[arg(short = 'o', value_enum)]
    pub order: Option<OrderArg>,

    /// Strip a leading case-insensitive token (repeatable), e.g. "The ".
    #[arg(short = 'I')]
    pub ignore_prefix: Vec<String>,

    /// Use locale-collation name comparison instead of ASCII/natural.
    #[arg(short = 'L')]
    pub locale: bool,

    /// Sort this directory (path relative to the volume root).
    #[arg(short = 'd')]
    pub sort_dir: Vec<PathBuf>,

    /// Sort this directory and everything under it.
    #[arg(short = 'D')]
    pub sort_dir_recursive: Vec<PathBuf>,

    /// Exclude this directory.
    #[arg(short = 'x')]
    pub exclude_dir: Vec<PathBuf>,

    /// Exclude this directory and everything under it.
    #[arg(short = 'X')]
    pub exclude_dir_recursive: Vec<PathBuf>,

    /// Include directories matching this regex (repeatable).
    #[arg(short = 'e')]
    pub include_regex: Vec<String>,

    /// Exclude directories matching this regex (repeatable).
    #[arg(short = 'E')]
    pub exclude_regex: Vec<String>,
}

impl Cli {
    /// Builds the immutable sort configuration the core consumes
    /// (spec.md §9's "no hidden state"). Ordering flags that cannot
    /// co-exist are not rejected here — natural/ascii/locale are just
    /// precedence (last/most-specific wins below), matching the
    /// original's "most specific flag checked last" `switch`.
    pub fn sort_policy(&self) -> SortPolicy {
        let dir_bias = match self.order {
            Some(OrderArg::D) | None => DirBias::DirsFirst,
            Some(OrderArg::F) => DirBias::FilesFirst,
            Some(OrderArg::A) => DirBias::Mixed,
        };
        let name_order = if self.locale {
            NameOrder::Locale
        } else if self.natural {
            NameOrder::Natural
        } else {
            NameOrder::Ascii
        };
        SortPolicy {
            list_only: self.list_only,
            random: self.random,
            reverse: self.reverse,
            ignore_case: self.ignore_case || self.locale,
            by_mtime: self.by_mtime,
            dir_bias,
            name_order,
            ignore_prefixes: self.ignore_prefix.clone(),
        }
    }

    /// Builds the path-list or regex filter family. The two families
    /// are mutually exclusive (spec.md §4.7); mixing them is a fatal
    /// `OptionConflict` (spec.md §6's exit-code list).
    pub fn filters(&self) -> Result<Filters> {
        let has_path_list = !self.sort_dir.is_empty()
            || !self.sort_dir_recursive.is_empty()
            || !self.exclude_dir.is_empty()
            || !self.exclude_dir_recursive.is_empty();
        let has_regex = !self.include_regex.is_empty() || !self.exclude_regex.is_empty();

        if has_path_list && has_regex {
            return Err(Error::OptionConflict(
                "path-list filters (-d/-D/-x/-X) and regex filters (-e/-E) cannot both be set".into(),
            ));
        }

        if has_regex {
            let include = self
                .include_regex
                .iter()
                .map(|p| regex::Regex::new(p).map_err(|e| Error::OptionConflict(format!("bad include regex {p:?}: {e}"))))
                .collect::<Result<Vec<_>>>()?;
            let exclude = self
                .exclude_regex
                .iter()
                .map(|p| regex::Regex::new(p).map_err(|e| Error::OptionConflict(format!("bad exclude regex {p:?}: {e}"))))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Filters::Regex { include, exclude });
        }

        if has_path_list {
            return Ok(Filters::PathList {
                include_exact: self.sort_dir.clone(),
                include_recursive: self.sort_dir_recursive.clone(),
                exclude_exact: self.exclude_dir.clone(),
                exclude_recursive: self.exclude_dir_recursive.clone(),
            });
        }

        Ok(Filters::All)
    }
}
