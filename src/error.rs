//! Error kinds for the FAT core.
//!
//! Mirrors the error surface of the original `fatsort` C implementation
//! (`FAT_fs.h`, `sort.c`, `options.h`): invalid on-disk format, I/O
//! failure, an out-of-range cluster/chain, a mounted device rejected
//! without `--force`, mismatched FAT copies, and conflicting filter
//! options. Decode failures are carried as warnings, not hard errors
//! (spec.md §7) and therefore don't appear here.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Bounds(String),

    #[error("device {0} is mounted; use --force to sort anyway")]
    MountConflict(PathBuf),

    #[error("FAT copies don't match; file system needs repair before sorting")]
    FatMismatch,

    #[error("filter options conflict: {0}")]
    OptionConflict(String),
}
