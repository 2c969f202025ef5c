//! Device I/O
//!
//! Thin wrapper around the target file or block device. Grounded on
//! `openFileSystem`/`check_mounted`/`syncFileSystem`/`closeFileSystem` in
//! `FAT_fs.c`: exclusive modes resolve the real path, reject it if a
//! mount record names the same path, then open with an advisory
//! exclusive flag; non-exclusive modes just open shared. All other reads
//! and writes are plain seek+read/write at an absolute byte offset.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
    ReadOnlyExclusive,
    ReadWriteExclusive,
}

impl OpenMode {
    pub fn is_exclusive(self) -> bool {
        matches!(self, OpenMode::ReadOnlyExclusive | OpenMode::ReadWriteExclusive)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, OpenMode::ReadWrite | OpenMode::ReadWriteExclusive)
    }
}

pub struct Device {
    file: File,
    path: PathBuf,
    mode: OpenMode,
}

impl Device {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        if mode.is_exclusive() && is_mounted(path)? {
            return Err(Error::MountConflict(path.to_path_buf()));
        }

        let file = if mode.is_exclusive() {
            open_exclusive(path, mode.is_writable())?
        } else {
            OpenOptions::new()
                .read(true)
                .write(mode.is_writable())
                .open(path)?
        };

        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    pub fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        Ok(())
    }

    /// Flush userland buffers and force a device-level sync, the way
    /// `syncFileSystem` in `FAT_fs.c` does with `fflush` + `fsync`.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Exclusive opens go through `O_EXCL` directly instead of `OpenOptions`,
/// matching the original's `open(path, O_RDONLY|O_EXCL)` /
/// `open(path, O_RDWR|O_EXCL)` before wrapping the descriptor in a stream.
fn open_exclusive(path: &Path, writable: bool) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.read(true).write(writable).custom_flags(libc::O_EXCL);
    Ok(opts.open(path)?)
}

/// Checks whether `path` names the same file as an entry in `/proc/mounts`.
/// Equivalent to `check_mounted` in `FAT_fs.c`, which walks `/etc/mtab`
/// comparing `realpath()` of each mounted device to the target.
fn is_mounted(path: &Path) -> Result<bool> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mounts = match std::fs::read_to_string("/proc/mounts") {
        Ok(contents) => contents,
        Err(_) => return Ok(false),
    };

    for line in mounts.lines() {
        let Some(device_field) = line.split_whitespace().next() else {
            continue;
        };
        if let Ok(mounted) = std::fs::canonicalize(device_field) {
            if mounted == target {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
