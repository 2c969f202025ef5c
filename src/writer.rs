//! Writer
//!
//! Serializes a reordered list of logical records back into the same
//! physical space it was parsed from, inside a signal-masked critical
//! section, then fsyncs (spec.md §4.6, §5, §9). Grounded on
//! `writeClusterChain`/`writeFAT1xRootDir` and the `sigprocmask`
//! wrapping in `sort.c`'s `sortDirectory`.
//!
//! [`DirSource::slot_offsets`] already lays out every 32-byte slot of a
//! directory as one flat, physically-ordered sequence — cluster
//! boundaries included. That means packing records across a cluster
//! boundary needs no special split logic here: a record's fragments and
//! short entry are simply written to however many consecutive offsets
//! in that sequence they need.

use crate::device::Device;
use crate::dirstream::DirSource;
use crate::entry::ENTRY_SIZE;
use crate::error::{Error, Result};
use crate::record::LogicalRecord;

/// Masks SIGTERM/SIGINT/SIGHUP on construction, restores the previous
/// mask on drop. Scopes the writer's critical section (spec.md §5, §9).
pub struct SignalMask {
    previous: libc::sigset_t,
}

impl SignalMask {
    pub fn block_critical() -> std::io::Result<Self> {
        unsafe {
            let mut set: libc::sigset_t = std::mem::zeroed();
            let mut previous: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut set);
            libc::sigaddset(&mut set, libc::SIGTERM);
            libc::sigaddset(&mut set, libc::SIGINT);
            libc::sigaddset(&mut set, libc::SIGHUP);
            if libc::sigprocmask(libc::SIG_BLOCK, &set, &mut previous) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(Self { previous })
        }
    }
}

impl Drop for SignalMask {
    fn drop(&mut self) {
        unsafe {
            libc::sigprocmask(libc::SIG_SETMASK, &self.previous, std::ptr::null_mut());
        }
    }
}

/// Writes `records` into `destination` in list order, zeroing every
/// remaining slot up to end-of-chain/end-of-region (spec.md §9's
/// resolution of the source's apparent truncation-omission open
/// question: the whole tail is cleared, not just the current cluster).
///
/// Errors are checked (capacity) before the critical section opens, so
/// a failure can only occur mid-write as an I/O error, which spec.md §7
/// documents as a risk rather than something recoverable in-process.
pub fn write_list(device: &mut Device, destination: &DirSource, records: &[LogicalRecord]) -> Result<()> {
    let offsets = destination.slot_offsets();

    let needed: usize = records.iter().map(LogicalRecord::slot_count).sum();
    if needed > offsets.len() {
        return Err(Error::Bounds(format!(
            "directory needs {needed} 32-byte slots but only {} are available",
            offsets.len()
        )));
    }

    let _mask = SignalMask::block_critical()?;

    let mut idx = 0;
    for record in records {
        for fragment in &record.fragments {
            device.write_at(offsets[idx], fragment.as_bytes())?;
            idx += 1;
        }
        device.write_at(offsets[idx], record.short.as_bytes())?;
        idx += 1;
    }

    let zero = [0u8; ENTRY_SIZE];
    for &offset in &offsets[idx..] {
        device.write_at(offset, &zero)?;
    }

    device.sync()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::OpenMode;
    use crate::entry::ShortDirEntry;
    use std::io::Write as _;

    fn open_scratch_device(size: usize) -> (tempfile::NamedTempFile, Device) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0xCCu8; size]).unwrap();
        file.flush().unwrap();
        let device = Device::open(file.path(), OpenMode::ReadWrite).unwrap();
        (file, device)
    }

    #[test]
    fn rejects_record_list_that_overflows_capacity() {
        let destination = DirSource::FixedRegion { offset: 0, entry_count: 1 };
        let raw = [0x20u8; 32];
        let short = ShortDirEntry::from_bytes(raw);
        let records = vec![
            LogicalRecord::new(short, Vec::new(), String::new()),
            LogicalRecord::new(short, Vec::new(), String::new()),
        ];
        let (_file, mut device) = open_scratch_device(32);
        let err = write_list(&mut device, &destination, &records).unwrap_err();
        assert!(matches!(err, Error::Bounds(_)));
    }

    #[test]
    fn zeroes_trailing_slots_after_packing() {
        let destination = DirSource::FixedRegion { offset: 0, entry_count: 3 };
        let mut raw = [0x20u8; 32];
        raw[0..8].copy_from_slice(b"README  ");
        let short = ShortDirEntry::from_bytes(raw);
        let records = vec![LogicalRecord::new(short, Vec::new(), String::new())];

        let (_file, mut device) = open_scratch_device(32 * 3);
        write_list(&mut device, &destination, &records).unwrap();

        let mut first = [0u8; 32];
        device.read_at(0, &mut first).unwrap();
        assert_eq!(&first, short.as_bytes());

        let mut second = [0u8; 32];
        device.read_at(32, &mut second).unwrap();
        assert_eq!(second, [0u8; 32]);

        let mut third = [0u8; 32];
        device.read_at(64, &mut third).unwrap();
        assert_eq!(third, [0u8; 32]);
    }
}
