//! Volume model
//!
//! Ties together the open device, its validated boot sector, and the
//! name decoder into the one long-lived handle the rest of the core
//! operates on (spec.md §3 "Volume", §4.1 open/close). Grounded on
//! `openFileSystem`/`closeFileSystem` in `FAT_fs.c`.

use std::path::Path;

use crate::bpb::{BootSector, FatType, FsInfo, BOOT_SECTOR_SIZE};
use crate::chain;
use crate::decode::{NameDecoder, Utf16LossyDecoder};
use crate::device::{Device, OpenMode};
use crate::dirstream::DirSource;
use crate::error::Result;
use crate::fat::FatTable;

pub struct Volume {
    device: Device,
    boot: BootSector,
    decoder: Box<dyn NameDecoder>,
}

impl Volume {
    /// Opens `path` in `mode`: exclusive modes first reject a mounted
    /// device, then acquire an OS-exclusive handle. On success, sector
    /// 0 is read, validated, and classified (spec.md §4.1). Any
    /// failure releases the device handle it just opened (dropping
    /// `Device` closes its file descriptor).
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let mut device = Device::open(path, mode)?;
        let mut raw = [0u8; BOOT_SECTOR_SIZE];
        device.read_at(0, &mut raw)?;
        let boot = BootSector::parse(raw)?;
        Ok(Self {
            device,
            boot,
            decoder: Box::new(Utf16LossyDecoder),
        })
    }

    pub fn device(&mut self) -> &mut Device {
        &mut self.device
    }

    pub fn boot(&self) -> &BootSector {
        &self.boot
    }

    pub fn decoder(&self) -> &dyn NameDecoder {
        self.decoder.as_ref()
    }

    /// Disjoint-field access for callers (the driver) that need the
    /// device, boot sector, and decoder all at once without fighting
    /// the borrow checker over `&mut self` vs `&self`.
    pub fn parts(&mut self) -> (&mut Device, &BootSector, &dyn NameDecoder) {
        (&mut self.device, &self.boot, self.decoder.as_ref())
    }

    /// Byte-compares every FAT copy; the driver refuses to sort when
    /// this is false (spec.md §4.2, §7).
    pub fn fats_match(&mut self) -> Result<bool> {
        FatTable::new(&mut self.device, &self.boot).fats_match()
    }

    /// The volume's root directory as a [`DirSource`]: a walked chain
    /// from `BPB_RootClus` on FAT32, or the fixed region following the
    /// FATs on FAT12/16 (spec.md §3, §4.4).
    pub fn root_source(&mut self) -> Result<DirSource> {
        match self.boot.fat_type() {
            FatType::Fat32 => {
                let chain = chain::walk(&mut self.device, &self.boot, self.boot.root_cluster())?;
                Ok(DirSource::from_chain(&self.boot, chain.clusters()))
            }
            FatType::Fat12 | FatType::Fat16 => Ok(DirSource::from_fixed_root(&self.boot)),
        }
    }

    /// Reads the FAT32 FSInfo sector, if the boot sector names one.
    pub fn read_fs_info(&mut self) -> Result<Option<FsInfo>> {
        if self.boot.fat_type() != FatType::Fat32 {
            return Ok(None);
        }
        let sector = self.boot.fs_info_sector();
        if sector == 0 || sector == 0xFFFF {
            return Ok(None);
        }
        let offset = sector as u64 * self.boot.bytes_per_sector() as u64;
        let mut raw = [0u8; BOOT_SECTOR_SIZE];
        self.device.read_at(offset, &mut raw)?;
        Ok(Some(FsInfo::parse(raw)))
    }

    /// Flushes and closes. Sorting never touches the FAT or boot
    /// sector (spec.md §6), so there is nothing else to reconcile here
    /// beyond a final sync.
    pub fn close(self) -> Result<()> {
        self.device.sync()
    }
}
