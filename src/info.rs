//! Information mode
//!
//! Non-destructive FAT geometry/usage report, grounded on
//! `printFSInfo` in `fatsort.c`: walks every cluster's FAT entry,
//! tallies used/bad counts, and (verbose submode) the chain length
//! rooted at every nonzero cluster. Read-only: opens nothing it
//! doesn't already have from the caller's [`Volume`](crate::volume::Volume).

use std::fmt;

use crate::bpb::{BootSector, FatType};
use crate::chain;
use crate::device::Device;
use crate::error::Result;
use crate::fat::{FatEntry, FatTable};

pub struct FsReport {
    pub fat_type: FatType,
    pub bytes_per_sector: u32,
    pub sectors_per_cluster: u32,
    pub cluster_size: u32,
    pub num_fats: u32,
    pub fats_match: bool,
    pub cluster_count: u32,
    pub used_clusters: u32,
    pub bad_clusters: u32,
    pub max_chain_length: u32,
    pub fs_size_bytes: u64,
    pub root_detail: RootDetail,
}

pub enum RootDetail {
    Fat32 { root_cluster: u32 },
    Fat1x { root_entry_count: u32 },
}

/// Walks clusters 2..=cluster_count+1, classifying each FAT entry.
/// O(n) in cluster count; safe to run on any volume opened read-only.
pub fn gather(device: &mut Device, boot: &BootSector) -> Result<FsReport> {
    let mut table = FatTable::new(device, boot);
    let cluster_count = boot.cluster_count();

    let mut used = 0u32;
    let mut bad = 0u32;
    for cluster in 2..=cluster_count + 1 {
        match table.get_entry(cluster)? {
            FatEntry::Free => {}
            FatEntry::Bad => {
                bad += 1;
                used += 1;
            }
            FatEntry::EndOfChain | FatEntry::Next(_) => used += 1,
        }
    }

    let fats_match = table.fats_match()?;

    let root_detail = match boot.fat_type() {
        FatType::Fat32 => RootDetail::Fat32 { root_cluster: boot.root_cluster() },
        FatType::Fat12 | FatType::Fat16 => RootDetail::Fat1x { root_entry_count: boot.root_entry_count() },
    };

    Ok(FsReport {
        fat_type: boot.fat_type(),
        bytes_per_sector: boot.bytes_per_sector(),
        sectors_per_cluster: boot.sectors_per_cluster(),
        cluster_size: boot.cluster_size(),
        num_fats: boot.num_fats(),
        fats_match,
        cluster_count,
        used_clusters: used,
        bad_clusters: bad,
        max_chain_length: boot.max_cluster_chain_length(),
        fs_size_bytes: boot.total_sectors() as u64 * boot.bytes_per_sector() as u64,
        root_detail,
    })
}

/// Verbose submode: for every nonzero FAT entry, the length of the
/// chain starting there. O(n^2) in cluster count, acceptable for
/// diagnostics (spec.md §4.8).
pub fn chain_lengths(device: &mut Device, boot: &BootSector) -> Result<Vec<(u32, u32)>> {
    let cluster_count = boot.cluster_count();
    let mut lengths = Vec::new();

    for cluster in 2..=cluster_count + 1 {
        let is_nonzero = {
            let mut table = FatTable::new(device, boot);
            !matches!(table.get_entry(cluster)?, FatEntry::Free)
        };
        if is_nonzero {
            match chain::walk(device, boot, cluster) {
                Ok(c) => lengths.push((cluster, c.len() as u32)),
                Err(_) => lengths.push((cluster, 0)),
            }
        }
    }

    Ok(lengths)
}

impl fmt::Display for FsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FAT type: {:?}", self.fat_type)?;
        writeln!(f, "Bytes per sector: {}", self.bytes_per_sector)?;
        writeln!(f, "Sectors per cluster: {}", self.sectors_per_cluster)?;
        writeln!(f, "Cluster size: {} bytes", self.cluster_size)?;
        write!(f, "Number of FATs: {}", self.num_fats)?;
        if !self.fats_match {
            writeln!(f, " (MISMATCH: FAT copies differ!)")?;
        } else {
            writeln!(f)?;
        }
        writeln!(f, "Max cluster chain length: {}", self.max_chain_length)?;
        writeln!(f, "Cluster count: {}", self.cluster_count)?;
        writeln!(f, "Used clusters: {}", self.used_clusters)?;
        writeln!(f, "Bad clusters: {}", self.bad_clusters)?;
        writeln!(f, "File system size: {} MiB", self.fs_size_bytes / (1024 * 1024))?;
        match self.root_detail {
            RootDetail::Fat32 { root_cluster } => writeln!(f, "Root directory: cluster {root_cluster}")?,
            RootDetail::Fat1x { root_entry_count } => {
                writeln!(f, "Root directory: fixed region, {root_entry_count} entries")?
            }
        }
        Ok(())
    }
}
