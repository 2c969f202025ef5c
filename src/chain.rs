//! Cluster chain walker
//!
//! Follows FAT forward pointers from a starting cluster until
//! end-of-chain, with the integrity checks `sort.c`'s chain-reading
//! loop applies: an out-of-range pointer, a pointer into a free
//! cluster (FAT corruption), or a chain so long it can only be a loop.

use crate::bpb::BootSector;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::fat::{FatEntry, FatTable};

/// An ordered sequence of cluster numbers, all ≥2.
#[derive(Debug, Clone, Default)]
pub struct ClusterChain {
    clusters: Vec<u32>,
}

impl ClusterChain {
    pub fn clusters(&self) -> &[u32] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Walks the chain starting at `start_cluster`. `start_cluster` itself
/// is not checked against the FAT (it is the caller's own first-cluster
/// pointer); every cluster it leads to is.
pub fn walk(device: &mut Device, boot: &BootSector, start_cluster: u32) -> Result<ClusterChain> {
    let max_len = boot.max_cluster_chain_length();
    let cluster_count = boot.cluster_count();
    let mut table = FatTable::new(device, boot);

    let mut clusters = vec![start_cluster];
    let mut current = start_cluster;

    loop {
        if clusters.len() as u32 > max_len {
            return Err(Error::Bounds(format!(
                "cluster chain starting at {start_cluster} exceeds the maximum length of {max_len}"
            )));
        }

        match table.get_entry(current)? {
            FatEntry::EndOfChain => break,
            FatEntry::Free => {
                return Err(Error::InvalidFormat(format!(
                    "cluster chain starting at {start_cluster} points to free cluster {current}"
                )))
            }
            FatEntry::Bad => {
                return Err(Error::InvalidFormat(format!(
                    "cluster chain starting at {start_cluster} points to a bad cluster"
                )))
            }
            FatEntry::Next(next) => {
                if next < 2 || next > cluster_count + 1 {
                    return Err(Error::Bounds(format!(
                        "cluster chain starting at {start_cluster} points out of range to {next}"
                    )));
                }
                clusters.push(next);
                current = next;
            }
        }
    }

    Ok(ClusterChain { clusters })
}
