//! Directory-entry parser
//!
//! Streams 32-byte slots from either a cluster chain or the fixed
//! FAT12/16 root region and assembles them into [`LogicalRecord`]s.
//! Grounded on `parseClusterChain`/`parseFAT1xRootDirEntries`/
//! `checkLongDirEntries` in `sort.c`: long fragments accumulate in
//! descending-ordinal order and are *prepended* to the in-progress name
//! (fragment N-1's text comes before fragment N's once both are
//! decoded), then checked against the short entry that terminates them.

use crate::bpb::BootSector;
use crate::decode::NameDecoder;
use crate::device::Device;
use crate::entry::{LongDirEntry, ShortDirEntry, ENTRY_SIZE, LONG_NAME_LEN_CAP};
use crate::error::{Error, Result};
use crate::record::LogicalRecord;

/// Where a directory's 32-byte slots live on disk.
pub enum DirSource {
    /// FAT32 root, or any non-root directory: an already-walked chain
    /// of data clusters.
    Chain { cluster_offsets: Vec<u64>, cluster_size: u32 },
    /// FAT12/16 fixed root region: one contiguous span.
    FixedRegion { offset: u64, entry_count: u32 },
}

impl DirSource {
    pub fn from_chain(boot: &BootSector, clusters: &[u32]) -> Self {
        let cluster_offsets = clusters.iter().map(|&c| boot.cluster_offset(c)).collect();
        DirSource::Chain {
            cluster_offsets,
            cluster_size: boot.cluster_size(),
        }
    }

    pub fn from_fixed_root(boot: &BootSector) -> Self {
        DirSource::FixedRegion {
            offset: boot.root_region_offset(),
            entry_count: boot.root_entry_count(),
        }
    }

    /// Byte offsets of every 32-byte slot in stream order.
    pub(crate) fn slot_offsets(&self) -> Vec<u64> {
        match self {
            DirSource::Chain { cluster_offsets, cluster_size } => {
                let per_cluster = *cluster_size as u64 / ENTRY_SIZE as u64;
                cluster_offsets
                    .iter()
                    .flat_map(|&base| (0..per_cluster).map(move |i| base + i * ENTRY_SIZE as u64))
                    .collect()
            }
            DirSource::FixedRegion { offset, entry_count } => {
                (0..*entry_count as u64).map(|i| offset + i * ENTRY_SIZE as u64).collect()
            }
        }
    }
}

/// Parses every logical record out of `source`, stopping at the first
/// end-of-directory marker (or the end of the source, for the fixed
/// root region, whichever comes first).
pub fn parse(device: &mut Device, source: &DirSource, decoder: &dyn NameDecoder) -> Result<Vec<LogicalRecord>> {
    let mut records = Vec::new();
    let mut pending_fragments: Vec<LongDirEntry> = Vec::new();
    let mut pending_name = String::new();

    for offset in source.slot_offsets() {
        let mut buf = [0u8; ENTRY_SIZE];
        device.read_at(offset, &mut buf)?;

        if buf[0] == 0x00 {
            break;
        }

        if is_long_fragment(&buf) {
            let fragment = LongDirEntry::from_bytes(buf);
            if !fragment.is_deleted() {
                let units = fragment.name_units();
                pending_name = format!("{}{}", decode_trimmed(decoder, &units), pending_name);
            }
            pending_fragments.push(fragment);
            continue;
        }

        let short = ShortDirEntry::from_bytes(buf);
        if !short.is_deleted() {
            check_long_fragments(&pending_fragments, &short)?;
        }
        records.push(LogicalRecord::new(short, std::mem::take(&mut pending_fragments), std::mem::take(&mut pending_name)));
    }

    if !pending_fragments.is_empty() {
        return Err(Error::InvalidFormat(
            "directory stream ends with orphan long-name fragments".into(),
        ));
    }

    Ok(records)
}

fn is_long_fragment(raw: &[u8; ENTRY_SIZE]) -> bool {
    LongDirEntry::from_bytes(*raw).is_long_name_fragment()
}

/// Decodes one fragment's 13 code units, trimming the padding that
/// follows a 0x0000 terminator (itself followed by 0xFFFF filler).
fn decode_trimmed(decoder: &dyn NameDecoder, units: &[u16; LONG_NAME_LEN_CAP]) -> String {
    let end = units.iter().position(|&u| u == 0x0000).unwrap_or(units.len());
    decoder.decode(&units[..end])
}

/// Validates ordinal descent, shared checksum, and terminal-fragment
/// placement for one logical record's accumulated fragments. Deleted
/// fragments (ordinal byte 0xE5) bypass these checks (spec.md §3).
fn check_long_fragments(fragments: &[LongDirEntry], short: &ShortDirEntry) -> Result<()> {
    if fragments.is_empty() {
        return Ok(());
    }

    let live: Vec<&LongDirEntry> = fragments.iter().filter(|f| !f.is_deleted()).collect();
    if live.is_empty() {
        return Ok(());
    }

    if !live[0].is_terminal() {
        return Err(Error::InvalidFormat(
            "long-name group is missing its terminal fragment".into(),
        ));
    }

    let checksum = short.checksum();
    let mut expected_seq = live[0].sequence_number();
    for fragment in &live {
        if fragment.sequence_number() != expected_seq {
            return Err(Error::InvalidFormat(format!(
                "long-name fragment ordinal {} is not contiguous (expected {})",
                fragment.sequence_number(),
                expected_seq
            )));
        }
        if fragment.checksum() != checksum {
            return Err(Error::InvalidFormat(
                "long-name fragment checksum does not match its short entry".into(),
            ));
        }
        expected_seq = expected_seq.saturating_sub(1);
    }

    if live.last().unwrap().sequence_number() != 1 {
        return Err(Error::InvalidFormat(
            "long-name group does not count down to fragment 1".into(),
        ));
    }

    Ok(())
}
