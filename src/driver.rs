//! Recursive driver
//!
//! Walks a directory, orders its entries, writes them back if the
//! current path is selected by the active [`Filters`], then recurses
//! into every live subdirectory regardless (spec.md §4.7). Grounded on
//! `sortClusterChain`/`sortSubdirectories`/`sortFAT1xRootDirectory` in
//! `sort.c`.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::bpb::BootSector;
use crate::chain;
use crate::decode::NameDecoder;
use crate::device::Device;
use crate::dirstream::{self, DirSource};
use crate::error::Result;
use crate::filters::Filters;
use crate::order::{self, SortPolicy};
use crate::writer;

/// One directory's outcome, for the caller to report or tally.
pub struct VisitReport {
    pub path: PathBuf,
    pub entry_names: Vec<String>,
    pub rewritten: bool,
}

/// Parses, orders, conditionally rewrites, and recurses into `source`,
/// which is located at `path` in the volume's directory tree
/// ("/" for the root). Returns one report per visited directory, in
/// visitation order (the root first, then each subdirectory as it is
/// entered).
pub fn visit(
    device: &mut Device,
    boot: &BootSector,
    decoder: &dyn NameDecoder,
    policy: &SortPolicy,
    filters: &Filters,
    rng: &mut impl Rng,
    source: DirSource,
    path: &Path,
    reports: &mut Vec<VisitReport>,
) -> Result<()> {
    let mut records = dirstream::parse(device, &source, decoder)?;

    // The comparator's list-only/random short-circuit (rule 4) means
    // this sort is a no-op in those cases beyond the structural
    // placement of the volume label, ".", "..", and deleted entries —
    // it still always runs, matching the original's always-sorted-on-
    // insert parse list.
    order::sort_records(&mut records, policy);

    let selected = !policy.list_only && filters.matches(path);
    if selected {
        if policy.random {
            order::shuffle_tail(&mut records, rng);
        }
        writer::write_list(device, &source, &records)?;
    }

    reports.push(VisitReport {
        path: path.to_path_buf(),
        entry_names: records
            .iter()
            .filter(|r| !r.is_deleted())
            .map(|r| r.display_name().to_string())
            .collect(),
        rewritten: selected,
    });

    let children: Vec<(PathBuf, u32)> = records
        .iter()
        .filter(|r| r.is_live_subdirectory())
        .map(|r| (path.join(r.display_name()), r.short.first_cluster()))
        .collect();

    for (child_path, first_cluster) in children {
        let chain = chain::walk(device, boot, first_cluster)?;
        let child_source = DirSource::from_chain(boot, chain.clusters());
        visit(device, boot, decoder, policy, filters, rng, child_source, &child_path, reports)?;
    }

    Ok(())
}
