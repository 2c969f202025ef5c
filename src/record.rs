//! Logical directory record
//!
//! A short entry plus its (possibly empty) ordered long-name
//! fragments, bundled into the unit the ordering engine and writer
//! both operate on (spec.md §3 "Logical record").

use crate::entry::{LongDirEntry, ShortDirEntry};

#[derive(Clone)]
pub struct LogicalRecord {
    pub short: ShortDirEntry,
    /// Long-name fragments in their original on-disk order (descending
    /// ordinal, terminal fragment first).
    pub fragments: Vec<LongDirEntry>,
    /// Decoded long name, empty if this record has no long-name fragments.
    pub long_name: String,
    /// "NAME.EXT" decoded from the short entry.
    pub short_name: String,
}

impl LogicalRecord {
    pub fn new(short: ShortDirEntry, fragments: Vec<LongDirEntry>, long_name: String) -> Self {
        let short_name = short.decoded_name();
        Self {
            short,
            fragments,
            long_name,
            short_name,
        }
    }

    /// Number of 32-byte slots this record occupies when written back:
    /// one per fragment plus one for the short entry.
    pub fn slot_count(&self) -> usize {
        self.fragments.len() + 1
    }

    /// The name used for display and for comparison: the long name if
    /// present and nonempty, otherwise the short name (spec.md §4.5 rule 7).
    pub fn display_name(&self) -> &str {
        if self.long_name.is_empty() {
            &self.short_name
        } else {
            &self.long_name
        }
    }

    pub fn is_volume_label(&self) -> bool {
        self.short.is_volume_label()
    }

    pub fn is_dot(&self) -> bool {
        self.short.is_dot()
    }

    pub fn is_dotdot(&self) -> bool {
        self.short.is_dotdot()
    }

    pub fn is_deleted(&self) -> bool {
        self.short.is_deleted()
    }

    pub fn is_directory(&self) -> bool {
        self.short.is_directory()
    }

    /// Live subdirectory eligible for recursion: directory attribute
    /// set, not a volume label, not deleted, not "." or "..".
    pub fn is_live_subdirectory(&self) -> bool {
        self.is_directory()
            && !self.is_volume_label()
            && !self.is_deleted()
            && !self.is_dot()
            && !self.is_dotdot()
    }
}
