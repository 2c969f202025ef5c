//! Core library for `fatsort`: reorders directory entries in place on
//! a FAT12/16/32 file system without touching file contents or
//! cluster allocation.
//!
//! Module layout follows spec.md §2's component list, continuing the
//! teacher repo's (`fat32-rs`) boot-sector/FAT/entry split:
//!
//! - [`bpb`] — boot sector + FSInfo byte layout and geometry.
//! - [`device`] — device I/O, exclusive-open + mount check.
//! - [`volume`] — ties device + boot sector + decoder into one handle.
//! - [`fat`] — single-entry FAT access, bulk read/write/compare.
//! - [`chain`] — cluster chain walker.
//! - [`entry`] — packed short/long directory entry byte layout.
//! - [`record`] — logical record (short entry + long-name fragments).
//! - [`dirstream`] — parses a directory source into logical records.
//! - [`order`] — the comparator and random shuffle.
//! - [`writer`] — serializes records back, signal-masked and fsynced.
//! - [`filters`] — path-list / regex inclusion for the recursive driver.
//! - [`driver`] — recursive parse/order/write/descend.
//! - [`info`] — read-only FAT geometry/usage report.
//! - [`decode`] — UTF-16LE long-name decoding.
//! - [`error`] — the crate's error and result types.
//! - [`cli`] — command-line option surface (binary-facing).

pub mod bpb;
pub mod chain;
pub mod cli;
pub mod decode;
pub mod device;
pub mod dirstream;
pub mod driver;
pub mod entry;
pub mod error;
pub mod fat;
pub mod filters;
pub mod info;
pub mod order;
pub mod record;
pub mod volume;
pub mod writer;
