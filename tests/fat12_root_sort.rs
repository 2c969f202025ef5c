//! End-to-end tests against a small hand-built FAT12 image: the fixed
//! root region is sorted without touching the FAT, matching spec.md §8
//! scenarios A (case-insensitive ASCII) and B (natural order), plus the
//! FAT-invariance and directory-closure properties.

use std::io::Write as _;

use rand::rngs::StdRng;
use rand::SeedableRng;

use fatsort::device::OpenMode;
use fatsort::dirstream;
use fatsort::driver;
use fatsort::entry::{checksum_of, LongDirEntry, ATTR_ARCHIVE, LAST_LONG_ENTRY};
use fatsort::filters::Filters;
use fatsort::order::{DirBias, NameOrder, SortPolicy};
use fatsort::volume::Volume;

const TOTAL_SECTORS: u16 = 14;
const ROOT_OFFSET: usize = 1536;
const FAT_OFFSET: usize = 512;
const FAT_SIZE: usize = 512;

fn pad_short_name(stem: &str, ext: &str) -> [u8; 11] {
    let mut out = [b' '; 11];
    for (i, b) in stem.as_bytes().iter().take(8).enumerate() {
        out[i] = *b;
    }
    for (i, b) in ext.as_bytes().iter().take(3).enumerate() {
        out[8 + i] = *b;
    }
    out
}

fn short_entry_bytes(stem: &str, ext: &str, attr: u8) -> [u8; 32] {
    let mut raw = [0u8; 32];
    raw[0..11].copy_from_slice(&pad_short_name(stem, ext));
    raw[11] = attr;
    raw
}

fn long_name_fragments(name: &str, checksum: u8) -> Vec<[u8; 32]> {
    let units: Vec<u16> = name.encode_utf16().collect();
    let chunks: Vec<&[u16]> = units.chunks(13).collect();
    let total = chunks.len();

    let mut fragments = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let mut buf = [0u16; 13];
        buf[..chunk.len()].copy_from_slice(chunk);
        if chunk.len() < 13 {
            buf[chunk.len()] = 0x0000;
            for slot in buf.iter_mut().skip(chunk.len() + 1) {
                *slot = 0xFFFF;
            }
        }
        let seq = (i + 1) as u8;
        let ordinal = if i + 1 == total { seq | LAST_LONG_ENTRY } else { seq };
        fragments.push(*LongDirEntry::build(ordinal, &buf, checksum).as_bytes());
    }
    // On-disk order is descending ordinal (terminal fragment first).
    fragments.reverse();
    fragments
}

/// One logical record's on-disk bytes: long-name fragments (descending
/// ordinal) followed by the short entry.
fn build_record(stem: &str, ext: &str, display_name: &str, attr: u8) -> Vec<[u8; 32]> {
    let short = short_entry_bytes(stem, ext, attr);
    let checksum = checksum_of(&short[0..11]);
    let mut slots = long_name_fragments(display_name, checksum);
    slots.push(short);
    slots
}

fn build_fat12_image(records: &[Vec<[u8; 32]>]) -> Vec<u8> {
    let mut img = vec![0u8; TOTAL_SECTORS as usize * 512];

    img[0] = 0xEB;
    img[2] = 0x90;
    img[0x0B..0x0D].copy_from_slice(&512u16.to_le_bytes());
    img[0x0D] = 1; // sectors per cluster
    img[0x0E..0x10].copy_from_slice(&1u16.to_le_bytes()); // reserved sectors
    img[0x10] = 2; // number of FATs
    img[0x11..0x13].copy_from_slice(&16u16.to_le_bytes()); // root entry count
    img[0x13..0x15].copy_from_slice(&TOTAL_SECTORS.to_le_bytes());
    img[0x16..0x18].copy_from_slice(&1u16.to_le_bytes()); // FAT size (sectors)
    img[0x1FE..0x200].copy_from_slice(&0xAA55u16.to_le_bytes());

    let mut offset = ROOT_OFFSET;
    for record in records {
        for slot in record {
            img[offset..offset + 32].copy_from_slice(slot);
            offset += 32;
        }
    }
    img
}

fn write_image(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn names_in_order(volume: &mut Volume) -> Vec<String> {
    let source = volume.root_source().unwrap();
    let (device, _boot, decoder) = volume.parts();
    dirstream::parse(device, &source, decoder)
        .unwrap()
        .into_iter()
        .filter(|r| !r.is_deleted())
        .map(|r| r.display_name().to_string())
        .collect()
}

#[test]
fn scenario_a_case_insensitive_ascii_sort() {
    let image = build_fat12_image(&[
        build_record("BANANA", "TXT", "banana.txt", ATTR_ARCHIVE),
        build_record("APPLE", "TXT", "Apple.txt", ATTR_ARCHIVE),
        build_record("CHERRY", "TXT", "cherry.TXT", ATTR_ARCHIVE),
    ]);
    let file = write_image(&image);

    let mut volume = Volume::open(file.path(), OpenMode::ReadWrite).unwrap();
    assert!(volume.fats_match().unwrap());

    let policy = SortPolicy {
        name_order: NameOrder::Ascii,
        ignore_case: true,
        dir_bias: DirBias::Mixed,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut reports = Vec::new();
    let root = volume.root_source().unwrap();
    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &Filters::All,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )
        .unwrap();
    }

    assert_eq!(
        names_in_order(&mut volume),
        vec!["Apple.txt", "banana.txt", "cherry.TXT"]
    );
}

#[test]
fn scenario_b_natural_order() {
    let image = build_fat12_image(&[
        build_record("TRACK1", "MP3", "track1.mp3", ATTR_ARCHIVE),
        build_record("TRACK10", "MP3", "track10.mp3", ATTR_ARCHIVE),
        build_record("TRACK2", "MP3", "track2.mp3", ATTR_ARCHIVE),
    ]);
    let file = write_image(&image);

    let mut volume = Volume::open(file.path(), OpenMode::ReadWrite).unwrap();
    let policy = SortPolicy {
        name_order: NameOrder::Natural,
        dir_bias: DirBias::Mixed,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(2);
    let mut reports = Vec::new();
    let root = volume.root_source().unwrap();
    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &Filters::All,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )
        .unwrap();
    }

    assert_eq!(
        names_in_order(&mut volume),
        vec!["track1.mp3", "track2.mp3", "track10.mp3"]
    );
}

#[test]
fn fat_bytes_are_unchanged_after_sort() {
    let image = build_fat12_image(&[
        build_record("BANANA", "TXT", "banana.txt", ATTR_ARCHIVE),
        build_record("APPLE", "TXT", "Apple.txt", ATTR_ARCHIVE),
    ]);
    let file = write_image(&image);

    let mut volume = Volume::open(file.path(), OpenMode::ReadWrite).unwrap();
    let mut fat_before = [0u8; FAT_SIZE];
    volume.device().read_at(FAT_OFFSET as u64, &mut fat_before).unwrap();

    let policy = SortPolicy::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut reports = Vec::new();
    let root = volume.root_source().unwrap();
    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &Filters::All,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )
        .unwrap();
    }

    let mut fat_after = [0u8; FAT_SIZE];
    volume.device().read_at(FAT_OFFSET as u64, &mut fat_after).unwrap();
    assert_eq!(fat_before, fat_after);
}

#[test]
fn list_only_mode_never_writes() {
    let image = build_fat12_image(&[
        build_record("BANANA", "TXT", "banana.txt", ATTR_ARCHIVE),
        build_record("APPLE", "TXT", "Apple.txt", ATTR_ARCHIVE),
    ]);
    let file = write_image(&image);
    let original = std::fs::read(file.path()).unwrap();

    let mut volume = Volume::open(file.path(), OpenMode::ReadOnlyExclusive).unwrap();
    let policy = SortPolicy {
        list_only: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(4);
    let mut reports = Vec::new();
    let root = volume.root_source().unwrap();
    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &Filters::All,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )
        .unwrap();
    }

    assert!(!reports[0].rewritten);
    let after = std::fs::read(file.path()).unwrap();
    assert_eq!(original, after);
}

#[test]
fn checks_short_entry_unchanged_for_surviving_files() {
    let image = build_fat12_image(&[
        build_record("BANANA", "TXT", "banana.txt", ATTR_ARCHIVE),
        build_record("APPLE", "TXT", "Apple.txt", ATTR_ARCHIVE),
    ]);
    let file = write_image(&image);

    let mut volume = Volume::open(file.path(), OpenMode::ReadWrite).unwrap();
    let source_before = volume.root_source().unwrap();
    let before = {
        let (device, _boot, decoder) = volume.parts();
        dirstream::parse(device, &source_before, decoder).unwrap()
    };
    let apple_checksum_before = before
        .iter()
        .find(|r| r.display_name() == "Apple.txt")
        .map(|r| r.short.checksum())
        .unwrap();

    let policy = SortPolicy {
        name_order: NameOrder::Ascii,
        ignore_case: true,
        dir_bias: DirBias::Mixed,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let mut reports = Vec::new();
    let root = volume.root_source().unwrap();
    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &Filters::All,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )
        .unwrap();
    }

    let source_after = volume.root_source().unwrap();
    let (device, _boot, decoder) = volume.parts();
    let after = dirstream::parse(device, &source_after, decoder).unwrap();
    let apple_checksum_after = after
        .iter()
        .find(|r| r.display_name() == "Apple.txt")
        .map(|r| r.short.checksum())
        .unwrap();
    assert_eq!(apple_checksum_before, apple_checksum_after);
}
