//! Ordering engine
//!
//! The comparator of spec.md §4.5: a fixed precedence of rules where the
//! first rule that decides wins. Grounded on `compareDirEntries` in
//! `sort.c`, generalized from its `switch` over global option variables
//! into an explicit [`SortPolicy`] passed by reference (spec.md §9,
//! "Global option bag").

use std::cmp::Ordering;

use rand::Rng;

use crate::record::LogicalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirBias {
    DirsFirst,
    FilesFirst,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrder {
    Ascii,
    Natural,
    Locale,
}

/// Immutable, passed-by-reference sort configuration (no hidden global
/// state, per spec.md §9).
#[derive(Debug, Clone)]
pub struct SortPolicy {
    pub list_only: bool,
    pub random: bool,
    pub reverse: bool,
    pub ignore_case: bool,
    pub by_mtime: bool,
    pub dir_bias: DirBias,
    pub name_order: NameOrder,
    pub ignore_prefixes: Vec<String>,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self {
            list_only: false,
            random: false,
            reverse: false,
            ignore_case: false,
            by_mtime: false,
            dir_bias: DirBias::DirsFirst,
            name_order: NameOrder::Ascii,
            ignore_prefixes: Vec::new(),
        }
    }
}

/// Orders `records` in place per `policy`. Applied unconditionally
/// during parsing in the original (`insertDirEntryList` sorts on
/// insert regardless of whether the directory will end up being
/// written): the list a directory's children are discovered through is
/// always in comparator order, independent of whether this particular
/// directory matches the active filter.
pub fn sort_records(records: &mut Vec<LogicalRecord>, policy: &SortPolicy) {
    records.sort_by(|a, b| compare(a, b, policy));
}

/// Fisher-Yates-shuffles the tail beyond the leading
/// volume-id/"."/".." prefix. The driver calls this only for a
/// directory that is both in random mode and actually selected for
/// rewrite (spec.md §4.7's filter only gates the write, but the
/// original only randomizes directories it is about to write).
pub fn shuffle_tail(records: &mut [LogicalRecord], rng: &mut impl Rng) {
    let skip = skip_prefix_len(records);
    shuffle(records, skip, rng);
}

/// Convenience used by tests and by callers that always want both
/// steps (e.g. list-only mode, where shuffling is a no-op because rule
/// 4 never lets random mode reorder names there anyway).
pub fn apply_order(records: &mut Vec<LogicalRecord>, policy: &SortPolicy, rng: &mut impl Rng) {
    sort_records(records, policy);
    if policy.random {
        shuffle_tail(records, rng);
    }
}

fn compare(a: &LogicalRecord, b: &LogicalRecord, policy: &SortPolicy) -> Ordering {
    // Rule 1: volume label sorts first.
    match (a.is_volume_label(), b.is_volume_label()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    // Rule 2: "." then ".." sort before everything else remaining.
    let dot_rank = |r: &LogicalRecord| -> u8 {
        if r.is_dot() {
            0
        } else if r.is_dotdot() {
            1
        } else {
            2
        }
    };
    let (ra, rb) = (dot_rank(a), dot_rank(b));
    if ra != rb && (ra < 2 || rb < 2) {
        return ra.cmp(&rb);
    }

    // Rule 3: a deleted entry sorts last.
    match (a.is_deleted(), b.is_deleted()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    // Rule 4: list-only / random mode stop here; preserve insertion order.
    if policy.list_only || policy.random {
        return Ordering::Equal;
    }

    // Rule 5: directory-vs-file bias. Not reversed: `-r` flips name/mtime
    // order but keeps the dir/file grouping, matching entrylist.c's
    // `compareDirEntries` where the bias check returns immediately and
    // `revertSorting()` is only applied to the name/time branches below.
    if let Some(order) = dir_bias_cmp(a, b, policy.dir_bias) {
        return order;
    }

    // Rule 6: modification-time mode.
    if policy.by_mtime {
        let order = a.short.mtime_key().cmp(&b.short.mtime_key());
        return maybe_reverse(order, policy.reverse);
    }

    // Rule 7: display-name comparison.
    let order = compare_names(a.display_name(), b.display_name(), policy);
    maybe_reverse(order, policy.reverse)
}

fn dir_bias_cmp(a: &LogicalRecord, b: &LogicalRecord, bias: DirBias) -> Option<Ordering> {
    if bias == DirBias::Mixed {
        return None;
    }
    match (a.is_directory(), b.is_directory()) {
        (true, false) => Some(if bias == DirBias::DirsFirst {
            Ordering::Less
        } else {
            Ordering::Greater
        }),
        (false, true) => Some(if bias == DirBias::DirsFirst {
            Ordering::Greater
        } else {
            Ordering::Less
        }),
        _ => None,
    }
}

fn maybe_reverse(order: Ordering, reverse: bool) -> Ordering {
    if reverse {
        order.reverse()
    } else {
        order
    }
}

fn compare_names(a: &str, b: &str, policy: &SortPolicy) -> Ordering {
    let a = strip_ignored_prefix(a, &policy.ignore_prefixes);
    let b = strip_ignored_prefix(b, &policy.ignore_prefixes);

    match policy.name_order {
        NameOrder::Ascii => compare_folded(a, b, policy.ignore_case, |s| s.to_string()),
        NameOrder::Natural => natural_cmp(a, b, policy.ignore_case),
        NameOrder::Locale => compare_folded(a, b, policy.ignore_case, collation_key),
    }
}

fn compare_folded(a: &str, b: &str, ignore_case: bool, transform: impl Fn(&str) -> String) -> Ordering {
    let (a, b) = if ignore_case {
        (a.to_lowercase(), b.to_lowercase())
    } else {
        (a.to_string(), b.to_string())
    };
    transform(&a).as_bytes().cmp(transform(&b).as_bytes())
}

/// Case-insensitive, character-boundary-safe leading-token strip. The
/// first prefix in `prefixes` that matches the start of `name` (ASCII
/// case-insensitively) is removed.
fn strip_ignored_prefix<'a>(name: &'a str, prefixes: &[String]) -> &'a str {
    for prefix in prefixes {
        let mut chars = name.char_indices();
        let mut end_byte = 0;
        let mut matched = true;
        for pc in prefix.chars() {
            match chars.next() {
                Some((idx, nc)) if nc.to_ascii_lowercase() == pc.to_ascii_lowercase() => {
                    end_byte = idx + nc.len_utf8();
                }
                _ => {
                    matched = false;
                    break;
                }
            }
        }
        if matched {
            return &name[end_byte..];
        }
    }
    name
}

/// Numeric runs compare as numbers, other runs lexicographically
/// (spec.md §4.5 rule 7).
fn natural_cmp(a: &str, b: &str, ignore_case: bool) -> Ordering {
    let (a_owned, b_owned);
    let (a, b): (&str, &str) = if ignore_case {
        a_owned = a.to_lowercase();
        b_owned = b.to_lowercase();
        (&a_owned, &b_owned)
    } else {
        (a, b)
    };

    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let na = take_number(&mut ai);
                    let nb = take_number(&mut bi);
                    match na.cmp(&nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    match ca.cmp(&cb) {
                        Ordering::Equal => {
                            ai.next();
                            bi.next();
                            continue;
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(it: &mut std::iter::Peekable<std::str::Chars>) -> u128 {
    let mut n: u128 = 0;
    while let Some(&c) = it.peek() {
        if let Some(d) = c.to_digit(10) {
            n = n.saturating_mul(10).saturating_add(d as u128);
            it.next();
        } else {
            break;
        }
    }
    n
}

/// Approximates locale collation without a full ICU binding (no crate
/// in this corpus reaches for one; see DESIGN.md): fold common Latin-1
/// diacritics to their base letter so e.g. "Ångström" sorts next to
/// "Angus" under byte order, rather than after every ASCII name; and
/// drop punctuation so it is ignorable the way `strcoll`'s primary
/// collation weight treats it in most locales (scenario: "A-ha" keys as
/// "aha", so it sorts next to "ABBA" rather than before it on the bare
/// byte value of '-').
fn collation_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .map(strip_diacritic)
        .collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'À'..='Å' | 'à'..='å' => if c.is_uppercase() { 'A' } else { 'a' },
        'Ç' | 'ç' => if c.is_uppercase() { 'C' } else { 'c' },
        'È'..='Ë' | 'è'..='ë' => if c.is_uppercase() { 'E' } else { 'e' },
        'Ì'..='Ï' | 'ì'..='ï' => if c.is_uppercase() { 'I' } else { 'i' },
        'Ñ' | 'ñ' => if c.is_uppercase() { 'N' } else { 'n' },
        'Ò'..='Ö' | 'ò'..='ö' | 'Ø' | 'ø' => if c.is_uppercase() { 'O' } else { 'o' },
        'Ù'..='Ü' | 'ù'..='ü' => if c.is_uppercase() { 'U' } else { 'u' },
        'Ý' | 'ý' | 'ÿ' => if c.is_uppercase() { 'Y' } else { 'y' },
        other => other,
    }
}

fn skip_prefix_len(records: &[LogicalRecord]) -> usize {
    let mut n = 0;
    for record in records {
        if record.is_volume_label() || record.is_dot() || record.is_dotdot() {
            n += 1;
        } else {
            break;
        }
    }
    n
}

/// Fisher-Yates over the tail `records[skip..]`: for each position from
/// the first shufflable slot onward, pick a uniform index in the
/// remaining tail and swap it forward (spec.md §4.5).
fn shuffle(records: &mut [LogicalRecord], skip: usize, rng: &mut impl Rng) {
    let len = records.len();
    if skip >= len {
        return;
    }
    for i in skip..len {
        let j = rng.gen_range(i..len);
        records.swap(i, j);
    }
}
