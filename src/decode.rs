//! Long-name decoding
//!
//! spec.md §9 asks for an injected `decode_utf16le_to_locale` boundary
//! so platform character-set converters can stand in for the default.
//! The default implementation here uses `std::char::decode_utf16`
//! directly; a real transliterating converter (iconv `//TRANSLIT` in
//! the original) stays an external collaborator per spec.md §1 and can
//! be plugged in by implementing [`NameDecoder`].

/// Decodes a run of UTF-16LE code units (already reassembled from
/// long-name fragments) into a display string. Decode failures are
/// warnings, not errors (spec.md §7): the implementation substitutes
/// the Unicode replacement character and keeps going rather than
/// aborting the parse.
pub trait NameDecoder {
    fn decode(&self, units: &[u16]) -> String;
}

/// `std::char::decode_utf16` with lossy replacement on invalid
/// surrogate pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf16LossyDecoder;

impl NameDecoder for Utf16LossyDecoder {
    fn decode(&self, units: &[u16]) -> String {
        char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}
