//! Character transcoding: UTF-8 and UTF-16BE (X.891 C.19, C.20).
//!
//! Input arrives either as `&str` (always valid) or as raw UTF-16 code
//! units, where surrogates have to be paired up by hand. Decoding is
//! table-driven via [`crate::decoder_tables::UTF8`], which also rejects
//! control characters not allowed in XML.

use crate::decoder_tables::{self, Table};
use crate::{Error, Result};

/// Character encoding scheme for literal strings and chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterEncodingScheme {
    #[default]
    Utf8,
    Utf16Be,
}

impl CharacterEncodingScheme {
    /// Appends `s` in this scheme.
    pub fn encode(self, s: &str, out: &mut Vec<u8>) {
        match self {
            Self::Utf8 => out.extend_from_slice(s.as_bytes()),
            Self::Utf16Be => encode_utf16be(s, out),
        }
    }

    /// Appends UTF-16 code units in this scheme.
    pub fn encode_units(self, units: &[u16], out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Utf8 => encode_utf8_from_utf16(units, out),
            Self::Utf16Be => {
                out.reserve(units.len() * 2);
                for &u in units {
                    out.extend_from_slice(&u.to_be_bytes());
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Appends `s` as UTF-16 big-endian code units.
pub fn encode_utf16be(s: &str, out: &mut Vec<u8>) {
    out.reserve(s.len() * 2);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
}

/// Appends UTF-16 code units as UTF-8, combining surrogate pairs.
///
/// A high surrogate not followed by a low one, or a lone low surrogate,
/// is an `UnterminatedSurrogate` error.
pub fn encode_utf8_from_utf16(units: &[u16], out: &mut Vec<u8>) -> Result<()> {
    out.reserve(units.len());
    let mut iter = units.iter().copied();
    while let Some(u) = iter.next() {
        let c = match u {
            0..=0x7F => {
                // ASCII Fast-Path
                out.push(u as u8);
                continue;
            }
            0xD800..=0xDBFF => {
                let low = iter
                    .next()
                    .filter(|l| (0xDC00..=0xDFFF).contains(l))
                    .ok_or(Error::UnterminatedSurrogate(u))?;
                let cp = 0x10000 + ((u32::from(u) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(cp).ok_or(Error::UnterminatedSurrogate(u))?
            }
            0xDC00..=0xDFFF => return Err(Error::UnterminatedSurrogate(u)),
            _ => char::from_u32(u32::from(u)).ok_or(Error::UnterminatedSurrogate(u))?,
        };
        let mut tmp = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
    }
    Ok(())
}

/// Number of code points in UTF-16 input (a surrogate pair counts once).
pub fn utf16_character_count(units: &[u16]) -> usize {
    units.iter().filter(|&&u| !(0xDC00..=0xDFFF).contains(&u)).count()
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes UTF-8, validating every sequence against the UTF-8 table.
pub fn decode_utf8(bytes: &[u8]) -> Result<String> {
    let mut s = String::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        let len = match decoder_tables::UTF8[b as usize] {
            decoder_tables::UTF8_ONE_BYTE => {
                s.push(b as char);
                pos += 1;
                continue;
            }
            decoder_tables::UTF8_TWO_BYTES => 2,
            decoder_tables::UTF8_THREE_BYTES => 3,
            decoder_tables::UTF8_FOUR_BYTES => 4,
            _ => return Err(Error::InvalidUtf8 { offset: pos }),
        };
        let seq = bytes
            .get(pos..pos + len)
            .ok_or(Error::InvalidUtf8 { offset: pos })?;
        let mut cp = u32::from(b) & (0x7F >> len);
        for &cont in &seq[1..] {
            if cont & 0xC0 != 0x80 {
                return Err(Error::InvalidUtf8 { offset: pos });
            }
            cp = (cp << 6) | u32::from(cont & 0x3F);
        }
        // Overlong-Sequenzen und Surrogate ausschliessen
        let min = match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x10000,
        };
        let c = char::from_u32(cp)
            .filter(|_| cp >= min)
            .ok_or(Error::InvalidUtf8 { offset: pos })?;
        s.push(c);
        pos += len;
    }
    Ok(s)
}

/// Decodes UTF-16 big-endian octets.
pub fn decode_utf16be(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::PrematureEndOfStream);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    char::decode_utf16(units.iter().copied())
        .map(|r| r.map_err(|e| Error::UnterminatedSurrogate(e.unpaired_surrogate())))
        .collect()
}

/// Checks that `s` is an NCName as far as the leading-octet table can tell.
///
/// Multi-octet characters are accepted as name characters.
pub fn is_ncname(s: &str) -> bool {
    let mut bytes = s.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    if Table::Utf8NcName.state(first) == decoder_tables::UTF8_NCNAME_NCNAME_CHAR
        || decoder_tables::is_sentinel(Table::Utf8NcName.state(first))
    {
        return false;
    }
    // Fortsetzungs-Octets (0x80..0xBF) sind im Table ILLEGAL, daher ueberspringen.
    bytes.all(|b| b >= 0x80 || !decoder_tables::is_sentinel(Table::Utf8NcName.state(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(s: &str) {
        let mut out = Vec::new();
        CharacterEncodingScheme::Utf8.encode(s, &mut out);
        assert_eq!(decode_utf8(&out).unwrap(), s, "utf-8 {s:?}");

        out.clear();
        CharacterEncodingScheme::Utf16Be.encode(s, &mut out);
        assert_eq!(decode_utf16be(&out).unwrap(), s, "utf-16 {s:?}");

        let units: Vec<u16> = s.encode_utf16().collect();
        out.clear();
        encode_utf8_from_utf16(&units, &mut out).unwrap();
        assert_eq!(out, s.as_bytes(), "utf-16 input {s:?}");
    }

    // --- Round-Trip ---

    #[test]
    fn round_trips_mixed_widths() {
        for s in [
            "",
            "plain ascii",
            "tab\tand\nnewline\r",
            "caf\u{e9} \u{fc}ber",
            "\u{20ac}\u{4e2d}\u{6587}",
            "\u{1F600}\u{1D11E}",
            "a\u{10FFFF}z",
            "\u{FFFD}\u{0800}\u{07FF}\u{0080}",
        ] {
            round_trip(s);
        }
    }

    #[test]
    fn round_trips_every_bmp_and_plane_boundary() {
        let mut s = String::new();
        for cp in (0x20u32..0xD800).chain(0xE000..0x10000).step_by(97).chain([0x10000, 0x1FFFF, 0x10FFFF]) {
            if let Some(c) = char::from_u32(cp) {
                s.push(c);
            }
        }
        round_trip(&s);
    }

    #[test]
    fn four_byte_characters_from_surrogate_pairs() {
        let mut out = Vec::new();
        encode_utf8_from_utf16(&[0xD83D, 0xDE00], &mut out).unwrap();
        assert_eq!(out, vec![0xF0, 0x9F, 0x98, 0x80]);
        assert_eq!(utf16_character_count(&[0xD83D, 0xDE00, 0x41]), 2);
    }

    // --- Fehlerfaelle ---

    #[test]
    fn lone_surrogates_are_rejected() {
        let mut out = Vec::new();
        assert_eq!(
            encode_utf8_from_utf16(&[0x41, 0xD800], &mut out),
            Err(Error::UnterminatedSurrogate(0xD800))
        );
        assert_eq!(
            encode_utf8_from_utf16(&[0xD800, 0x41], &mut out),
            Err(Error::UnterminatedSurrogate(0xD800))
        );
        assert_eq!(
            encode_utf8_from_utf16(&[0xDC00], &mut out),
            Err(Error::UnterminatedSurrogate(0xDC00))
        );
    }

    #[test]
    fn malformed_utf8_is_rejected() {
        assert_eq!(decode_utf8(&[0x41, 0xC0, 0x80]), Err(Error::InvalidUtf8 { offset: 1 }));
        assert_eq!(decode_utf8(&[0xE2, 0x82]), Err(Error::InvalidUtf8 { offset: 0 }));
        assert_eq!(decode_utf8(&[0xE2, 0x41, 0x41]), Err(Error::InvalidUtf8 { offset: 0 }));
        // Surrogat U+D800 als UTF-8
        assert_eq!(decode_utf8(&[0xED, 0xA0, 0x80]), Err(Error::InvalidUtf8 { offset: 0 }));
        // Overlong 3-Byte
        assert_eq!(decode_utf8(&[0xE0, 0x80, 0xAF]), Err(Error::InvalidUtf8 { offset: 0 }));
        // Steuerzeichen
        assert_eq!(decode_utf8(&[0x01]), Err(Error::InvalidUtf8 { offset: 0 }));
    }

    #[test]
    fn odd_utf16_length_is_premature_end() {
        assert_eq!(decode_utf16be(&[0x00]), Err(Error::PrematureEndOfStream));
    }

    #[test]
    fn utf16_units_pass_through_for_utf16_scheme() {
        let mut out = Vec::new();
        CharacterEncodingScheme::Utf16Be
            .encode_units(&[0x0041, 0xD83D, 0xDE00], &mut out)
            .unwrap();
        assert_eq!(out, vec![0x00, 0x41, 0xD8, 0x3D, 0xDE, 0x00]);
    }

    #[test]
    fn ncname_check() {
        assert!(is_ncname("a"));
        assert!(is_ncname("_x-1.2"));
        assert!(is_ncname("\u{e9}l\u{e9}ment"));
        assert!(!is_ncname(""));
        assert!(!is_ncname("1a"));
        assert!(!is_ncname("-a"));
        assert!(!is_ncname("p:a"));
        assert!(!is_ncname("a b"));
    }
}
