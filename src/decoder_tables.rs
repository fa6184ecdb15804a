//! Decode dispatch tables (X.891 clause C).
//!
//! Every table maps the leading octet of a token to a decode state. The
//! tables are built at compile time from sparse `(inclusive_end, state)`
//! range lists by [`build`]; a range list that does not cover `0..=255` in
//! strictly increasing order fails const evaluation.
//!
//! Reserved octets map to [`ILLEGAL`], obsolete UTF-8 lead octets to
//! [`UNSUPPORTED`]. Both lie outside the range of real states, so a decoder
//! can branch on [`is_sentinel`] without a separate bounds check.

use crate::{Error, Result};

// ============================================================================
// Sentinels
// ============================================================================

/// Reserved octet value.
pub const ILLEGAL: u8 = 255;
/// Well-formed but not supported by this implementation (five- and six-octet
/// UTF-8 lead octets, 0xF8..=0xFD).
pub const UNSUPPORTED: u8 = 254;

#[inline]
pub const fn is_sentinel(state: u8) -> bool {
    state >= UNSUPPORTED
}

// ============================================================================
// States: document and element children (DII, EII)
// ============================================================================

pub const EII_NO_AIIS_INDEX_SMALL: u8 = 0;
pub const EII_AIIS_INDEX_SMALL: u8 = 1;
pub const EII_INDEX_MEDIUM: u8 = 2;
pub const EII_INDEX_LARGE: u8 = 3;
pub const EII_NAMESPACES: u8 = 4;
pub const EII_LITERAL: u8 = 5;

pub const CII_UTF8_SMALL_LENGTH: u8 = 6;
pub const CII_UTF8_MEDIUM_LENGTH: u8 = 7;
pub const CII_UTF8_LARGE_LENGTH: u8 = 8;
pub const CII_UTF16_SMALL_LENGTH: u8 = 9;
pub const CII_UTF16_MEDIUM_LENGTH: u8 = 10;
pub const CII_UTF16_LARGE_LENGTH: u8 = 11;
pub const CII_RA: u8 = 12;
pub const CII_EA: u8 = 13;
pub const CII_INDEX_SMALL: u8 = 14;
pub const CII_INDEX_MEDIUM: u8 = 15;
pub const CII_INDEX_LARGE: u8 = 16;
pub const CII_INDEX_LARGE_LARGE: u8 = 17;

pub const COMMENT_II: u8 = 18;
pub const PROCESSING_INSTRUCTION_II: u8 = 19;
pub const DOCUMENT_TYPE_DECLARATION_II: u8 = 20;
pub const UNEXPANDED_ENTITY_REFERENCE_II: u8 = 21;
pub const TERMINATOR_SINGLE: u8 = 22;
pub const TERMINATOR_DOUBLE: u8 = 23;

// ============================================================================
// States: attributes (AII)
// ============================================================================

pub const AII_INDEX_SMALL: u8 = 0;
pub const AII_INDEX_MEDIUM: u8 = 1;
pub const AII_INDEX_LARGE: u8 = 2;
pub const AII_LITERAL: u8 = 3;
pub const AII_TERMINATOR_SINGLE: u8 = 4;
pub const AII_TERMINATOR_DOUBLE: u8 = 5;

// ============================================================================
// States: non identifying strings
// ============================================================================

pub const NISTRING_UTF8_SMALL_LENGTH: u8 = 0;
pub const NISTRING_UTF8_MEDIUM_LENGTH: u8 = 1;
pub const NISTRING_UTF8_LARGE_LENGTH: u8 = 2;
pub const NISTRING_UTF16_SMALL_LENGTH: u8 = 3;
pub const NISTRING_UTF16_MEDIUM_LENGTH: u8 = 4;
pub const NISTRING_UTF16_LARGE_LENGTH: u8 = 5;
pub const NISTRING_RA: u8 = 6;
pub const NISTRING_EA: u8 = 7;
pub const NISTRING_INDEX_SMALL: u8 = 8;
pub const NISTRING_INDEX_MEDIUM: u8 = 9;
pub const NISTRING_INDEX_LARGE: u8 = 10;
pub const NISTRING_EMPTY: u8 = 11;

// ============================================================================
// States: identifying strings
// ============================================================================

pub const ISTRING_SMALL_LENGTH: u8 = 0;
pub const ISTRING_MEDIUM_LENGTH: u8 = 1;
pub const ISTRING_LARGE_LENGTH: u8 = 2;
pub const ISTRING_INDEX_SMALL: u8 = 3;
pub const ISTRING_INDEX_MEDIUM: u8 = 4;
pub const ISTRING_INDEX_LARGE: u8 = 5;

/// Literal of length 3: a candidate for `xml`.
pub const ISTRING_PREFIX_NAMESPACE_LENGTH_3: u8 = 6;
/// Literal of length 5: a candidate for `xmlns`.
pub const ISTRING_PREFIX_NAMESPACE_LENGTH_5: u8 = 7;
/// Literal of length 29: a candidate for the xmlns namespace name.
pub const ISTRING_PREFIX_NAMESPACE_LENGTH_29: u8 = 8;
/// Literal of length 36: a candidate for the xml namespace name.
pub const ISTRING_PREFIX_NAMESPACE_LENGTH_36: u8 = 9;
/// Index 0: the built-in `xml` prefix or namespace name.
pub const ISTRING_PREFIX_NAMESPACE_INDEX_ZERO: u8 = 10;

// ============================================================================
// States: UTF-8 classification
// ============================================================================

pub const UTF8_NCNAME_NCNAME: u8 = 0;
pub const UTF8_NCNAME_NCNAME_CHAR: u8 = 1;
pub const UTF8_ONE_BYTE: u8 = 1;
pub const UTF8_TWO_BYTES: u8 = 2;
pub const UTF8_THREE_BYTES: u8 = 3;
pub const UTF8_FOUR_BYTES: u8 = 4;

// ============================================================================
// Construction
// ============================================================================

/// Fills a 256-entry table from `(inclusive_end, state)` ranges.
///
/// Each range covers the octets from the previous end + 1 through its own
/// end. Const evaluation fails if the ends are not strictly increasing or
/// the last end is not `0xFF`.
pub const fn build(ranges: &[(u8, u8)]) -> [u8; 256] {
    let mut table = [ILLEGAL; 256];
    let mut next = 0usize;
    let mut i = 0;
    while i < ranges.len() {
        let (end, state) = ranges[i];
        assert!(end as usize >= next, "range ends must be strictly increasing");
        while next <= end as usize {
            table[next] = state;
            next += 1;
        }
        i += 1;
    }
    assert!(next == 256, "ranges must cover 0x00..=0xFF");
    table
}

/// Checks a range list without building it; returns the first problem.
pub fn validate_ranges(ranges: &[(u8, u8)]) -> core::result::Result<(), String> {
    let mut next = 0usize;
    for (i, &(end, _)) in ranges.iter().enumerate() {
        if (end as usize) < next {
            return Err(format!("range {i} ends at 0x{end:02X}, expected at least 0x{next:02X}"));
        }
        next = end as usize + 1;
    }
    if next != 256 {
        return Err(format!("ranges end at 0x{:02X}, expected 0xFF", next.saturating_sub(1)));
    }
    Ok(())
}

// ============================================================================
// Range lists
// ============================================================================

/// Children of the document information item.
pub const DII_RANGES: &[(u8, u8)] = &[
    // Element, keine Attribute
    (0x1F, EII_NO_AIIS_INDEX_SMALL),
    (0x27, EII_INDEX_MEDIUM),
    (0x30, EII_INDEX_LARGE),
    (0x37, ILLEGAL),
    (0x38, EII_NAMESPACES),
    (0x3B, ILLEGAL),
    (0x3D, EII_LITERAL),
    (0x3E, ILLEGAL),
    (0x3F, EII_LITERAL),
    // Element mit Attributen
    (0x5F, EII_AIIS_INDEX_SMALL),
    (0x67, EII_INDEX_MEDIUM),
    (0x70, EII_INDEX_LARGE),
    (0x77, ILLEGAL),
    (0x78, EII_NAMESPACES),
    (0x7B, ILLEGAL),
    (0x7D, EII_LITERAL),
    (0x7E, ILLEGAL),
    (0x7F, EII_LITERAL),
    (0xC3, ILLEGAL),
    (0xC7, DOCUMENT_TYPE_DECLARATION_II),
    (0xE0, ILLEGAL),
    (0xE1, PROCESSING_INSTRUCTION_II),
    (0xE2, COMMENT_II),
    (0xEF, ILLEGAL),
    (0xF0, TERMINATOR_SINGLE),
    (0xFE, ILLEGAL),
    (0xFF, TERMINATOR_DOUBLE),
];

/// Children of an element information item.
pub const EII_RANGES: &[(u8, u8)] = &[
    (0x1F, EII_NO_AIIS_INDEX_SMALL),
    (0x27, EII_INDEX_MEDIUM),
    (0x30, EII_INDEX_LARGE),
    (0x37, ILLEGAL),
    (0x38, EII_NAMESPACES),
    (0x3B, ILLEGAL),
    (0x3D, EII_LITERAL),
    (0x3E, ILLEGAL),
    (0x3F, EII_LITERAL),
    (0x5F, EII_AIIS_INDEX_SMALL),
    (0x67, EII_INDEX_MEDIUM),
    (0x70, EII_INDEX_LARGE),
    (0x77, ILLEGAL),
    (0x78, EII_NAMESPACES),
    (0x7B, ILLEGAL),
    (0x7D, EII_LITERAL),
    (0x7E, ILLEGAL),
    (0x7F, EII_LITERAL),
    // Character chunks, ohne add-to-table
    (0x81, CII_UTF8_SMALL_LENGTH),
    (0x82, CII_UTF8_MEDIUM_LENGTH),
    (0x83, CII_UTF8_LARGE_LENGTH),
    (0x85, CII_UTF16_SMALL_LENGTH),
    (0x86, CII_UTF16_MEDIUM_LENGTH),
    (0x87, CII_UTF16_LARGE_LENGTH),
    (0x8B, CII_RA),
    (0x8F, CII_EA),
    // mit add-to-table
    (0x91, CII_UTF8_SMALL_LENGTH),
    (0x92, CII_UTF8_MEDIUM_LENGTH),
    (0x93, CII_UTF8_LARGE_LENGTH),
    (0x95, CII_UTF16_SMALL_LENGTH),
    (0x96, CII_UTF16_MEDIUM_LENGTH),
    (0x97, CII_UTF16_LARGE_LENGTH),
    (0x9B, CII_RA),
    (0x9F, CII_EA),
    // Index-Form
    (0xAF, CII_INDEX_SMALL),
    (0xB3, CII_INDEX_MEDIUM),
    (0xB7, CII_INDEX_LARGE),
    (0xB8, CII_INDEX_LARGE_LARGE),
    (0xC7, ILLEGAL),
    (0xCB, UNEXPANDED_ENTITY_REFERENCE_II),
    (0xE0, ILLEGAL),
    (0xE1, PROCESSING_INSTRUCTION_II),
    (0xE2, COMMENT_II),
    (0xEF, ILLEGAL),
    (0xF0, TERMINATOR_SINGLE),
    (0xFE, ILLEGAL),
    (0xFF, TERMINATOR_DOUBLE),
];

/// Attribute list entries.
pub const AII_RANGES: &[(u8, u8)] = &[
    (0x3F, AII_INDEX_SMALL),
    (0x5F, AII_INDEX_MEDIUM),
    (0x6F, AII_INDEX_LARGE),
    (0x77, ILLEGAL),
    (0x79, AII_LITERAL),
    (0x7A, ILLEGAL),
    (0x7B, AII_LITERAL),
    (0xEF, ILLEGAL),
    (0xF0, AII_TERMINATOR_SINGLE),
    (0xFE, ILLEGAL),
    (0xFF, AII_TERMINATOR_DOUBLE),
];

/// Non identifying strings on the first bit.
pub const NISTRING_RANGES: &[(u8, u8)] = &[
    (0x07, NISTRING_UTF8_SMALL_LENGTH),
    (0x08, NISTRING_UTF8_MEDIUM_LENGTH),
    (0x0B, ILLEGAL),
    (0x0C, NISTRING_UTF8_LARGE_LENGTH),
    (0x0F, ILLEGAL),
    (0x17, NISTRING_UTF16_SMALL_LENGTH),
    (0x18, NISTRING_UTF16_MEDIUM_LENGTH),
    (0x1B, ILLEGAL),
    (0x1C, NISTRING_UTF16_LARGE_LENGTH),
    (0x1F, ILLEGAL),
    (0x2F, NISTRING_RA),
    (0x3F, NISTRING_EA),
    // add-to-table
    (0x47, NISTRING_UTF8_SMALL_LENGTH),
    (0x48, NISTRING_UTF8_MEDIUM_LENGTH),
    (0x4B, ILLEGAL),
    (0x4C, NISTRING_UTF8_LARGE_LENGTH),
    (0x4F, ILLEGAL),
    (0x57, NISTRING_UTF16_SMALL_LENGTH),
    (0x58, NISTRING_UTF16_MEDIUM_LENGTH),
    (0x5B, ILLEGAL),
    (0x5C, NISTRING_UTF16_LARGE_LENGTH),
    (0x5F, ILLEGAL),
    (0x6F, NISTRING_RA),
    (0x7F, NISTRING_EA),
    (0xBF, NISTRING_INDEX_SMALL),
    (0xDF, NISTRING_INDEX_MEDIUM),
    (0xEF, NISTRING_INDEX_LARGE),
    (0xFE, ILLEGAL),
    (0xFF, NISTRING_EMPTY),
];

/// Identifying strings (local names, other NCNames, other URIs).
pub const ISTRING_RANGES: &[(u8, u8)] = &[
    (0x3F, ISTRING_SMALL_LENGTH),
    (0x40, ISTRING_MEDIUM_LENGTH),
    (0x5F, ILLEGAL),
    (0x60, ISTRING_LARGE_LENGTH),
    (0x7F, ILLEGAL),
    (0xBF, ISTRING_INDEX_SMALL),
    (0xDF, ISTRING_INDEX_MEDIUM),
    (0xEF, ISTRING_INDEX_LARGE),
    (0xFF, ILLEGAL),
];

/// Identifying strings for prefixes and namespace names, with the well-known lengths split out.
pub const ISTRING_PREFIX_NAMESPACE_RANGES: &[(u8, u8)] = &[
    (0x01, ISTRING_SMALL_LENGTH),
    (0x02, ISTRING_PREFIX_NAMESPACE_LENGTH_3),
    (0x03, ISTRING_SMALL_LENGTH),
    (0x04, ISTRING_PREFIX_NAMESPACE_LENGTH_5),
    (0x1B, ISTRING_SMALL_LENGTH),
    (0x1C, ISTRING_PREFIX_NAMESPACE_LENGTH_29),
    (0x22, ISTRING_SMALL_LENGTH),
    (0x23, ISTRING_PREFIX_NAMESPACE_LENGTH_36),
    (0x3F, ISTRING_SMALL_LENGTH),
    (0x40, ISTRING_MEDIUM_LENGTH),
    (0x5F, ILLEGAL),
    (0x60, ISTRING_LARGE_LENGTH),
    (0x7F, ILLEGAL),
    (0x80, ISTRING_PREFIX_NAMESPACE_INDEX_ZERO),
    (0xBF, ISTRING_INDEX_SMALL),
    (0xDF, ISTRING_INDEX_MEDIUM),
    (0xEF, ISTRING_INDEX_LARGE),
    (0xFF, ILLEGAL),
];

/// Leading UTF-8 octet: sequence length, XML-illegal control characters rejected.
pub const UTF8_RANGES: &[(u8, u8)] = &[
    (0x08, ILLEGAL),
    (0x0A, UTF8_ONE_BYTE),
    (0x0C, ILLEGAL),
    (0x0D, UTF8_ONE_BYTE),
    (0x1F, ILLEGAL),
    (0x7F, UTF8_ONE_BYTE),
    (0xC1, ILLEGAL),
    (0xDF, UTF8_TWO_BYTES),
    (0xEF, UTF8_THREE_BYTES),
    (0xF7, UTF8_FOUR_BYTES),
    (0xFD, UNSUPPORTED),
    (0xFF, ILLEGAL),
];

/// Leading UTF-8 octet of an NCName: ASCII name start / name characters split out.
pub const UTF8_NCNAME_RANGES: &[(u8, u8)] = &[
    (0x2C, ILLEGAL),
    (0x2E, UTF8_NCNAME_NCNAME_CHAR),
    (0x2F, ILLEGAL),
    (0x39, UTF8_NCNAME_NCNAME_CHAR),
    (0x40, ILLEGAL),
    (0x5A, UTF8_NCNAME_NCNAME),
    (0x5E, ILLEGAL),
    (0x5F, UTF8_NCNAME_NCNAME),
    (0x60, ILLEGAL),
    (0x7A, UTF8_NCNAME_NCNAME),
    (0xC1, ILLEGAL),
    (0xDF, UTF8_TWO_BYTES),
    (0xEF, UTF8_THREE_BYTES),
    (0xF7, UTF8_FOUR_BYTES),
    (0xFD, UNSUPPORTED),
    (0xFF, ILLEGAL),
];

// ============================================================================
// Tables
// ============================================================================

pub static DII: [u8; 256] = build(DII_RANGES);
pub static EII: [u8; 256] = build(EII_RANGES);
pub static AII: [u8; 256] = build(AII_RANGES);
pub static NISTRING: [u8; 256] = build(NISTRING_RANGES);
pub static ISTRING: [u8; 256] = build(ISTRING_RANGES);
pub static ISTRING_PREFIX_NAMESPACE: [u8; 256] = build(ISTRING_PREFIX_NAMESPACE_RANGES);
pub static UTF8: [u8; 256] = build(UTF8_RANGES);
pub static UTF8_NCNAME: [u8; 256] = build(UTF8_NCNAME_RANGES);

/// Selector over the dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Dii,
    Eii,
    Aii,
    NiString,
    IString,
    IStringPrefixNamespace,
    Utf8,
    Utf8NcName,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Dii,
        Table::Eii,
        Table::Aii,
        Table::NiString,
        Table::IString,
        Table::IStringPrefixNamespace,
        Table::Utf8,
        Table::Utf8NcName,
    ];

    pub fn entries(self) -> &'static [u8; 256] {
        match self {
            Table::Dii => &DII,
            Table::Eii => &EII,
            Table::Aii => &AII,
            Table::NiString => &NISTRING,
            Table::IString => &ISTRING,
            Table::IStringPrefixNamespace => &ISTRING_PREFIX_NAMESPACE,
            Table::Utf8 => &UTF8,
            Table::Utf8NcName => &UTF8_NCNAME,
        }
    }

    pub fn ranges(self) -> &'static [(u8, u8)] {
        match self {
            Table::Dii => DII_RANGES,
            Table::Eii => EII_RANGES,
            Table::Aii => AII_RANGES,
            Table::NiString => NISTRING_RANGES,
            Table::IString => ISTRING_RANGES,
            Table::IStringPrefixNamespace => ISTRING_PREFIX_NAMESPACE_RANGES,
            Table::Utf8 => UTF8_RANGES,
            Table::Utf8NcName => UTF8_NCNAME_RANGES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Table::Dii => "DII",
            Table::Eii => "EII",
            Table::Aii => "AII",
            Table::NiString => "NISTRING",
            Table::IString => "ISTRING",
            Table::IStringPrefixNamespace => "ISTRING_PREFIX_NAMESPACE",
            Table::Utf8 => "UTF8",
            Table::Utf8NcName => "UTF8_NCNAME",
        }
    }

    /// Raw state for `octet`, sentinels included.
    #[inline]
    pub fn state(self, octet: u8) -> u8 {
        self.entries()[octet as usize]
    }

    /// State for `octet`; sentinels become `IllegalState`.
    #[inline]
    pub fn classify(self, octet: u8) -> Result<u8> {
        let state = self.state(octet);
        if is_sentinel(state) {
            return Err(Error::IllegalState {
                table: self.name(),
                octet,
            });
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Referenz-Lookup direkt ueber die Range-Liste.
    fn lookup(ranges: &[(u8, u8)], octet: u8) -> u8 {
        ranges
            .iter()
            .find(|&&(end, _)| octet <= end)
            .map(|&(_, state)| state)
            .unwrap()
    }

    #[test]
    fn all_range_lists_are_total_and_ordered() {
        for table in Table::ALL {
            assert_eq!(validate_ranges(table.ranges()), Ok(()), "{}", table.name());
        }
    }

    #[test]
    fn every_entry_matches_its_range() {
        for table in Table::ALL {
            let entries = table.entries();
            for octet in 0..=255u8 {
                assert_eq!(
                    entries[octet as usize],
                    lookup(table.ranges(), octet),
                    "{} at 0x{octet:02X}",
                    table.name()
                );
            }
        }
    }

    #[test]
    fn build_is_idempotent() {
        for table in Table::ALL {
            assert_eq!(&build(table.ranges()), table.entries(), "{}", table.name());
            assert_eq!(build(table.ranges()), build(table.ranges()));
        }
    }

    #[test]
    fn validate_reports_gaps_and_disorder() {
        assert!(validate_ranges(&[(0x10, 0), (0x0F, 1), (0xFF, 2)]).is_err());
        assert!(validate_ranges(&[(0x10, 0), (0xFE, 1)]).is_err());
        assert!(validate_ranges(&[]).is_err());
        assert!(validate_ranges(&[(0xFF, 3)]).is_ok());
    }

    #[test]
    fn sentinels_are_outside_real_states() {
        for table in Table::ALL {
            for &state in table.entries() {
                assert!(state < 24 || is_sentinel(state), "{} state {state}", table.name());
            }
        }
        assert!(is_sentinel(ILLEGAL));
        assert!(is_sentinel(UNSUPPORTED));
        assert!(!is_sentinel(TERMINATOR_DOUBLE));
    }

    #[test]
    fn obsolete_utf8_lead_octets_are_unsupported() {
        for table in [Table::Utf8, Table::Utf8NcName] {
            for octet in 0xF8..=0xFD {
                assert_eq!(table.state(octet), UNSUPPORTED, "{} {octet:#04X}", table.name());
            }
            assert_eq!(table.state(0xFE), ILLEGAL);
            assert_eq!(table.state(0xFF), ILLEGAL);
            assert!(matches!(
                table.classify(0xFC),
                Err(Error::IllegalState { octet: 0xFC, .. })
            ));
        }
    }

    // --- Einzelwerte gegen die Wire-Konstanten ---

    #[test]
    fn element_octets_classify() {
        use crate::constants::*;
        assert_eq!(Table::Dii.classify(ELEMENT).unwrap(), EII_NO_AIIS_INDEX_SMALL);
        assert_eq!(Table::Dii.classify(ELEMENT | ELEMENT_ATTRIBUTE_FLAG).unwrap(), EII_AIIS_INDEX_SMALL);
        assert_eq!(Table::Eii.classify(ELEMENT_NAMESPACES_FLAG).unwrap(), EII_NAMESPACES);
        assert_eq!(Table::Eii.classify(ELEMENT_NAMESPACES_FLAG | ELEMENT_ATTRIBUTE_FLAG).unwrap(), EII_NAMESPACES);
        assert_eq!(Table::Eii.classify(ELEMENT_LITERAL_QNAME_FLAG | 0x03).unwrap(), EII_LITERAL);
        assert!(Table::Eii.classify(ELEMENT_LITERAL_QNAME_FLAG | LITERAL_QNAME_PREFIX_FLAG).is_err());
        assert_eq!(Table::Dii.classify(TERMINATOR).unwrap(), TERMINATOR_SINGLE);
        assert_eq!(Table::Dii.classify(DOUBLE_TERMINATOR).unwrap(), TERMINATOR_DOUBLE);
        assert_eq!(Table::Dii.classify(COMMENT).unwrap(), COMMENT_II);
        assert_eq!(Table::Dii.classify(PROCESSING_INSTRUCTION).unwrap(), PROCESSING_INSTRUCTION_II);
        assert_eq!(Table::Dii.classify(DOCUMENT_TYPE_DECLARATION | 0x03).unwrap(), DOCUMENT_TYPE_DECLARATION_II);
        assert_eq!(Table::Eii.classify(UNEXPANDED_ENTITY_REFERENCE).unwrap(), UNEXPANDED_ENTITY_REFERENCE_II);
    }

    #[test]
    fn character_chunk_octets_classify() {
        use crate::constants::*;
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK), CII_UTF8_SMALL_LENGTH);
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK | CHARACTER_CHUNK_ADD_TO_TABLE_FLAG | 0x02), CII_UTF8_MEDIUM_LENGTH);
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK | CHARACTER_CHUNK_UTF_16_FLAG | 0x03), CII_UTF16_LARGE_LENGTH);
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK | CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG), CII_RA);
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK | CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG), CII_EA);
        assert_eq!(Table::Eii.state(CHARACTER_CHUNK | CHARACTER_CHUNK_INDEX_FLAG), CII_INDEX_SMALL);
        assert_eq!(Table::Eii.state(0xB8), CII_INDEX_LARGE_LARGE);
        assert_eq!(Table::Eii.state(0xB9), ILLEGAL);
    }

    #[test]
    fn string_octets_classify() {
        assert_eq!(Table::NiString.state(0xFF), NISTRING_EMPTY);
        assert_eq!(Table::NiString.state(0x80), NISTRING_INDEX_SMALL);
        assert_eq!(Table::NiString.state(0x40 | 0x08), NISTRING_UTF8_MEDIUM_LENGTH);
        assert_eq!(Table::NiString.state(0x09), ILLEGAL);
        assert_eq!(Table::IString.state(0x40), ISTRING_MEDIUM_LENGTH);
        assert_eq!(Table::IString.state(0x41), ILLEGAL);
        assert_eq!(Table::IStringPrefixNamespace.state(0x80), ISTRING_PREFIX_NAMESPACE_INDEX_ZERO);
        assert_eq!(Table::IStringPrefixNamespace.state(2), ISTRING_PREFIX_NAMESPACE_LENGTH_3);
        assert_eq!(Table::IStringPrefixNamespace.state(35), ISTRING_PREFIX_NAMESPACE_LENGTH_36);
        assert_eq!(Table::IStringPrefixNamespace.state(3), ISTRING_SMALL_LENGTH);
        assert_eq!(Table::IString.state(0x80), ISTRING_INDEX_SMALL);
    }

    #[test]
    fn utf8_octets_classify() {
        assert_eq!(Table::Utf8.state(b'\t'), UTF8_ONE_BYTE);
        assert_eq!(Table::Utf8.state(0x01), ILLEGAL);
        assert_eq!(Table::Utf8.state(0xC0), ILLEGAL);
        assert_eq!(Table::Utf8.state(0xC3), UTF8_TWO_BYTES);
        assert_eq!(Table::Utf8.state(0xF0), UTF8_FOUR_BYTES);
        assert_eq!(Table::Utf8.state(0xF7), UTF8_FOUR_BYTES);
        assert_eq!(Table::Utf8NcName.state(b'a'), UTF8_NCNAME_NCNAME);
        assert_eq!(Table::Utf8NcName.state(b'_'), UTF8_NCNAME_NCNAME);
        assert_eq!(Table::Utf8NcName.state(b'7'), UTF8_NCNAME_NCNAME_CHAR);
        assert_eq!(Table::Utf8NcName.state(b'-'), UTF8_NCNAME_NCNAME_CHAR);
        assert_eq!(Table::Utf8NcName.state(b':'), ILLEGAL);
    }

    #[test]
    fn classify_names_the_table() {
        let err = Table::Aii.classify(0x7A).unwrap_err();
        assert_eq!(err, Error::IllegalState { table: "AII", octet: 0x7A });
    }
}
