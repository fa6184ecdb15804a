//! Integer and octet-string-length codecs (X.891 C.22 to C.28).
//!
//! All integer codecs take the wire value, i.e. the logical value minus one:
//! X.891 declares these ranges as `[1, 2^20]`, the wire carries `[0, 2^20 - 1]`.
//! The caller's structural bits arrive in `b` and are ORed into the first
//! octet; the codec fills the remaining low bits.
//!
//! | Codec | small | medium | large | very large |
//! |---|---|---|---|---|
//! | 2nd bit | 1 octet `< 64` | 2 octets `< 8256` | 3 octets `< 2^20` | - |
//! | 3rd bit | 1 octet `< 32` | 2 octets `< 2080` | 3 octets `< 526368` | 4 octets |
//! | 4th bit | 1 octet `< 16` | 2 octets `< 1040` | 3 octets `< 263184` | 4 octets |
//!
//! Length codecs (lengths are at least one) have no 20-bit ceiling: their
//! last tier carries a full 32-bit big-endian value.

use std::io::Write;

use crate::constants::*;
use crate::octet_buffer::{OctetBuffer, OctetReader};
use crate::{Error, Result};

/// Tier layout of one "integer on the Nth bit" codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerTiers {
    pub small_limit: u32,
    pub medium_limit: u32,
    pub medium_flag: u8,
    pub large_flag: u8,
    /// Exclusive limit of the large tier, `None` if it reaches [`INTEGER_MAXIMUM_SIZE`].
    pub large_limit: Option<u32>,
    pub large_large_flag: u8,
}

/// Integer starting on the second bit of an octet (X.891 C.25, C.26).
pub const SECOND_BIT: IntegerTiers = IntegerTiers {
    small_limit: INTEGER_2ND_BIT_SMALL_LIMIT,
    medium_limit: INTEGER_2ND_BIT_MEDIUM_LIMIT,
    medium_flag: INTEGER_2ND_BIT_MEDIUM_FLAG,
    large_flag: INTEGER_2ND_BIT_LARGE_FLAG,
    large_limit: None,
    large_large_flag: 0,
};

/// Integer starting on the third bit of an octet (X.891 C.27).
pub const THIRD_BIT: IntegerTiers = IntegerTiers {
    small_limit: INTEGER_3RD_BIT_SMALL_LIMIT,
    medium_limit: INTEGER_3RD_BIT_MEDIUM_LIMIT,
    medium_flag: INTEGER_3RD_BIT_MEDIUM_FLAG,
    large_flag: INTEGER_3RD_BIT_LARGE_FLAG,
    large_limit: Some(INTEGER_3RD_BIT_LARGE_LIMIT),
    large_large_flag: INTEGER_3RD_BIT_LARGE_LARGE_FLAG,
};

/// Integer starting on the fourth bit of an octet (X.891 C.28).
pub const FOURTH_BIT: IntegerTiers = IntegerTiers {
    small_limit: INTEGER_4TH_BIT_SMALL_LIMIT,
    medium_limit: INTEGER_4TH_BIT_MEDIUM_LIMIT,
    medium_flag: INTEGER_4TH_BIT_MEDIUM_FLAG,
    large_flag: INTEGER_4TH_BIT_LARGE_FLAG,
    large_limit: Some(INTEGER_4TH_BIT_LARGE_LIMIT),
    large_large_flag: INTEGER_4TH_BIT_LARGE_LARGE_FLAG,
};

/// Tier layout of one octet-string-length codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthTiers {
    pub small_limit: u32,
    pub medium_limit: u32,
    pub medium_flag: u8,
    pub large_flag: u8,
}

/// Length starting on the second bit (X.891 C.22).
pub const LENGTH_SECOND_BIT: LengthTiers = LengthTiers {
    small_limit: OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG,
};

/// Length starting on the fifth bit (X.891 C.23).
pub const LENGTH_FIFTH_BIT: LengthTiers = LengthTiers {
    small_limit: OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG,
};

/// Length starting on the seventh bit (X.891 C.24).
pub const LENGTH_SEVENTH_BIT: LengthTiers = LengthTiers {
    small_limit: OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG,
};

// ============================================================================
// Encoding
// ============================================================================

/// Encodes wire value `i` in `[0, 2^20)` with the given tier layout.
pub fn encode_integer<W: Write>(
    out: &mut OctetBuffer<W>,
    b: u8,
    i: u32,
    tiers: &IntegerTiers,
) -> Result<()> {
    if i >= INTEGER_MAXIMUM_SIZE {
        return Err(Error::IntegerOutOfRange(u64::from(i)));
    }
    if i < tiers.small_limit {
        out.write(b | i as u8)
    } else if i < tiers.medium_limit {
        let v = i - tiers.small_limit;
        out.write(b | tiers.medium_flag | (v >> 8) as u8)?;
        out.write(v as u8)
    } else if tiers.large_limit.is_none_or(|limit| i < limit) {
        let v = i - tiers.medium_limit;
        out.write(b | tiers.large_flag | (v >> 16) as u8)?;
        out.write((v >> 8) as u8)?;
        out.write(v as u8)
    } else {
        // large_limit ist hier immer Some
        let v = i - tiers.large_limit.unwrap_or(tiers.medium_limit);
        out.write(b | tiers.large_large_flag)?;
        out.write((v >> 16) as u8)?;
        out.write((v >> 8) as u8)?;
        out.write(v as u8)
    }
}

/// Integer on the second bit with the first bit set (index form, X.891 C.25).
#[inline]
pub fn encode_on_second_bit_first_bit_one<W: Write>(out: &mut OctetBuffer<W>, i: u32) -> Result<()> {
    encode_integer(out, 0x80, i, &SECOND_BIT)
}

/// Integer on the second bit with the first bit clear (X.891 C.25).
#[inline]
pub fn encode_on_second_bit_first_bit_zero<W: Write>(out: &mut OctetBuffer<W>, i: u32) -> Result<()> {
    encode_integer(out, 0x00, i, &SECOND_BIT)
}

#[inline]
pub fn encode_on_third_bit<W: Write>(out: &mut OctetBuffer<W>, b: u8, i: u32) -> Result<()> {
    encode_integer(out, b, i, &THIRD_BIT)
}

#[inline]
pub fn encode_on_fourth_bit<W: Write>(out: &mut OctetBuffer<W>, b: u8, i: u32) -> Result<()> {
    encode_integer(out, b, i, &FOURTH_BIT)
}

/// Encodes a non-zero octet-string length with the given tier layout.
pub fn encode_length<W: Write>(
    out: &mut OctetBuffer<W>,
    b: u8,
    length: usize,
    tiers: &LengthTiers,
) -> Result<()> {
    let len = u32::try_from(length)
        .ok()
        .filter(|&l| l > 0)
        .ok_or(Error::IntegerOutOfRange(length as u64))?;
    if len < tiers.small_limit {
        out.write(b | (len - 1) as u8)
    } else if len < tiers.medium_limit {
        out.write(b | tiers.medium_flag)?;
        out.write((len - tiers.small_limit) as u8)
    } else {
        out.write(b | tiers.large_flag)?;
        out.write_bytes(&(len - tiers.medium_limit).to_be_bytes())
    }
}

#[inline]
pub fn encode_length_on_second_bit<W: Write>(out: &mut OctetBuffer<W>, length: usize) -> Result<()> {
    encode_length(out, 0x00, length, &LENGTH_SECOND_BIT)
}

#[inline]
pub fn encode_length_on_fifth_bit<W: Write>(out: &mut OctetBuffer<W>, b: u8, length: usize) -> Result<()> {
    encode_length(out, b, length, &LENGTH_FIFTH_BIT)
}

#[inline]
pub fn encode_length_on_seventh_bit<W: Write>(out: &mut OctetBuffer<W>, b: u8, length: usize) -> Result<()> {
    encode_length(out, b, length, &LENGTH_SEVENTH_BIT)
}

// ============================================================================
// Decoding
// ============================================================================

fn illegal(table: &'static str, octet: u8) -> Error {
    Error::IllegalState { table, octet }
}

/// Decodes an integer on the second bit; the first bit is ignored.
pub fn decode_on_second_bit(reader: &mut OctetReader<'_>) -> Result<u32> {
    let b = reader.read()?;
    match b & 0x60 {
        0x00 | 0x20 => Ok(u32::from(b & INTEGER_2ND_BIT_SMALL_MASK)),
        0x40 => {
            let hi = u32::from(b & INTEGER_2ND_BIT_MEDIUM_MASK);
            Ok(((hi << 8) | u32::from(reader.read()?)) + INTEGER_2ND_BIT_SMALL_LIMIT)
        }
        _ => {
            if b & 0x10 != 0 {
                return Err(illegal("integer 2nd bit", b));
            }
            let hi = u32::from(b & INTEGER_2ND_BIT_LARGE_MASK);
            let mid = u32::from(reader.read()?);
            let lo = u32::from(reader.read()?);
            Ok(((hi << 16) | (mid << 8) | lo) + INTEGER_2ND_BIT_MEDIUM_LIMIT)
        }
    }
}

/// Decodes an integer on the third bit; the first two bits are ignored.
pub fn decode_on_third_bit(reader: &mut OctetReader<'_>) -> Result<u32> {
    let b = reader.read()?;
    if b & 0x20 == 0 {
        return Ok(u32::from(b & INTEGER_3RD_BIT_SMALL_MASK));
    }
    match b & 0x38 {
        0x20 => {
            let hi = u32::from(b & INTEGER_3RD_BIT_MEDIUM_MASK);
            Ok(((hi << 8) | u32::from(reader.read()?)) + INTEGER_3RD_BIT_SMALL_LIMIT)
        }
        0x28 => {
            let hi = u32::from(b & INTEGER_3RD_BIT_LARGE_MASK);
            let mid = u32::from(reader.read()?);
            let lo = u32::from(reader.read()?);
            Ok(((hi << 16) | (mid << 8) | lo) + INTEGER_3RD_BIT_MEDIUM_LIMIT)
        }
        0x30 if b & 0x07 == 0 => {
            let hi = u32::from(reader.read()? & INTEGER_3RD_BIT_LARGE_LARGE_MASK);
            let mid = u32::from(reader.read()?);
            let lo = u32::from(reader.read()?);
            Ok(((hi << 16) | (mid << 8) | lo) + INTEGER_3RD_BIT_LARGE_LIMIT)
        }
        _ => Err(illegal("integer 3rd bit", b)),
    }
}

/// Decodes an integer on the fourth bit; the first three bits are ignored.
pub fn decode_on_fourth_bit(reader: &mut OctetReader<'_>) -> Result<u32> {
    let b = reader.read()?;
    if b & 0x10 == 0 {
        return Ok(u32::from(b & INTEGER_4TH_BIT_SMALL_MASK));
    }
    match b & 0x1C {
        0x10 => {
            let hi = u32::from(b & INTEGER_4TH_BIT_MEDIUM_MASK);
            Ok(((hi << 8) | u32::from(reader.read()?)) + INTEGER_4TH_BIT_SMALL_LIMIT)
        }
        0x14 => {
            let hi = u32::from(b & INTEGER_4TH_BIT_LARGE_MASK);
            let mid = u32::from(reader.read()?);
            let lo = u32::from(reader.read()?);
            Ok(((hi << 16) | (mid << 8) | lo) + INTEGER_4TH_BIT_MEDIUM_LIMIT)
        }
        0x18 if b & 0x03 == 0 => {
            let hi = u32::from(reader.read()? & INTEGER_4TH_BIT_LARGE_LARGE_MASK);
            let mid = u32::from(reader.read()?);
            let lo = u32::from(reader.read()?);
            Ok(((hi << 16) | (mid << 8) | lo) + INTEGER_4TH_BIT_LARGE_LIMIT)
        }
        _ => Err(illegal("integer 4th bit", b)),
    }
}

/// Decodes a length from the low bits of `b` (already read) plus continuation octets.
fn decode_length(
    reader: &mut OctetReader<'_>,
    b: u8,
    small_mask: u8,
    tiers: &LengthTiers,
    table: &'static str,
) -> Result<usize> {
    let tag_mask = tiers.large_flag | small_mask;
    let len = if b & tiers.medium_flag == 0 {
        u32::from(b & small_mask) + 1
    } else if b & tag_mask == tiers.medium_flag {
        u32::from(reader.read()?) + tiers.small_limit
    } else if b & tag_mask == tiers.large_flag {
        reader
            .read_u32()?
            .checked_add(tiers.medium_limit)
            .ok_or(Error::IntegerOutOfRange(u64::MAX))?
    } else {
        return Err(illegal(table, b));
    };
    Ok(len as usize)
}

/// Decodes a length on the second bit; the first bit is ignored.
pub fn decode_length_on_second_bit(reader: &mut OctetReader<'_>) -> Result<usize> {
    let b = reader.read()? & 0x7F;
    decode_length(reader, b, OCTET_STRING_LENGTH_2ND_BIT_SMALL_MASK, &LENGTH_SECOND_BIT, "length 2nd bit")
}

/// Decodes a length on the fifth bit; the first four bits are ignored.
pub fn decode_length_on_fifth_bit(reader: &mut OctetReader<'_>) -> Result<usize> {
    let b = reader.read()? & 0x0F;
    decode_length(reader, b, OCTET_STRING_LENGTH_5TH_BIT_SMALL_MASK, &LENGTH_FIFTH_BIT, "length 5th bit")
}

/// Decodes a length on the seventh bit; the first six bits are ignored.
pub fn decode_length_on_seventh_bit(reader: &mut OctetReader<'_>) -> Result<usize> {
    let b = reader.read()? & 0x03;
    decode_length(reader, b, OCTET_STRING_LENGTH_7TH_BIT_SMALL_MASK, &LENGTH_SEVENTH_BIT, "length 7th bit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_with(f: impl FnOnce(&mut OctetBuffer<Vec<u8>>) -> Result<()>) -> Vec<u8> {
        let mut out = OctetBuffer::new(Vec::new());
        f(&mut out).unwrap();
        out.into_inner().unwrap()
    }

    /// Erwartete Octet-Anzahl je Tier.
    fn expected_len(i: u32, tiers: &IntegerTiers) -> usize {
        if i < tiers.small_limit {
            1
        } else if i < tiers.medium_limit {
            2
        } else if tiers.large_limit.is_none_or(|l| i < l) {
            3
        } else {
            4
        }
    }

    // --- Vollstaendiger Wertebereich ---

    #[test]
    fn second_bit_round_trips_full_domain() {
        let mut out = OctetBuffer::new(Vec::with_capacity(4));
        for i in 0..INTEGER_MAXIMUM_SIZE {
            out.reset();
            encode_on_second_bit_first_bit_one(&mut out, i).unwrap();
            let bytes = out.buffered();
            assert_eq!(bytes.len(), expected_len(i, &SECOND_BIT), "len for {i}");
            assert_eq!(bytes[0] & 0x80, 0x80, "first bit for {i}");
            let mut r = OctetReader::new(bytes);
            assert_eq!(decode_on_second_bit(&mut r).unwrap(), i);
            assert!(r.is_at_end());
        }
    }

    #[test]
    fn third_bit_round_trips_full_domain() {
        let mut out = OctetBuffer::new(Vec::with_capacity(4));
        for i in 0..INTEGER_MAXIMUM_SIZE {
            out.reset();
            encode_on_third_bit(&mut out, 0x40, i).unwrap();
            let bytes = out.buffered();
            assert_eq!(bytes.len(), expected_len(i, &THIRD_BIT), "len for {i}");
            assert_eq!(bytes[0] & 0xC0, 0x40, "tag bits for {i}");
            let mut r = OctetReader::new(bytes);
            assert_eq!(decode_on_third_bit(&mut r).unwrap(), i);
        }
    }

    #[test]
    fn fourth_bit_round_trips_full_domain() {
        let mut out = OctetBuffer::new(Vec::with_capacity(4));
        for i in 0..INTEGER_MAXIMUM_SIZE {
            out.reset();
            encode_on_fourth_bit(&mut out, 0xA0, i).unwrap();
            let bytes = out.buffered();
            assert_eq!(bytes.len(), expected_len(i, &FOURTH_BIT), "len for {i}");
            assert_eq!(bytes[0] & 0xE0, 0xA0, "tag bits for {i}");
            let mut r = OctetReader::new(bytes);
            assert_eq!(decode_on_fourth_bit(&mut r).unwrap(), i);
        }
    }

    // --- Grenzwerte ---

    #[test]
    fn third_bit_64_selects_medium_tier() {
        let bytes = encode_with(|o| encode_on_third_bit(o, 0, 64));
        assert_eq!(bytes, vec![0x20, 32]);
    }

    #[test]
    fn second_bit_tier_boundaries() {
        assert_eq!(encode_with(|o| encode_on_second_bit_first_bit_one(o, 63)), vec![0xBF]);
        assert_eq!(encode_with(|o| encode_on_second_bit_first_bit_one(o, 64)), vec![0xC0, 0x00]);
        assert_eq!(encode_with(|o| encode_on_second_bit_first_bit_zero(o, 8255)), vec![0x5F, 0xFF]);
        assert_eq!(encode_with(|o| encode_on_second_bit_first_bit_zero(o, 8256)), vec![0x60, 0x00, 0x00]);
        assert_eq!(
            encode_with(|o| encode_on_second_bit_first_bit_one(o, INTEGER_MAXIMUM_SIZE - 1)),
            vec![0xEF, 0xDF, 0xBF]
        );
    }

    #[test]
    fn third_bit_very_large_tier() {
        assert_eq!(encode_with(|o| encode_on_third_bit(o, 0, 526_367)), vec![0x2F, 0xFF, 0xFF]);
        assert_eq!(encode_with(|o| encode_on_third_bit(o, 0, 526_368)), vec![0x30, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn fourth_bit_very_large_tier() {
        assert_eq!(encode_with(|o| encode_on_fourth_bit(o, 0xA0, 15)), vec![0xAF]);
        assert_eq!(encode_with(|o| encode_on_fourth_bit(o, 0xA0, 263_184)), vec![0xB8, 0, 0, 0]);
    }

    #[test]
    fn integer_ceiling_is_an_error() {
        let mut out = OctetBuffer::new(Vec::new());
        for tiers in [&SECOND_BIT, &THIRD_BIT, &FOURTH_BIT] {
            assert_eq!(
                encode_integer(&mut out, 0, INTEGER_MAXIMUM_SIZE, tiers),
                Err(Error::IntegerOutOfRange(1_048_576))
            );
        }
        assert!(out.is_empty());
    }

    // --- Laengen ---

    #[test]
    fn length_tier_boundaries() {
        assert_eq!(encode_with(|o| encode_length_on_second_bit(o, 1)), vec![0x00]);
        assert_eq!(encode_with(|o| encode_length_on_second_bit(o, 64)), vec![0x3F]);
        assert_eq!(encode_with(|o| encode_length_on_second_bit(o, 65)), vec![0x40, 0x00]);
        assert_eq!(encode_with(|o| encode_length_on_second_bit(o, 321)), vec![0x60, 0, 0, 0, 0]);

        assert_eq!(encode_with(|o| encode_length_on_fifth_bit(o, 0x40, 8)), vec![0x47]);
        assert_eq!(encode_with(|o| encode_length_on_fifth_bit(o, 0x40, 9)), vec![0x48, 0x00]);
        assert_eq!(encode_with(|o| encode_length_on_fifth_bit(o, 0x40, 265)), vec![0x4C, 0, 0, 0, 0]);

        assert_eq!(encode_with(|o| encode_length_on_seventh_bit(o, 0x24, 2)), vec![0x25]);
        assert_eq!(encode_with(|o| encode_length_on_seventh_bit(o, 0x24, 3)), vec![0x26, 0x00]);
        assert_eq!(encode_with(|o| encode_length_on_seventh_bit(o, 0x24, 259)), vec![0x27, 0, 0, 0, 0]);
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut out = OctetBuffer::new(Vec::new());
        assert!(encode_length_on_second_bit(&mut out, 0).is_err());
    }

    #[test]
    fn lengths_round_trip_sampled() {
        // Alle Werte bis 1000, danach grob gestreut bis ueber 2^24.
        let samples = (1..1000usize).chain((1000..20_000_000).step_by(7919));
        for len in samples {
            let bytes = encode_with(|o| encode_length_on_second_bit(o, len));
            assert_eq!(decode_length_on_second_bit(&mut OctetReader::new(&bytes)).unwrap(), len);

            let bytes = encode_with(|o| encode_length_on_fifth_bit(o, 0x70, len));
            assert_eq!(bytes[0] & 0xF0, 0x70);
            assert_eq!(decode_length_on_fifth_bit(&mut OctetReader::new(&bytes)).unwrap(), len);

            let bytes = encode_with(|o| encode_length_on_seventh_bit(o, 0xFC, len));
            assert_eq!(bytes[0] & 0xFC, 0xFC);
            assert_eq!(decode_length_on_seventh_bit(&mut OctetReader::new(&bytes)).unwrap(), len);
        }
    }

    #[test]
    fn decode_rejects_reserved_patterns() {
        assert!(decode_on_third_bit(&mut OctetReader::new(&[0x31, 0, 0, 0])).is_err());
        assert!(decode_on_fourth_bit(&mut OctetReader::new(&[0x1C])).is_err());
        assert!(decode_on_second_bit(&mut OctetReader::new(&[0x70])).is_err());
        assert!(decode_length_on_fifth_bit(&mut OctetReader::new(&[0x09])).is_err());
    }

    #[test]
    fn decode_eof_on_continuation() {
        assert_eq!(
            decode_on_second_bit(&mut OctetReader::new(&[0xC0])),
            Err(Error::PrematureEndOfStream)
        );
    }
}
