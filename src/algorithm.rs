//! Encoding algorithms (X.891 clause 10).
//!
//! Built-in algorithms are a closed enum with fixed ids 0 to 9.
//! Application algorithms are identified by URI and optionally backed by a
//! registered [`EncodingAlgorithm`] transcoder; without one the data must
//! already be raw octets.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

// ============================================================================
// Data
// ============================================================================

/// Typed data handed to an encoding algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlgorithmData<'a> {
    Octets(&'a [u8]),
    Shorts(&'a [i16]),
    Ints(&'a [i32]),
    Longs(&'a [i64]),
    Booleans(&'a [bool]),
    Floats(&'a [f32]),
    Doubles(&'a [f64]),
    /// UUIDs as (most significant, least significant) halves.
    Uuids(&'a [(u64, u64)]),
    Text(&'a str),
}

impl AlgorithmData<'_> {
    /// Short name of the data kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Octets(_) => "octets",
            Self::Shorts(_) => "short",
            Self::Ints(_) => "int",
            Self::Longs(_) => "long",
            Self::Booleans(_) => "boolean",
            Self::Floats(_) => "float",
            Self::Doubles(_) => "double",
            Self::Uuids(_) => "uuid",
            Self::Text(_) => "text",
        }
    }

    /// Number of primitive elements.
    pub fn primitive_len(&self) -> usize {
        match self {
            Self::Octets(v) => v.len(),
            Self::Shorts(v) => v.len(),
            Self::Ints(v) => v.len(),
            Self::Longs(v) => v.len(),
            Self::Booleans(v) => v.len(),
            Self::Floats(v) => v.len(),
            Self::Doubles(v) => v.len(),
            Self::Uuids(v) => v.len(),
            Self::Text(s) => s.len(),
        }
    }
}

/// Owned counterpart of [`AlgorithmData`], produced by decoding or parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmValue {
    Octets(Vec<u8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    Booleans(Vec<bool>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    Uuids(Vec<(u64, u64)>),
    Text(String),
}

impl AlgorithmValue {
    pub fn as_data(&self) -> AlgorithmData<'_> {
        match self {
            Self::Octets(v) => AlgorithmData::Octets(v),
            Self::Shorts(v) => AlgorithmData::Shorts(v),
            Self::Ints(v) => AlgorithmData::Ints(v),
            Self::Longs(v) => AlgorithmData::Longs(v),
            Self::Booleans(v) => AlgorithmData::Booleans(v),
            Self::Floats(v) => AlgorithmData::Floats(v),
            Self::Doubles(v) => AlgorithmData::Doubles(v),
            Self::Uuids(v) => AlgorithmData::Uuids(v),
            Self::Text(s) => AlgorithmData::Text(s),
        }
    }
}

// ============================================================================
// Application transcoders
// ============================================================================

/// Transcoder for an application-defined encoding algorithm.
pub trait EncodingAlgorithm: fmt::Debug {
    /// Appends the octet form of `data` to `out`.
    ///
    /// Data kinds the algorithm cannot handle should yield
    /// [`Error::AlgorithmDataMismatch`].
    fn encode_to_bytes(&self, data: &AlgorithmData<'_>, out: &mut Vec<u8>) -> Result<()>;
}

/// Identifies the algorithm for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmRef<'a> {
    /// Application algorithm looked up in the vocabulary.
    Uri(&'a str),
    /// Built-in (0 to 9) or application (32 to 255) id.
    Id(u8),
}

// ============================================================================
// Built-in algorithms
// ============================================================================

/// The built-in encoding algorithms of X.891 table 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAlgorithm {
    Hexadecimal,
    Base64,
    Short,
    Int,
    Long,
    Boolean,
    Float,
    Double,
    Uuid,
    Cdata,
}

impl BuiltinAlgorithm {
    pub const ALL: [BuiltinAlgorithm; 10] = [
        Self::Hexadecimal,
        Self::Base64,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Boolean,
        Self::Float,
        Self::Double,
        Self::Uuid,
        Self::Cdata,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hexadecimal => "hexadecimal",
            Self::Base64 => "base64",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Double => "double",
            Self::Uuid => "uuid",
            Self::Cdata => "cdata",
        }
    }

    /// Octets produced for `primitive_len` elements.
    pub fn octet_length(self, primitive_len: usize) -> usize {
        match self {
            Self::Hexadecimal | Self::Base64 | Self::Cdata => primitive_len,
            Self::Short => primitive_len * 2,
            Self::Int | Self::Float => primitive_len * 4,
            Self::Long | Self::Double => primitive_len * 8,
            // 4 Bit Header: Anzahl ungenutzter Bits im letzten Octet
            Self::Boolean => (4 + primitive_len).div_ceil(8),
            Self::Uuid => primitive_len * 16,
        }
    }

    fn mismatch(self, data: &AlgorithmData<'_>) -> Error {
        Error::algorithm_data_mismatch(self.name(), data.kind())
    }

    /// Appends the octet form of `data` to `out`.
    pub fn encode_to_bytes(self, data: &AlgorithmData<'_>, out: &mut Vec<u8>) -> Result<()> {
        out.reserve(self.octet_length(data.primitive_len()));
        match (self, data) {
            (Self::Hexadecimal | Self::Base64, AlgorithmData::Octets(v)) => out.extend_from_slice(v),
            (Self::Short, AlgorithmData::Shorts(v)) => {
                v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes()))
            }
            (Self::Int, AlgorithmData::Ints(v)) => {
                v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes()))
            }
            (Self::Long, AlgorithmData::Longs(v)) => {
                v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes()))
            }
            (Self::Float, AlgorithmData::Floats(v)) => {
                v.iter().for_each(|x| out.extend_from_slice(&x.to_bits().to_be_bytes()))
            }
            (Self::Double, AlgorithmData::Doubles(v)) => {
                v.iter().for_each(|x| out.extend_from_slice(&x.to_bits().to_be_bytes()))
            }
            (Self::Uuid, AlgorithmData::Uuids(v)) => {
                for (msb, lsb) in v.iter() {
                    out.extend_from_slice(&msb.to_be_bytes());
                    out.extend_from_slice(&lsb.to_be_bytes());
                }
            }
            (Self::Boolean, AlgorithmData::Booleans(v)) => encode_booleans(v, out),
            (Self::Cdata, AlgorithmData::Text(s)) => out.extend_from_slice(s.as_bytes()),
            _ => return Err(self.mismatch(data)),
        }
        Ok(())
    }

    /// Reverses [`BuiltinAlgorithm::encode_to_bytes`].
    pub fn decode_from_bytes(self, bytes: &[u8]) -> Result<AlgorithmValue> {
        let width = match self {
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
            Self::Uuid => 16,
            _ => 1,
        };
        if bytes.len() % width != 0 {
            return Err(Error::InvalidValue(format!(
                "{} octets are not a multiple of {width} for '{}'",
                bytes.len(),
                self.name()
            )));
        }
        let chunks = bytes.chunks_exact(width);
        Ok(match self {
            Self::Hexadecimal | Self::Base64 => AlgorithmValue::Octets(bytes.to_vec()),
            Self::Short => AlgorithmValue::Shorts(chunks.map(|c| i16::from_be_bytes([c[0], c[1]])).collect()),
            Self::Int => AlgorithmValue::Ints(chunks.map(|c| i32::from_be_bytes(be4(c))).collect()),
            Self::Long => AlgorithmValue::Longs(chunks.map(|c| i64::from_be_bytes(be8(c))).collect()),
            Self::Float => AlgorithmValue::Floats(chunks.map(|c| f32::from_bits(u32::from_be_bytes(be4(c)))).collect()),
            Self::Double => {
                AlgorithmValue::Doubles(chunks.map(|c| f64::from_bits(u64::from_be_bytes(be8(c)))).collect())
            }
            Self::Uuid => AlgorithmValue::Uuids(
                chunks
                    .map(|c| (u64::from_be_bytes(be8(&c[..8])), u64::from_be_bytes(be8(&c[8..]))))
                    .collect(),
            ),
            Self::Boolean => AlgorithmValue::Booleans(decode_booleans(bytes)?),
            Self::Cdata => AlgorithmValue::Text(crate::character::decode_utf8(bytes)?),
        })
    }

    /// Parses the lexical (character) form into typed data.
    ///
    /// Lists are whitespace separated; hexadecimal and base64 take the whole text.
    pub fn parse_characters(self, text: &str) -> Result<AlgorithmValue> {
        let items = text.split_ascii_whitespace();
        Ok(match self {
            Self::Hexadecimal => AlgorithmValue::Octets(parse_hex(text)?),
            Self::Base64 => {
                let compact: String = items.collect();
                AlgorithmValue::Octets(
                    STANDARD
                        .decode(compact.as_bytes())
                        .map_err(|e| Error::InvalidValue(format!("invalid base64: {e}")))?,
                )
            }
            Self::Short => AlgorithmValue::Shorts(parse_all(items, "short")?),
            Self::Int => AlgorithmValue::Ints(parse_all(items, "int")?),
            Self::Long => AlgorithmValue::Longs(parse_all(items, "long")?),
            Self::Float => AlgorithmValue::Floats(items.map(parse_float::<f32>).collect::<Result<_>>()?),
            Self::Double => AlgorithmValue::Doubles(items.map(parse_float::<f64>).collect::<Result<_>>()?),
            Self::Boolean => AlgorithmValue::Booleans(
                items
                    .map(|t| match t {
                        "true" | "1" => Ok(true),
                        "false" | "0" => Ok(false),
                        _ => Err(Error::InvalidValue(format!("invalid boolean: {t}"))),
                    })
                    .collect::<Result<_>>()?,
            ),
            Self::Uuid => AlgorithmValue::Uuids(items.map(parse_uuid).collect::<Result<_>>()?),
            Self::Cdata => AlgorithmValue::Text(text.to_owned()),
        })
    }
}

impl EncodingAlgorithm for BuiltinAlgorithm {
    fn encode_to_bytes(&self, data: &AlgorithmData<'_>, out: &mut Vec<u8>) -> Result<()> {
        BuiltinAlgorithm::encode_to_bytes(*self, data, out)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn be4(c: &[u8]) -> [u8; 4] {
    [c[0], c[1], c[2], c[3]]
}

fn be8(c: &[u8]) -> [u8; 8] {
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}

fn encode_booleans(values: &[bool], out: &mut Vec<u8>) {
    let octets = (4 + values.len()).div_ceil(8);
    let unused = (octets * 8 - 4 - values.len()) as u8;
    let start = out.len();
    out.resize(start + octets, 0);
    out[start] = unused << 4;
    for (i, &v) in values.iter().enumerate() {
        if v {
            let bit = 4 + i;
            out[start + bit / 8] |= 0x80 >> (bit % 8);
        }
    }
}

fn decode_booleans(bytes: &[u8]) -> Result<Vec<bool>> {
    let Some(&first) = bytes.first() else {
        return Ok(Vec::new());
    };
    let unused = usize::from(first >> 4);
    let total = (bytes.len() * 8).checked_sub(4 + unused).filter(|_| unused < 8);
    let Some(count) = total else {
        return Err(Error::InvalidValue(format!("boolean header declares {unused} unused bits")));
    };
    Ok((0..count)
        .map(|i| {
            let bit = 4 + i;
            bytes[bit / 8] & (0x80 >> (bit % 8)) != 0
        })
        .collect())
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if !digits.len().is_multiple_of(2) {
        return Err(Error::InvalidValue(format!("odd number of hex digits: {}", digits.len())));
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16);
            let lo = (pair[1] as char).to_digit(16);
            match (hi, lo) {
                (Some(h), Some(l)) => Ok((h * 16 + l) as u8),
                _ => Err(Error::InvalidValue(format!(
                    "invalid hex: {}{}",
                    pair[0] as char, pair[1] as char
                ))),
            }
        })
        .collect()
}

fn parse_all<'a, T: std::str::FromStr>(items: impl Iterator<Item = &'a str>, what: &str) -> Result<Vec<T>> {
    items
        .map(|t| {
            t.parse::<T>()
                .map_err(|_| Error::InvalidValue(format!("invalid {what}: {t}")))
        })
        .collect()
}

/// Parst xsd:float/double Lexik inkl. INF und NaN.
fn parse_float<T: std::str::FromStr + From<f32>>(t: &str) -> Result<T> {
    match t {
        "INF" => Ok(T::from(f32::INFINITY)),
        "-INF" => Ok(T::from(f32::NEG_INFINITY)),
        "NaN" => Ok(T::from(f32::NAN)),
        _ => t
            .parse::<T>()
            .map_err(|_| Error::InvalidValue(format!("invalid floating point value: {t}"))),
    }
}

fn parse_uuid(t: &str) -> Result<(u64, u64)> {
    let hex: String = t.chars().filter(|&c| c != '-').collect();
    let valid = hex.len() == 32
        && t.len() == 36
        && [8, 13, 18, 23].iter().all(|&i| t.as_bytes()[i] == b'-');
    if !valid {
        return Err(Error::InvalidValue(format!("invalid uuid: {t}")));
    }
    let bytes = parse_hex(&hex)?;
    Ok((u64::from_be_bytes(be8(&bytes[..8])), u64::from_be_bytes(be8(&bytes[8..]))))
}
