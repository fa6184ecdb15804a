//! Restricted alphabets (X.891 clause 9).
//!
//! A restricted alphabet maps each of its characters to an `n`-bit code,
//! where `n` is the smallest width that leaves the all-ones code free as
//! terminator. Codes are packed MSB first; the last octet is padded with
//! one bits.
//!
//! The two built-in alphabets have 15 characters each and therefore pack
//! into nibbles: two characters per octet, an odd tail gets `0xF` as its
//! low nibble.

use crate::{Error, FastHashMap, Result};

/// Characters of built-in alphabet 0.
pub const NUMERIC_CHARACTERS: &str = "0123456789-+.E ";
/// Characters of built-in alphabet 1.
pub const DATE_TIME_CHARACTERS: &str = "0123456789-:TZ ";

/// Four-bit terminator nibble.
const FOUR_BIT_TERMINATOR: u8 = 0x0F;

const fn four_bit_table(chars: &[u8]) -> [u8; 128] {
    let mut table = [0xFF; 128];
    let mut i = 0;
    while i < chars.len() {
        table[chars[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static NUMERIC_CODES: [u8; 128] = four_bit_table(NUMERIC_CHARACTERS.as_bytes());
static DATE_TIME_CODES: [u8; 128] = four_bit_table(DATE_TIME_CHARACTERS.as_bytes());

// ============================================================================
// Built-in alphabets
// ============================================================================

/// The built-in restricted alphabets, addressed by id 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAlphabet {
    Numeric,
    DateTime,
}

impl BuiltinAlphabet {
    pub fn id(self) -> u8 {
        match self {
            Self::Numeric => 0,
            Self::DateTime => 1,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Numeric),
            1 => Some(Self::DateTime),
            _ => None,
        }
    }

    pub fn characters(self) -> &'static str {
        match self {
            Self::Numeric => NUMERIC_CHARACTERS,
            Self::DateTime => DATE_TIME_CHARACTERS,
        }
    }

    /// Four-bit code of `c`, if it belongs to the alphabet.
    #[inline]
    pub fn code(self, c: char) -> Option<u8> {
        let table = match self {
            Self::Numeric => &NUMERIC_CODES,
            Self::DateTime => &DATE_TIME_CODES,
        };
        table.get(c as usize).copied().filter(|&code| code != 0xFF)
    }

    /// Packs `s` two characters per octet and appends it to `out`.
    ///
    /// Produces `(k + 1) / 2` octets for `k` characters. Nothing is appended
    /// if a character is outside the alphabet.
    pub fn pack(self, s: &str, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let mut high: Option<u8> = None;
        for c in s.chars() {
            let Some(code) = self.code(c) else {
                out.truncate(start);
                return Err(Error::CharacterOutOfAlphabet(c));
            };
            match high.take() {
                Some(h) => out.push((h << 4) | code),
                None => high = Some(code),
            }
        }
        if let Some(h) = high {
            out.push((h << 4) | FOUR_BIT_TERMINATOR);
        }
        Ok(())
    }

    /// Reverses [`BuiltinAlphabet::pack`].
    pub fn unpack(self, bytes: &[u8]) -> Result<String> {
        let chars: Vec<char> = self.characters().chars().collect();
        let mut s = String::with_capacity(bytes.len() * 2);
        for (i, &b) in bytes.iter().enumerate() {
            for nibble in [b >> 4, b & 0x0F] {
                if nibble == FOUR_BIT_TERMINATOR {
                    if i + 1 != bytes.len() {
                        return Err(Error::InvalidValue(format!("terminator nibble in octet {i} of {}", bytes.len())));
                    }
                    return Ok(s);
                }
                s.push(chars[nibble as usize]);
            }
        }
        Ok(s)
    }
}

/// Identifies the restricted alphabet for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetRef<'a> {
    Builtin(BuiltinAlphabet),
    /// Application alphabet, looked up in the vocabulary by its characters.
    Application(&'a str),
}

// ============================================================================
// Application alphabets
// ============================================================================

/// An application-defined restricted alphabet, packed with `n` bits per character.
#[derive(Debug, Clone)]
pub struct RestrictedAlphabet {
    characters: Vec<char>,
    codes: FastHashMap<char, u32>,
    bits: u32,
}

impl RestrictedAlphabet {
    /// Builds the code table for `characters`.
    ///
    /// At least two distinct characters are required; more than 65535 do not fit.
    pub fn new(characters: &str) -> Result<Self> {
        let chars: Vec<char> = characters.chars().collect();
        if chars.len() < 2 {
            return Err(Error::invalid_alphabet("fewer than two characters"));
        }
        if chars.len() > u16::MAX as usize {
            return Err(Error::invalid_alphabet("more than 65535 characters"));
        }
        let mut codes = FastHashMap::with_capacity_and_hasher(chars.len(), Default::default());
        for (i, &c) in chars.iter().enumerate() {
            if codes.insert(c, i as u32).is_some() {
                return Err(Error::invalid_alphabet(format!("duplicate character {c:?}")));
            }
        }
        let bits = bits_per_character(chars.len());
        Ok(Self {
            characters: chars,
            codes,
            bits,
        })
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn bits_per_character(&self) -> u32 {
        self.bits
    }

    /// Octets needed for `char_count` characters.
    pub fn octet_length(&self, char_count: usize) -> usize {
        (char_count * self.bits as usize).div_ceil(8)
    }

    /// Packs `s` MSB first and appends it to `out`, padding with one bits.
    ///
    /// Nothing is appended if a character is outside the alphabet.
    pub fn pack(&self, s: &str, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let n = self.bits;
        let mut acc: u32 = 0;
        let mut pending = 0u32;
        for c in s.chars() {
            let Some(&code) = self.codes.get(&c) else {
                out.truncate(start);
                return Err(Error::CharacterOutOfAlphabet(c));
            };
            acc = (acc << n) | code;
            pending += n;
            while pending >= 8 {
                pending -= 8;
                out.push((acc >> pending) as u8);
            }
            acc &= (1 << pending) - 1;
        }
        if pending > 0 {
            let pad = 8 - pending;
            out.push(((acc << pad) | ((1 << pad) - 1)) as u8);
        }
        Ok(())
    }

    /// Reverses [`RestrictedAlphabet::pack`].
    pub fn unpack(&self, bytes: &[u8]) -> Result<String> {
        let n = self.bits;
        let terminator = (1u32 << n) - 1;
        let mut s = String::new();
        let mut acc: u32 = 0;
        let mut available = 0u32;
        for &b in bytes {
            acc = (acc << 8) | u32::from(b);
            available += 8;
            while available >= n {
                available -= n;
                let code = (acc >> available) & terminator;
                if code == terminator {
                    return Ok(s);
                }
                let c = self
                    .characters
                    .get(code as usize)
                    .ok_or_else(|| Error::InvalidValue(format!("code {code} outside alphabet of {}", self.len())))?;
                s.push(*c);
            }
            acc &= (1 << available) - 1;
        }
        Ok(s)
    }
}

/// Smallest `n` with `2^n > len`, so the all-ones code stays free.
pub fn bits_per_character(len: usize) -> u32 {
    usize::BITS - len.leading_zeros()
}
