//! String shapes: identifying strings, non-identifying strings on the first
//! and third bit, restricted alphabets (X.891 C.13 to C.15, C.19 to C.24).

use std::io::Write;

use log::{trace, warn};

use super::Encoder;
use crate::alphabet::AlphabetRef;
use crate::character::CharacterEncodingScheme;
use crate::constants::{
    CHARACTER_CHUNK, CHARACTER_CHUNK_ADD_TO_TABLE_FLAG, CHARACTER_CHUNK_INDEX_FLAG, CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG,
    CHARACTER_CHUNK_UTF_16_FLAG, CHARACTER_CHUNK_UTF_8_FLAG, NISTRING_ADD_TO_TABLE_FLAG, NISTRING_EMPTY,
    NISTRING_RESTRICTED_ALPHABET_FLAG, NISTRING_UTF_16_FLAG, NISTRING_UTF_8_FLAG, RESTRICTED_ALPHABET_APPLICATION_START,
};
use crate::error::{Error, Result};
use crate::integer::{self, LENGTH_FIFTH_BIT, LENGTH_SEVENTH_BIT, LengthTiers};
use crate::vocabulary::StringCategory;

/// Outcome of a table lookup for a non-identifying string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// Schon in der Tabelle.
    Hit(u32),
    /// Neu eingetragen, Literal mit add-to-table Flag.
    Added,
    Literal,
}

/// Chunk index octet: `10 1` prefix before a fourth-bit integer.
const CHUNK_INDEX: u8 = CHARACTER_CHUNK | CHARACTER_CHUNK_INDEX_FLAG;

impl<W: Write> Encoder<'_, W> {
    // ========================================================================
    // Identifying strings
    // ========================================================================

    /// Identifying string on the first bit (X.891 C.13).
    ///
    /// Known strings are written as index, new ones as UTF-8 literal and
    /// added to `category`.
    pub fn encode_identifying_string(&mut self, s: &str, category: StringCategory) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidValue(format!("empty identifying string ({category:?})")));
        }
        if let Some(index) = self.vocabulary.get_mut().obtain_index(category, s) {
            return integer::encode_on_second_bit_first_bit_one(&mut self.out, index);
        }
        trace!("{category:?} += {s:?}");
        integer::encode_length_on_second_bit(&mut self.out, s.len())?;
        self.out.write_bytes(s.as_bytes())
    }

    // ========================================================================
    // Non-identifying strings, first bit
    // ========================================================================

    /// Non-identifying string on the first bit (X.891 C.14).
    ///
    /// Used for attribute values and other strings (comments, PI data). An
    /// empty string is the single octet `0xFF`.
    pub(crate) fn encode_non_identifying_string_on_first_bit(
        &mut self,
        s: &str,
        category: StringCategory,
        add_to_table: bool,
        must_be_added: bool,
    ) -> Result<()> {
        if s.is_empty() {
            return self.out.write(NISTRING_EMPTY);
        }
        let ces = self.nistring_ces();
        let b = match self.lookup(category, s, s.chars().count(), add_to_table, must_be_added) {
            Lookup::Hit(index) => return integer::encode_on_second_bit_first_bit_one(&mut self.out, index),
            Lookup::Added => NISTRING_ADD_TO_TABLE_FLAG | ces,
            Lookup::Literal => ces,
        };
        let mut buf = self.take_scratch();
        self.config.character_encoding_scheme.encode(s, &mut buf);
        self.emit(b, &LENGTH_FIFTH_BIT, buf)
    }

    /// Attribute value as non-identifying string; table use follows the
    /// attribute-value size limits.
    pub fn encode_attribute_value(&mut self, value: &str) -> Result<()> {
        let add = self.config.attribute_value_length_in_limits(value.chars().count());
        self.encode_non_identifying_string_on_first_bit(value, StringCategory::AttributeValue, add, false)
    }

    /// Attribute value packed with a restricted alphabet (X.891 C.14.4, C.20).
    pub fn encode_attribute_value_alphabet(&mut self, alphabet: AlphabetRef<'_>, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.out.write(NISTRING_EMPTY);
        }
        let mut buf = self.take_scratch();
        let id = match self.pack_alphabet(alphabet, value, &mut buf) {
            Ok(id) => id,
            Err(e) => {
                self.scratch = buf;
                return Err(e);
            }
        };
        let len = value.chars().count();
        let add = self.config.attribute_value_length_in_limits(len);
        let b = match self.lookup(StringCategory::AttributeValue, value, len, add, false) {
            Lookup::Hit(index) => {
                self.scratch = buf;
                return integer::encode_on_second_bit_first_bit_one(&mut self.out, index);
            }
            Lookup::Added => NISTRING_RESTRICTED_ALPHABET_FLAG | NISTRING_ADD_TO_TABLE_FLAG,
            Lookup::Literal => NISTRING_RESTRICTED_ALPHABET_FLAG,
        };
        self.out.write(b | ((id & 0xF0) >> 4))?;
        self.emit((id & 0x0F) << 4, &LENGTH_FIFTH_BIT, buf)
    }

    // ========================================================================
    // Character content chunks, third bit
    // ========================================================================

    /// Character content chunk (X.891 C.15 via C.7). Empty text writes nothing.
    pub fn encode_characters(&mut self, text: &str) -> Result<()> {
        self.encode_chunk_text(text, text.chars().count())
    }

    /// Character content chunk from UTF-16 code units.
    ///
    /// Size limits count code units here.
    pub fn encode_characters_utf16(&mut self, units: &[u16]) -> Result<()> {
        let text = char::decode_utf16(units.iter().copied())
            .collect::<std::result::Result<String, _>>()
            .map_err(|e| Error::UnterminatedSurrogate(e.unpaired_surrogate()))?;
        self.encode_chunk_text(&text, units.len())
    }

    fn encode_chunk_text(&mut self, text: &str, len: usize) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let ces = self.chunk_ces();
        let add = self.config.character_content_chunk_length_in_limits(len);
        let b = match self.lookup(StringCategory::CharacterContentChunk, text, len, add, false) {
            Lookup::Hit(index) => return integer::encode_on_fourth_bit(&mut self.out, CHUNK_INDEX, index),
            Lookup::Added => CHARACTER_CHUNK_ADD_TO_TABLE_FLAG | ces,
            Lookup::Literal => ces,
        };
        let mut buf = self.take_scratch();
        self.config.character_encoding_scheme.encode(text, &mut buf);
        self.emit(b, &LENGTH_SEVENTH_BIT, buf)
    }

    /// Character content chunk packed with a restricted alphabet (X.891 C.15.4).
    pub fn encode_characters_alphabet(&mut self, alphabet: AlphabetRef<'_>, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut buf = self.take_scratch();
        let id = match self.pack_alphabet(alphabet, text, &mut buf) {
            Ok(id) => id,
            Err(e) => {
                self.scratch = buf;
                return Err(e);
            }
        };
        let len = text.chars().count();
        let add = self.config.character_content_chunk_length_in_limits(len);
        let b = match self.lookup(StringCategory::CharacterContentChunk, text, len, add, false) {
            Lookup::Hit(index) => {
                self.scratch = buf;
                return integer::encode_on_fourth_bit(&mut self.out, CHUNK_INDEX, index);
            }
            Lookup::Added => CHARACTER_CHUNK | CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG | CHARACTER_CHUNK_ADD_TO_TABLE_FLAG,
            Lookup::Literal => CHARACTER_CHUNK | CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG,
        };
        self.out.write(b | ((id & 0xC0) >> 6))?;
        self.emit((id & 0x3F) << 2, &LENGTH_SEVENTH_BIT, buf)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn nistring_ces(&self) -> u8 {
        match self.config.character_encoding_scheme {
            CharacterEncodingScheme::Utf8 => NISTRING_UTF_8_FLAG,
            CharacterEncodingScheme::Utf16Be => NISTRING_UTF_16_FLAG,
        }
    }

    fn chunk_ces(&self) -> u8 {
        CHARACTER_CHUNK
            | match self.config.character_encoding_scheme {
                CharacterEncodingScheme::Utf8 => CHARACTER_CHUNK_UTF_8_FLAG,
                CharacterEncodingScheme::Utf16Be => CHARACTER_CHUNK_UTF_16_FLAG,
            }
    }

    /// Index lookup with insertion while the table's budget allows it.
    fn lookup(&mut self, category: StringCategory, s: &str, len: usize, add_to_table: bool, must_be_added: bool) -> Lookup {
        if !add_to_table && !must_be_added {
            return Lookup::Literal;
        }
        let can_add = must_be_added || self.can_add_to_table(category, len);
        let v = self.vocabulary.get_mut();
        if can_add {
            match v.obtain_index(category, s) {
                Some(index) => Lookup::Hit(index),
                None => Lookup::Added,
            }
        } else {
            v.get(category, s).map_or(Lookup::Literal, Lookup::Hit)
        }
    }

    /// True while `category` stays below half its memory limit with `len` more characters.
    fn can_add_to_table(&mut self, category: StringCategory, len: usize) -> bool {
        let (budget, slot) = match category {
            StringCategory::AttributeValue => (self.config.attribute_value_budget(), 0),
            _ => (self.config.character_content_chunk_budget(), 1),
        };
        let total = self.vocabulary.get().total_character_count(category);
        if total.saturating_add(len) < budget {
            return true;
        }
        if !self.budget_warned[slot] {
            self.budget_warned[slot] = true;
            warn!("{category:?} table full at {total} of {budget} characters, writing literals");
        }
        false
    }

    /// Packs `s` with `alphabet` into `out` and returns the alphabet's wire id.
    fn pack_alphabet(&self, alphabet: AlphabetRef<'_>, s: &str, out: &mut Vec<u8>) -> Result<u8> {
        match alphabet {
            AlphabetRef::Builtin(builtin) => {
                builtin.pack(s, out)?;
                Ok(builtin.id())
            }
            AlphabetRef::Application(characters) => {
                let v = self.vocabulary.get();
                let unknown = || Error::UnknownRestrictedAlphabet(characters.to_owned());
                let index = v.get(StringCategory::RestrictedAlphabet, characters).ok_or_else(unknown)?;
                let ra = v.restricted_alphabet(index).ok_or_else(unknown)?;
                let id = index + RESTRICTED_ALPHABET_APPLICATION_START;
                let id = u8::try_from(id).map_err(|_| Error::IntegerOutOfRange(u64::from(id)))?;
                ra.pack(s, out)?;
                Ok(id)
            }
        }
    }

    /// Leerer Scratch-Puffer (Kapazitaet bleibt erhalten).
    pub(super) fn take_scratch(&mut self) -> Vec<u8> {
        let mut buf = std::mem::take(&mut self.scratch);
        buf.clear();
        buf
    }

    /// Writes `buf` with a length prefix continuing octet `b`, then keeps it as scratch.
    pub(super) fn emit(&mut self, b: u8, tiers: &LengthTiers, buf: Vec<u8>) -> Result<()> {
        let result = integer::encode_length(&mut self.out, b, buf.len(), tiers).and_then(|()| self.out.write_bytes(&buf));
        self.scratch = buf;
        result
    }
}
