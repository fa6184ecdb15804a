//! Encoding-algorithm data in attribute values and character chunks (X.891 C.14.4, C.15.4).

use std::io::Write;

use super::Encoder;
use crate::algorithm::{AlgorithmData, AlgorithmRef, BuiltinAlgorithm};
use crate::constants::{
    CHARACTER_CHUNK, CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG, ENCODING_ALGORITHM_APPLICATION_START,
    ENCODING_ALGORITHM_BUILTIN_END, NISTRING_EMPTY, NISTRING_ENCODING_ALGORITHM_FLAG,
};
use crate::error::{Error, Result};
use crate::integer::{LENGTH_FIFTH_BIT, LENGTH_SEVENTH_BIT};
use crate::vocabulary::StringCategory;

/// Where the algorithm data ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    AttributeValue,
    CharacterChunk,
}

impl<W: Write> Encoder<'_, W> {
    /// Attribute value produced by an encoding algorithm.
    ///
    /// Empty data writes the empty-string octet `0xFF`. Algorithm values are
    /// never added to the attribute-value table.
    pub fn encode_attribute_value_algorithm(&mut self, algorithm: AlgorithmRef<'_>, data: &AlgorithmData<'_>) -> Result<()> {
        let mut buf = self.take_scratch();
        let id = match self.algorithm_payload(algorithm, data, Form::AttributeValue, &mut buf) {
            Ok(id) => id,
            Err(e) => {
                self.scratch = buf;
                return Err(e);
            }
        };
        if buf.is_empty() {
            self.scratch = buf;
            return self.out.write(NISTRING_EMPTY);
        }
        self.out.write(NISTRING_ENCODING_ALGORITHM_FLAG | ((id & 0xF0) >> 4))?;
        self.emit((id & 0x0F) << 4, &LENGTH_FIFTH_BIT, buf)
    }

    /// Character content chunk produced by an encoding algorithm.
    ///
    /// Empty data writes nothing.
    pub fn encode_characters_algorithm(&mut self, algorithm: AlgorithmRef<'_>, data: &AlgorithmData<'_>) -> Result<()> {
        let mut buf = self.take_scratch();
        let id = match self.algorithm_payload(algorithm, data, Form::CharacterChunk, &mut buf) {
            Ok(id) => id,
            Err(e) => {
                self.scratch = buf;
                return Err(e);
            }
        };
        if buf.is_empty() {
            self.scratch = buf;
            return Ok(());
        }
        self.out.write(CHARACTER_CHUNK | CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG | ((id & 0xC0) >> 6))?;
        self.emit((id & 0x3F) << 2, &LENGTH_SEVENTH_BIT, buf)
    }

    /// CDATA section as character chunk (built-in algorithm 9, UTF-8 payload).
    pub fn encode_cdata(&mut self, text: &str) -> Result<()> {
        self.encode_characters_algorithm(AlgorithmRef::Id(BuiltinAlgorithm::Cdata.id()), &AlgorithmData::Text(text))
    }

    /// Resolves `algorithm`, writes its octets into `out` and returns the wire id.
    fn algorithm_payload(
        &self,
        algorithm: AlgorithmRef<'_>,
        data: &AlgorithmData<'_>,
        form: Form,
        out: &mut Vec<u8>,
    ) -> Result<u8> {
        match algorithm {
            AlgorithmRef::Uri(uri) => {
                let index = self
                    .vocabulary
                    .get()
                    .get(StringCategory::EncodingAlgorithm, uri)
                    .ok_or_else(|| Error::UnknownEncodingAlgorithmUri(uri.to_owned()))?;
                let id = index + ENCODING_ALGORITHM_APPLICATION_START;
                let id = u8::try_from(id).map_err(|_| Error::IntegerOutOfRange(u64::from(id)))?;
                match self.config.registered_algorithms.get(uri) {
                    Some(transcoder) => transcoder.encode_to_bytes(data, out)?,
                    None => match data {
                        AlgorithmData::Octets(bytes) => out.extend_from_slice(bytes),
                        _ => return Err(Error::MissingTranscoder(uri.to_owned())),
                    },
                }
                Ok(id)
            }
            AlgorithmRef::Id(id) if id <= ENCODING_ALGORITHM_BUILTIN_END => {
                let builtin = BuiltinAlgorithm::from_id(id).ok_or(Error::UnsupportedBuiltinAlgorithm(id))?;
                if builtin == BuiltinAlgorithm::Cdata && form == Form::AttributeValue {
                    return Err(Error::CdataNotAllowed);
                }
                builtin.encode_to_bytes(data, out)?;
                Ok(id)
            }
            AlgorithmRef::Id(id) if u32::from(id) >= ENCODING_ALGORITHM_APPLICATION_START => match data {
                AlgorithmData::Octets(bytes) => {
                    out.extend_from_slice(bytes);
                    Ok(id)
                }
                _ => Err(Error::algorithm_data_mismatch(format!("application algorithm {id}"), data.kind())),
            },
            AlgorithmRef::Id(id) => Err(Error::ReservedEncodingAlgorithmId(id)),
        }
    }
}
