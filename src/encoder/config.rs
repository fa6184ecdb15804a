use std::rc::Rc;

use crate::FastHashMap;
use crate::algorithm::EncodingAlgorithm;
use crate::character::CharacterEncodingScheme;
use crate::octet_buffer::DEFAULT_BUFFER_SIZE;
use crate::vocabulary::ExternalVocabulary;

/// Default upper bound (inclusive) for strings added to the attribute-value
/// and content-chunk tables.
pub const DEFAULT_MAX_TABLE_STRING_SIZE: usize = 32;

/// Encoder-Konfiguration (Session-Einstellungen).
///
/// Length thresholds are inclusive, `min <= len <= max`. Memory limits are
/// octets; a table stops growing once it holds `limit / 2` characters.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// XML-Deklaration `<?xml encoding='finf'?>` vor den Header schreiben.
    pub xml_declaration: bool,
    /// Encoding fuer Literal-Strings in Attributwerten und Chunks.
    pub character_encoding_scheme: CharacterEncodingScheme,

    pub min_attribute_value_size: usize,
    pub max_attribute_value_size: usize,
    pub attribute_value_map_memory_limit: usize,

    pub min_character_content_chunk_size: usize,
    pub max_character_content_chunk_size: usize,
    pub character_content_chunk_map_memory_limit: usize,

    pub ignore_dtd: bool,
    pub ignore_comments: bool,
    pub ignore_processing_instructions: bool,
    /// Whitespace-only character content is dropped.
    pub ignore_whitespace_text_content: bool,

    /// Transcoder fuer Application-Algorithmen, nach URI.
    pub registered_algorithms: FastHashMap<String, Rc<dyn EncodingAlgorithm>>,
    /// Read-only base vocabulary announced in the initial vocabulary.
    pub external_vocabulary: Option<ExternalVocabulary>,
    /// Batch size of the octet buffer.
    pub buffer_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            xml_declaration: false,
            character_encoding_scheme: CharacterEncodingScheme::Utf8,
            min_attribute_value_size: 0,
            max_attribute_value_size: DEFAULT_MAX_TABLE_STRING_SIZE,
            attribute_value_map_memory_limit: usize::MAX,
            min_character_content_chunk_size: 0,
            max_character_content_chunk_size: DEFAULT_MAX_TABLE_STRING_SIZE,
            character_content_chunk_map_memory_limit: usize::MAX,
            ignore_dtd: false,
            ignore_comments: false,
            ignore_processing_instructions: false,
            ignore_whitespace_text_content: false,
            registered_algorithms: FastHashMap::default(),
            external_vocabulary: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl EncoderConfig {
    /// Konfiguration mit XML-Deklaration.
    pub fn with_xml_declaration() -> Self {
        Self {
            xml_declaration: true,
            ..Self::default()
        }
    }

    pub fn character_encoding_scheme(mut self, scheme: CharacterEncodingScheme) -> Self {
        self.character_encoding_scheme = scheme;
        self
    }

    pub fn attribute_value_size(mut self, min: usize, max: usize) -> Self {
        self.min_attribute_value_size = min;
        self.max_attribute_value_size = max;
        self
    }

    pub fn character_content_chunk_size(mut self, min: usize, max: usize) -> Self {
        self.min_character_content_chunk_size = min;
        self.max_character_content_chunk_size = max;
        self
    }

    pub fn external_vocabulary(mut self, vocabulary: ExternalVocabulary) -> Self {
        self.external_vocabulary = Some(vocabulary);
        self
    }

    /// Registers a transcoder for the application algorithm `uri`.
    pub fn register_algorithm(mut self, uri: impl Into<String>, algorithm: Rc<dyn EncodingAlgorithm>) -> Self {
        self.registered_algorithms.insert(uri.into(), algorithm);
        self
    }

    #[inline]
    pub(crate) fn attribute_value_length_in_limits(&self, len: usize) -> bool {
        len >= self.min_attribute_value_size && len <= self.max_attribute_value_size
    }

    #[inline]
    pub(crate) fn character_content_chunk_length_in_limits(&self, len: usize) -> bool {
        len >= self.min_character_content_chunk_size && len <= self.max_character_content_chunk_size
    }

    /// Zeichen-Budget der Attributwert-Tabelle.
    pub(crate) fn attribute_value_budget(&self) -> usize {
        self.attribute_value_map_memory_limit / 2
    }

    /// Zeichen-Budget der Chunk- und Other-String-Tabellen.
    pub(crate) fn character_content_chunk_budget(&self) -> usize {
        self.character_content_chunk_map_memory_limit / 2
    }
}
