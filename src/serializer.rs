//! Event serializer: one call per information item.
//!
//! [`Serializer`] drives an [`Encoder`] in document order. It owns the
//! sequencing the encoder leaves to its caller: pending terminators are
//! written before each new item, namespace-bearing elements are written
//! under a mark and get their attribute flag patched in, namespace
//! declarations given as attributes are skipped, and the ignore-* settings
//! of the [`EncoderConfig`] are honoured.
//!
//! # Beispiel
//!
//! ```
//! use finfo::encoder::EncoderConfig;
//! use finfo::qname::QName;
//! use finfo::serializer::{Attribute, Serializer};
//!
//! let mut s = Serializer::new(Vec::new(), EncoderConfig::default());
//! s.start_document().unwrap();
//! s.start_element(QName::local("a"), &[], &[Attribute::text(QName::local("x"), "1")]).unwrap();
//! s.characters("hi").unwrap();
//! s.end_element().unwrap();
//! s.end_document().unwrap();
//! let bytes = s.into_inner().unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//! ```

use std::io::Write;

use crate::algorithm::{AlgorithmData, AlgorithmRef};
use crate::alphabet::AlphabetRef;
use crate::constants::{
    ELEMENT_ATTRIBUTE_FLAG, ELEMENT_NAMESPACES_FLAG, TERMINATOR, XMLNS_NAMESPACE_NAME, XMLNS_NAMESPACE_PREFIX,
};
use crate::encoder::{Encoder, EncoderConfig};
use crate::error::{Error, Result};
use crate::qname::QName;
use crate::vocabulary::SerializerVocabulary;

// ============================================================================
// Event-Inhalte
// ============================================================================

/// A namespace declaration in scope from the element it is given with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Namespace<'a> {
    /// Empty for the default namespace.
    pub prefix: &'a str,
    /// Empty to undeclare the default namespace.
    pub namespace_name: &'a str,
}

impl<'a> Namespace<'a> {
    pub fn new(prefix: &'a str, namespace_name: &'a str) -> Self {
        Self { prefix, namespace_name }
    }
}

/// Value of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Text(&'a str),
    /// Text packed with a restricted alphabet.
    Alphabet(AlphabetRef<'a>, &'a str),
    /// Typed data written by an encoding algorithm.
    Algorithm(AlgorithmRef<'a>, AlgorithmData<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute<'a> {
    pub name: QName<'a>,
    pub value: AttributeValue<'a>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: QName<'a>, value: AttributeValue<'a>) -> Self {
        Self { name, value }
    }

    /// Attribute with a plain text value.
    pub fn text(name: QName<'a>, value: &'a str) -> Self {
        Self::new(name, AttributeValue::Text(value))
    }

    /// True for `xmlns` / `xmlns:p` attributes.
    pub fn is_namespace_declaration(&self) -> bool {
        let n = &self.name;
        n.namespace_name == XMLNS_NAMESPACE_NAME
            || (n.namespace_name.is_empty() && (n.prefix == XMLNS_NAMESPACE_PREFIX || n.local_name == XMLNS_NAMESPACE_PREFIX))
    }
}

/// Character content of one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterContent<'a> {
    Text(&'a str),
    /// UTF-16 code units; size limits count units.
    Utf16(&'a [u16]),
    Alphabet(AlphabetRef<'a>, &'a str),
    Algorithm(AlgorithmRef<'a>, AlgorithmData<'a>),
    /// CDATA section (built-in algorithm 9).
    Cdata(&'a str),
}

impl CharacterContent<'_> {
    fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Alphabet(_, s) | Self::Cdata(s) => s.is_empty(),
            Self::Utf16(units) => units.is_empty(),
            Self::Algorithm(_, data) => data.primitive_len() == 0,
        }
    }

    /// Only XML whitespace (space, tab, CR, LF).
    fn is_whitespace(&self) -> bool {
        match self {
            Self::Text(s) => s.bytes().all(is_xml_space),
            Self::Utf16(units) => units.iter().all(|&u| u < 0x80 && is_xml_space(u as u8)),
            _ => false,
        }
    }
}

#[inline]
fn is_xml_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

// ============================================================================
// Serializer
// ============================================================================

/// Writes a document through an [`Encoder`], one call per information item.
#[derive(Debug)]
pub struct Serializer<'v, W: Write> {
    encoder: Encoder<'v, W>,
    /// Namespace-Attribute des naechsten Elements offen (Mark gesetzt).
    element_has_namespaces: bool,
    depth: usize,
}

impl<W: Write> Serializer<'static, W> {
    pub fn new(sink: W, config: EncoderConfig) -> Self {
        Self::from_encoder(Encoder::new(sink, config))
    }
}

impl<'v, W: Write> Serializer<'v, W> {
    /// Serializer over a caller-supplied vocabulary that survives documents.
    pub fn with_vocabulary(sink: W, config: EncoderConfig, vocabulary: &'v mut SerializerVocabulary) -> Self {
        Self::from_encoder(Encoder::with_vocabulary(sink, config, vocabulary))
    }

    pub fn from_encoder(encoder: Encoder<'v, W>) -> Self {
        Self {
            encoder,
            element_has_namespaces: false,
            depth: 0,
        }
    }

    pub fn encoder(&self) -> &Encoder<'v, W> {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut Encoder<'v, W> {
        &mut self.encoder
    }

    /// Open elements.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_inner(self) -> Result<W> {
        self.encoder.into_inner()
    }

    // --- Dokument ---

    /// Header and initial vocabulary.
    pub fn start_document(&mut self) -> Result<()> {
        self.encoder.reset();
        self.element_has_namespaces = false;
        self.depth = 0;
        let declaration = self.encoder.config().xml_declaration;
        self.encoder.encode_header(declaration)?;
        self.encoder.encode_initial_vocabulary()
    }

    /// Closes the document and flushes the sink.
    pub fn end_document(&mut self) -> Result<()> {
        self.encoder.encode_document_termination()
    }

    // --- Elemente ---

    /// Declares a namespace on the next element.
    ///
    /// The first declaration writes the element octet under a mark; the
    /// attribute flag is patched in by [`Serializer::start_element`].
    pub fn namespace_declaration(&mut self, prefix: &str, namespace_name: &str) -> Result<()> {
        if !self.element_has_namespaces {
            self.element_has_namespaces = true;
            self.encoder.encode_termination()?;
            self.encoder.mark();
            self.encoder.write(ELEMENT_NAMESPACES_FLAG)?;
        }
        self.encoder.encode_namespace_attribute(prefix, namespace_name)
    }

    /// Element with its namespace declarations and attributes.
    ///
    /// Attributes that are namespace declarations are skipped; give those
    /// through `namespaces` instead.
    pub fn start_element(&mut self, name: QName<'_>, namespaces: &[Namespace<'_>], attributes: &[Attribute<'_>]) -> Result<()> {
        for ns in namespaces {
            self.namespace_declaration(ns.prefix, ns.namespace_name)?;
        }
        let has_attributes = attributes.iter().any(|a| !a.is_namespace_declaration());

        if self.element_has_namespaces {
            self.element_has_namespaces = false;
            self.encoder.write(TERMINATOR)?;
            if has_attributes {
                self.encoder.or_at_mark(ELEMENT_ATTRIBUTE_FLAG)?;
            }
            self.encoder.reset_mark();
            self.encoder.encode_element_qname(name, 0)?;
        } else {
            self.encoder.encode_termination()?;
            let b = if has_attributes { ELEMENT_ATTRIBUTE_FLAG } else { 0 };
            self.encoder.encode_element_qname(name, b)?;
        }

        if has_attributes {
            for attribute in attributes.iter().filter(|a| !a.is_namespace_declaration()) {
                if !self.encoder.encode_attribute_qname(attribute.name)? {
                    continue;
                }
                match attribute.value {
                    AttributeValue::Text(v) => self.encoder.encode_attribute_value(v)?,
                    AttributeValue::Alphabet(alphabet, v) => self.encoder.encode_attribute_value_alphabet(alphabet, v)?,
                    AttributeValue::Algorithm(algorithm, ref data) => {
                        self.encoder.encode_attribute_value_algorithm(algorithm, data)?
                    }
                }
            }
            self.encoder.set_pending_terminator();
        }
        self.depth += 1;
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::InvalidValue("end_element without open element".into()));
        }
        self.depth -= 1;
        self.encoder.encode_element_termination()
    }

    // --- Inhalt ---

    /// Text content; empty text is dropped, whitespace-only text if configured.
    pub fn characters(&mut self, text: &str) -> Result<()> {
        self.character_content(CharacterContent::Text(text))
    }

    pub fn character_content(&mut self, content: CharacterContent<'_>) -> Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        if self.encoder.config().ignore_whitespace_text_content && content.is_whitespace() {
            return Ok(());
        }
        self.encoder.encode_termination()?;
        match content {
            CharacterContent::Text(s) => self.encoder.encode_characters(s),
            CharacterContent::Utf16(units) => self.encoder.encode_characters_utf16(units),
            CharacterContent::Alphabet(alphabet, s) => self.encoder.encode_characters_alphabet(alphabet, s),
            CharacterContent::Algorithm(algorithm, ref data) => self.encoder.encode_characters_algorithm(algorithm, data),
            CharacterContent::Cdata(s) => self.encoder.encode_cdata(s),
        }
    }

    pub fn comment(&mut self, text: &str) -> Result<()> {
        if self.encoder.config().ignore_comments {
            return Ok(());
        }
        self.encoder.encode_termination()?;
        self.encoder.encode_comment(text)
    }

    pub fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        if self.encoder.config().ignore_processing_instructions {
            return Ok(());
        }
        self.encoder.encode_termination()?;
        self.encoder.encode_processing_instruction(target, data)
    }

    /// Document type declaration without children.
    pub fn document_type_declaration(&mut self, system_id: &str, public_id: &str) -> Result<()> {
        if self.encoder.config().ignore_dtd {
            return Ok(());
        }
        self.encoder.encode_termination()?;
        self.encoder.encode_document_type_declaration(system_id, public_id)?;
        self.encoder.encode_element_termination()
    }

    pub fn entity_reference(&mut self, name: &str, system_id: &str, public_id: &str) -> Result<()> {
        self.encoder.encode_termination()?;
        self.encoder.encode_unexpanded_entity_reference(name, system_id, public_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::BuiltinAlphabet;
    use crate::vocabulary::StringCategory;

    fn serializer(config: EncoderConfig) -> Serializer<'static, Vec<u8>> {
        let mut s = Serializer::new(Vec::new(), config);
        s.start_document().unwrap();
        s
    }

    /// Ohne Header und Initial-Vocabulary-Octet.
    fn body(s: Serializer<'_, Vec<u8>>) -> Vec<u8> {
        s.into_inner().unwrap()[5..].to_vec()
    }

    // --- Elemente ---

    #[test]
    fn empty_root() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("r"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(body(s), vec![0x3C, 0x00, b'r', 0xFF]);
    }

    #[test]
    fn nested_elements_double_terminators() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.start_element(QName::local("b"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        // </b></a> -> 0xFF, Dokumentende -> 0xF0
        assert_eq!(body(s), vec![0x3C, 0x00, b'a', 0x3C, 0x00, b'b', 0xFF, 0xF0]);
    }

    #[test]
    fn sibling_after_end_element_writes_terminator() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.start_element(QName::local("b"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.start_element(QName::local("b"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(
            body(s),
            vec![0x3C, 0x00, b'a', 0x3C, 0x00, b'b', 0xF0, 0x01, 0xFF, 0xF0]
        );
    }

    #[test]
    fn attributes_end_with_terminator() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[Attribute::text(QName::local("x"), "1")])
            .unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        // Attributliste + Element 0xFF, Dokument 0xF0
        assert_eq!(
            body(s),
            vec![0x7C, 0x00, b'a', 0x78, 0x00, b'x', 0x40, b'1', 0xFF, 0xF0]
        );
    }

    #[test]
    fn namespaces_patch_attribute_flag() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(
            QName::new("p", "urn:a", "e"),
            &[Namespace::new("p", "urn:a")],
            &[Attribute::text(QName::local("x"), "")],
        )
        .unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(
            body(s),
            vec![
                0x78, 0xCF, 0x00, b'p', 0x04, b'u', b'r', b'n', b':', b'a', 0xF0, // Namespaces
                0x3F, 0x81, 0x81, 0x00, b'e', // p:e
                0x78, 0x00, b'x', 0xFF, // x=""
                0xFF, 0xF0,
            ]
        );
    }

    #[test]
    fn namespaces_without_attributes_keep_plain_octet() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::new("", "urn:a", "e"), &[Namespace::new("", "urn:a")], &[])
            .unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        let out = body(s);
        assert_eq!(out[0], 0x38);
        assert_eq!(&out[out.len() - 1..], &[0xFF]);
    }

    #[test]
    fn xmlns_attributes_are_skipped() {
        let mut s = serializer(EncoderConfig::default());
        let xmlns = Attribute::text(QName::new("xmlns", XMLNS_NAMESPACE_NAME, "p"), "urn:a");
        s.start_element(QName::local("a"), &[], &[xmlns]).unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(body(s), vec![0x3C, 0x00, b'a', 0xFF]);
    }

    #[test]
    fn typed_attribute_values() {
        let mut s = serializer(EncoderConfig::default());
        let attrs = [
            Attribute::new(QName::local("n"), AttributeValue::Alphabet(AlphabetRef::Builtin(BuiltinAlphabet::Numeric), "7")),
            Attribute::new(QName::local("i"), AttributeValue::Algorithm(AlgorithmRef::Id(3), AlgorithmData::Ints(&[2]))),
        ];
        s.start_element(QName::local("a"), &[], &attrs).unwrap();
        let out = s.encoder().buffered().to_vec();
        assert_eq!(
            &out[5..],
            &[
                0x7C, 0x00, b'a', //
                0x78, 0x00, b'n', 0x60, 0x00, 0x7F, //
                0x78, 0x00, b'i', 0x30, 0x33, 0x00, 0x00, 0x00, 0x02,
            ]
        );
    }

    #[test]
    fn end_element_without_start_fails() {
        let mut s = serializer(EncoderConfig::default());
        assert!(matches!(s.end_element(), Err(Error::InvalidValue(_))));
    }

    // --- Inhalt ---

    #[test]
    fn characters_between_elements() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.characters("hi").unwrap();
        s.characters("").unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(body(s), vec![0x3C, 0x00, b'a', 0x91, b'h', b'i', 0xFF]);
    }

    #[test]
    fn whitespace_dropped_only_when_configured() {
        let mut config = EncoderConfig::default();
        config.ignore_whitespace_text_content = true;
        let mut s = serializer(config);
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.characters(" \n\t").unwrap();
        s.character_content(CharacterContent::Utf16(&[0x20, 0x0A])).unwrap();
        s.characters(" x ").unwrap();
        assert_eq!(s.encoder().vocabulary().len(StringCategory::CharacterContentChunk), 1);

        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.characters(" ").unwrap();
        assert_eq!(s.encoder().vocabulary().len(StringCategory::CharacterContentChunk), 1);
    }

    #[test]
    fn cdata_and_typed_content() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.character_content(CharacterContent::Cdata("<x>")).unwrap();
        s.character_content(CharacterContent::Algorithm(AlgorithmRef::Id(0), AlgorithmData::Octets(&[0xAB])))
            .unwrap();
        s.character_content(CharacterContent::Alphabet(AlphabetRef::Builtin(BuiltinAlphabet::DateTime), "Z"))
            .unwrap();
        let out = s.encoder().buffered().to_vec();
        assert_eq!(
            &out[8..],
            &[0x8C, 0x26, 0x00, b'<', b'x', b'>', 0x8C, 0x00, 0xAB, 0x98, 0x04, 0xDF]
        );
    }

    #[test]
    fn comments_and_pis_respect_ignore_flags() {
        let mut config = EncoderConfig::default();
        config.ignore_comments = true;
        config.ignore_processing_instructions = true;
        config.ignore_dtd = true;
        let mut s = serializer(config);
        s.document_type_declaration("a.dtd", "").unwrap();
        s.comment("c").unwrap();
        s.processing_instruction("t", "d").unwrap();
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(body(s), vec![0x3C, 0x00, b'a', 0xFF]);
    }

    #[test]
    fn prolog_items_before_root() {
        let mut s = serializer(EncoderConfig::default());
        s.document_type_declaration("a.dtd", "").unwrap();
        s.comment("c").unwrap();
        s.processing_instruction("t", "").unwrap();
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.entity_reference("e", "", "").unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        assert_eq!(
            body(s),
            vec![
                0xC6, 0x04, b'a', b'.', b'd', b't', b'd', 0xF0, // DTD ohne Kinder
                0xE2, 0x40, b'c', //
                0xE1, 0x00, b't', 0xFF, //
                0x3C, 0x00, b'a', //
                0xC8, 0x00, b'e', 0xFF,
            ]
        );
    }

    #[test]
    fn start_document_resets_between_documents() {
        let mut s = serializer(EncoderConfig::default());
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        s.start_document().unwrap();
        s.start_element(QName::local("a"), &[], &[]).unwrap();
        s.end_element().unwrap();
        s.end_document().unwrap();
        let out = s.into_inner().unwrap();
        let doc = [0xE0, 0x00, 0x00, 0x01, 0x00, 0x3C, 0x00, b'a', 0xFF];
        assert_eq!(out, [doc, doc].concat());
    }
}
