//! XML text -> Fast Infoset, byte-exact.

use finfo::decoder_tables::{self, Table};
use finfo::vocabulary::{ExternalVocabulary, SerializerVocabulary, StringCategory};
use finfo::{CharacterEncodingScheme, EncoderConfig, Error, Serializer, encode_xml, encode_xml_str};

const HEADER: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// Header + Initial-Vocabulary-Octet abschneiden.
fn body(xml: &str, config: EncoderConfig) -> Vec<u8> {
    let out = encode_xml_str(xml, config).expect("encode");
    assert_eq!(&out[..4], &HEADER);
    assert_eq!(out[4], 0x00, "no initial vocabulary expected");
    out[5..].to_vec()
}

#[test]
fn repeated_names_and_chunks_use_indices() {
    let out = body("<r><a>x</a><a>x</a></r>", EncoderConfig::default());
    assert_eq!(
        out,
        vec![
            0x3C, 0x00, b'r', //
            0x3C, 0x00, b'a', 0x90, b'x', //
            0xF0, 0x01, 0xA0, // </a><a>x
            0xFF, 0xF0,
        ]
    );
}

#[test]
fn dispatch_tables_classify_encoded_octets() {
    let out = body("<r><a>x</a><a>x</a></r>", EncoderConfig::default());
    assert_eq!(Table::Dii.classify(out[0]).unwrap(), decoder_tables::EII_LITERAL);
    assert_eq!(Table::Eii.classify(out[3]).unwrap(), decoder_tables::EII_LITERAL);
    assert_eq!(Table::Eii.classify(out[6]).unwrap(), decoder_tables::CII_UTF8_SMALL_LENGTH);
    assert_eq!(Table::Eii.classify(out[8]).unwrap(), decoder_tables::TERMINATOR_SINGLE);
    assert_eq!(Table::Eii.classify(out[9]).unwrap(), decoder_tables::EII_NO_AIIS_INDEX_SMALL);
    assert_eq!(Table::Eii.classify(out[10]).unwrap(), decoder_tables::CII_INDEX_SMALL);
    assert_eq!(Table::Eii.classify(out[11]).unwrap(), decoder_tables::TERMINATOR_DOUBLE);
    assert_eq!(Table::Dii.classify(out[12]).unwrap(), decoder_tables::TERMINATOR_SINGLE);
}

#[test]
fn repeated_attribute_values_use_indices() {
    let out = body("<r a=\"v\"><s a=\"v\"/></r>", EncoderConfig::default());
    assert_eq!(
        out,
        vec![
            0x7C, 0x00, b'r', 0x78, 0x00, b'a', 0x40, b'v', //
            0xF0, 0x7C, 0x00, b's', 0x00, 0x80, //
            0xFF, 0xFF,
        ]
    );
    assert_eq!(Table::Aii.classify(out[3]).unwrap(), decoder_tables::AII_LITERAL);
    assert_eq!(Table::NiString.classify(out[6]).unwrap(), decoder_tables::NISTRING_UTF8_SMALL_LENGTH);
    assert_eq!(Table::Aii.classify(out[12]).unwrap(), decoder_tables::AII_INDEX_SMALL);
    assert_eq!(Table::NiString.classify(out[13]).unwrap(), decoder_tables::NISTRING_INDEX_SMALL);
    assert_eq!(Table::Aii.classify(out[14]).unwrap(), decoder_tables::AII_TERMINATOR_DOUBLE);
}

#[test]
fn utf16_scheme_for_chunks() {
    let config = EncoderConfig::default().character_encoding_scheme(CharacterEncodingScheme::Utf16Be);
    let out = body("<r>hi</r>", config);
    assert_eq!(out, vec![0x3C, 0x00, b'r', 0x96, 0x01, 0x00, b'h', 0x00, b'i', 0xFF]);
    assert_eq!(Table::Eii.classify(out[3]).unwrap(), decoder_tables::CII_UTF16_MEDIUM_LENGTH);
}

#[test]
fn zero_chunk_limit_keeps_chunks_literal() {
    let config = EncoderConfig::default().character_content_chunk_size(0, 0);
    let out = body("<r><a>hi</a><a>hi</a></r>", config);
    assert_eq!(
        out,
        vec![0x3C, 0x00, b'r', 0x3C, 0x00, b'a', 0x81, b'h', b'i', 0xF0, 0x01, 0x81, b'h', b'i', 0xFF, 0xF0]
    );
}

#[test]
fn xml_declaration_precedes_header() {
    let out = encode_xml_str("<r/>", EncoderConfig::with_xml_declaration()).unwrap();
    let decl = b"<?xml encoding='finf'?>";
    assert_eq!(&out[..decl.len()], decl);
    assert_eq!(&out[decl.len()..decl.len() + 4], &HEADER);
}

#[test]
fn external_vocabulary_is_announced() {
    let config = EncoderConfig::default().external_vocabulary(ExternalVocabulary::new("urn:v", SerializerVocabulary::new()));
    let out = encode_xml_str("<r/>", config).unwrap();
    assert_eq!(
        out,
        vec![0xE0, 0x00, 0x00, 0x01, 0x20, 0x10, 0x00, 0x04, b'u', b'r', b'n', b':', b'v', 0x3C, 0x00, b'r', 0xFF]
    );
}

#[test]
fn prolog_and_epilog_items() {
    let xml = "<!DOCTYPE r SYSTEM \"a.dtd\">\n<!--c--><r/><?t?>";
    let out = body(xml, EncoderConfig::default());
    assert_eq!(
        out,
        vec![
            0xC6, 0x04, b'a', b'.', b'd', b't', b'd', 0xF0, //
            0xE2, 0x40, b'c', //
            0x3C, 0x00, b'r', //
            0xF0, 0xE1, 0x00, b't', 0xFF, //
            0xF0,
        ]
    );
}

#[test]
fn ignore_flags_drop_items() {
    let config = EncoderConfig {
        ignore_comments: true,
        ignore_processing_instructions: true,
        ignore_dtd: true,
        ignore_whitespace_text_content: true,
        ..EncoderConfig::default()
    };
    let xml = "<!DOCTYPE r SYSTEM \"a.dtd\"><r>\n  <!--c--><?t d?>\n</r>";
    assert_eq!(body(xml, config), vec![0x3C, 0x00, b'r', 0xFF]);
}

#[test]
fn vocabulary_shared_across_documents() {
    let mut vocabulary = SerializerVocabulary::new();
    {
        let mut s = Serializer::with_vocabulary(Vec::new(), EncoderConfig::default(), &mut vocabulary);
        encode_xml("<r>text</r>".as_bytes(), &mut s).unwrap();
    }
    // Borrowed vocabulary is not cleared by start_document
    assert_eq!(vocabulary.get(StringCategory::CharacterContentChunk, "text"), Some(0));
    assert_eq!(vocabulary.get(StringCategory::LocalName, "r"), Some(0));

    let mut s = Serializer::with_vocabulary(Vec::new(), EncoderConfig::default(), &mut vocabulary);
    encode_xml("<r>text</r>".as_bytes(), &mut s).unwrap();
    let out = s.into_inner().unwrap();
    assert_eq!(&out[5..], &[0x00, 0xA0, 0xFF]);
}

#[test]
fn parse_errors_are_reported() {
    assert!(matches!(encode_xml_str("<r>", EncoderConfig::default()), Err(Error::XmlParseError(_))));
    assert!(matches!(encode_xml_str("<a:r/>", EncoderConfig::default()), Err(Error::XmlParseError(_))));
}
