//! finfo – Fast Infoset (ITU-T X.891) encoder
//!
//! Writes XML infosets as Fast Infoset documents: a low-level [`Encoder`]
//! with one method per wire item, a [`Serializer`] that sequences whole
//! documents from XML events, and an XML text front end in [`xml`].
//! [`decoder_tables`] holds the octet dispatch tables a decoder switches on.
//!
//! # Beispiel
//!
//! ```
//! use finfo::{Attribute, EncoderConfig, QName, Serializer};
//!
//! let mut s = Serializer::new(Vec::new(), EncoderConfig::default());
//! s.start_document().unwrap();
//! s.start_element(QName::local("greeting"), &[], &[Attribute::text(QName::local("lang"), "en")]).unwrap();
//! s.characters("Hello").unwrap();
//! s.end_element().unwrap();
//! s.end_document().unwrap();
//! let bytes = s.into_inner().unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//!
//! // Aus XML-Text
//! let doc = finfo::xml::encode_xml_str("<greeting lang='en'>Hello</greeting>", EncoderConfig::default()).unwrap();
//! assert_eq!(doc, bytes);
//! ```

pub mod algorithm;
pub mod alphabet;
pub mod character;
pub mod constants;
pub mod decoder_tables;
pub mod encoder;
pub mod error;
pub mod integer;
pub mod octet_buffer;
pub mod qname;
pub mod serializer;
pub mod vocabulary;
pub mod xml;

pub use error::{Error, Result};

/// HashMap mit ahash (schnell, nicht DoS-resistent; fuer interne Tabellen).
pub type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Encoder
pub use encoder::{DocumentState, Encoder, EncoderConfig, PendingTerminator};
pub use serializer::{Attribute, AttributeValue, CharacterContent, Namespace, Serializer};

// Public API: Types
pub use algorithm::{AlgorithmData, AlgorithmRef, AlgorithmValue, BuiltinAlgorithm, EncodingAlgorithm};
pub use alphabet::{AlphabetRef, BuiltinAlphabet, RestrictedAlphabet};
pub use character::CharacterEncodingScheme;
pub use qname::{QName, QualifiedName};
pub use vocabulary::{ExternalVocabulary, NameCategory, SerializerVocabulary, StringCategory};

// Public API: XML
pub use xml::{encode_xml, encode_xml_str};
