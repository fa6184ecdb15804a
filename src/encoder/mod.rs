//! Fast Infoset Encoder – X.891 Clause 12, Annex C
//!
//! Low-level primitives that write one information item (or one part of it)
//! to an [`OctetBuffer`]. The encoder does not check that the calls form a
//! well-formed document; [`crate::serializer::Serializer`] drives it in the
//! right order.
//!
//! # Beispiel
//!
//! ```
//! use finfo::encoder::{Encoder, EncoderConfig};
//! use finfo::qname::QName;
//!
//! let mut enc = Encoder::new(Vec::new(), EncoderConfig::default());
//! enc.encode_header(false).unwrap();
//! enc.encode_initial_vocabulary().unwrap();
//! enc.encode_element_qname(QName::local("root"), 0).unwrap();
//! enc.encode_element_termination().unwrap();
//! enc.encode_document_termination().unwrap();
//! let bytes = enc.into_inner().unwrap();
//! assert_eq!(bytes, vec![0xE0, 0x00, 0x00, 0x01, 0x00, 0x3C, 0x03, b'r', b'o', b'o', b't', 0xFF]);
//! ```

mod algorithm;
mod config;
mod framing;
mod qname;
mod strings;


pub use config::{DEFAULT_MAX_TABLE_STRING_SIZE, EncoderConfig};

use std::io::Write;

use crate::error::Result;
use crate::octet_buffer::OctetBuffer;
use crate::vocabulary::SerializerVocabulary;

// ============================================================================
// Zustand
// ============================================================================

/// Terminator owed to the stream but not yet written.
///
/// Two pending single terminators merge into one `0xFF` octet (X.891 C.3.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingTerminator {
    #[default]
    None,
    Single,
    Double,
}

/// Coarse progress of the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentState {
    #[default]
    NotStarted,
    HeaderWritten,
    VocabularyNegotiated,
    InElement,
    Terminated,
}

/// Vocabulary of a session: owned by the encoder or lent by the caller.
///
/// Only an owned vocabulary is cleared between documents.
#[derive(Debug)]
enum SessionVocabulary<'v> {
    Owned(SerializerVocabulary),
    Borrowed(&'v mut SerializerVocabulary),
}

impl SessionVocabulary<'_> {
    #[inline]
    fn get(&self) -> &SerializerVocabulary {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }

    #[inline]
    fn get_mut(&mut self) -> &mut SerializerVocabulary {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Fast Infoset encoder writing into `W`.
#[derive(Debug)]
pub struct Encoder<'v, W: Write> {
    out: OctetBuffer<W>,
    config: EncoderConfig,
    vocabulary: SessionVocabulary<'v>,
    terminator: PendingTerminator,
    state: DocumentState,
    /// Scratch fuer Literal-Strings und Algorithmus-Payloads.
    scratch: Vec<u8>,
    /// Budget-Warnung schon ausgegeben (Attributwerte, Chunks).
    budget_warned: [bool; 2],
}

impl<W: Write> Encoder<'static, W> {
    /// Encoder with its own vocabulary.
    ///
    /// If the config carries an external vocabulary, the session vocabulary is
    /// layered on top of it.
    pub fn new(sink: W, config: EncoderConfig) -> Self {
        let vocabulary = match config.external_vocabulary {
            Some(ref ext) => SerializerVocabulary::with_external(ext),
            None => SerializerVocabulary::new(),
        };
        Self::build(sink, config, SessionVocabulary::Owned(vocabulary))
    }
}

impl<'v, W: Write> Encoder<'v, W> {
    /// Encoder using a caller-supplied vocabulary.
    ///
    /// The vocabulary is never cleared by the encoder, so its tables carry
    /// over into later documents.
    pub fn with_vocabulary(sink: W, config: EncoderConfig, vocabulary: &'v mut SerializerVocabulary) -> Self {
        Self::build(sink, config, SessionVocabulary::Borrowed(vocabulary))
    }

    fn build(sink: W, config: EncoderConfig, vocabulary: SessionVocabulary<'v>) -> Self {
        Self {
            out: OctetBuffer::with_capacity(sink, config.buffer_size),
            config,
            vocabulary,
            terminator: PendingTerminator::None,
            state: DocumentState::NotStarted,
            scratch: Vec::new(),
            budget_warned: [false; 2],
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &SerializerVocabulary {
        self.vocabulary.get()
    }

    /// Mutable access, e.g. to register alphabets or algorithm URIs.
    pub fn vocabulary_mut(&mut self) -> &mut SerializerVocabulary {
        self.vocabulary.get_mut()
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn pending_terminator(&self) -> PendingTerminator {
        self.terminator
    }

    /// Octets not yet handed to the sink.
    pub fn buffered(&self) -> &[u8] {
        self.out.buffered()
    }

    pub fn sink(&self) -> &W {
        self.out.sink()
    }

    /// Prepares the encoder for the next document.
    ///
    /// Buffered octets are discarded, the vocabulary stays until
    /// [`Encoder::encode_initial_vocabulary`].
    pub fn reset(&mut self) {
        self.out.reset();
        self.terminator = PendingTerminator::None;
        self.state = DocumentState::NotStarted;
        self.budget_warned = [false; 2];
    }

    /// Flushes and returns the sink.
    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner()
    }

    /// Marks the current position for a later [`Encoder::or_at_mark`].
    pub(crate) fn mark(&mut self) {
        self.out.mark();
    }

    pub(crate) fn or_at_mark(&mut self, bits: u8) -> Result<()> {
        self.out.or_at_mark(bits)
    }

    pub(crate) fn reset_mark(&mut self) {
        self.out.reset_mark();
    }

    #[inline]
    pub(crate) fn write(&mut self, octet: u8) -> Result<()> {
        self.out.write(octet)
    }
}
