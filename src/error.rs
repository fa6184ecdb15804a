//! Central error types for the Fast Infoset encoder.
//!
//! Each variant references the relevant ITU-T X.891 | ISO/IEC 24824-1 clause.
//! Every error is fatal for the document being encoded: nothing is retried
//! internally and the encoder state afterwards is unspecified.

use core::fmt;
use std::borrow::Cow;

/// All error types raised while encoding a Fast Infoset document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // ========================================================================
    // Encoding-Algorithm-Fehler
    // ========================================================================
    /// An encoding algorithm URI is not present in the vocabulary (X.891 7.17).
    UnknownEncodingAlgorithmUri(String),
    /// Encoding algorithm identifiers 10 to 31 are reserved (X.891 10.2).
    ReservedEncodingAlgorithmId(u8),
    /// A built-in algorithm was requested in a calling form that does not allow it.
    ///
    /// CDATA (id 9) is only permitted for character content chunks (X.891 10.10).
    CdataNotAllowed,
    /// A built-in algorithm id is unknown or not supported (X.891 10).
    UnsupportedBuiltinAlgorithm(u8),
    /// The supplied data does not match what the algorithm expects.
    AlgorithmDataMismatch {
        /// Name of the algorithm.
        algorithm: Cow<'static, str>,
        /// Kind of data that was supplied.
        found: Cow<'static, str>,
    },
    /// An application algorithm has no registered transcoder and the data is not raw octets.
    MissingTranscoder(String),

    // ========================================================================
    // Vokabular-Konsistenz
    // ========================================================================
    /// A namespace name was used in a qualified name before it was declared (X.891 C.17, C.18).
    NamespaceNotIndexed(String),
    /// A prefix was used in a qualified name before it was declared (X.891 C.17, C.18).
    PrefixNotIndexed(String),
    /// A restricted alphabet is not present in the vocabulary (X.891 7.16).
    UnknownRestrictedAlphabet(String),

    // ========================================================================
    // Wertebereich
    // ========================================================================
    /// An integer exceeds the range of its codec (X.891 C.25 to C.28).
    IntegerOutOfRange(u64),
    /// A character is not a member of the restricted alphabet in use (X.891 9.2).
    CharacterOutOfAlphabet(char),
    /// A restricted alphabet definition is unusable (fewer than two characters or duplicates).
    InvalidAlphabet(Cow<'static, str>),

    // ========================================================================
    // Fehlerhafte Eingaben
    // ========================================================================
    /// A UTF-16 high surrogate is not followed by a low surrogate, or a low surrogate stands alone.
    UnterminatedSurrogate(u16),
    /// A UTF-8 octet sequence is malformed (X.891 C.22).
    InvalidUtf8 {
        /// Byte-Offset der fehlerhaften Sequenz.
        offset: usize,
    },
    /// Character data for a built-in algorithm could not be parsed.
    InvalidValue(String),

    // ========================================================================
    // Decode-Hilfen
    // ========================================================================
    /// The octet stream ended in the middle of a structure.
    PrematureEndOfStream,
    /// The leading octet classified to the ILLEGAL or UNSUPPORTED state.
    IllegalState {
        /// Name der Tabelle.
        table: &'static str,
        /// Das klassifizierte Octet.
        octet: u8,
    },

    // ========================================================================
    // Umgebung
    // ========================================================================
    /// Writing to or flushing the output sink failed.
    Io(String),
    /// XML parsing failed.
    XmlParseError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEncodingAlgorithmUri(uri) => {
                write!(f, "encoding algorithm URI '{uri}' is not in the vocabulary (X.891 7.17)")
            }
            Self::ReservedEncodingAlgorithmId(id) => {
                write!(f, "encoding algorithm identifier {id} is reserved, ids 10 to 31 are not assignable (X.891 10.2)")
            }
            Self::CdataNotAllowed => {
                write!(f, "CDATA encoding algorithm only allowed for character content (X.891 10.10)")
            }
            Self::UnsupportedBuiltinAlgorithm(id) => {
                write!(f, "unsupported built-in encoding algorithm {id} (X.891 10)")
            }
            Self::AlgorithmDataMismatch { algorithm, found } => {
                write!(f, "encoding algorithm '{algorithm}' cannot encode {found} data (X.891 10)")
            }
            Self::MissingTranscoder(uri) => {
                write!(f, "no transcoder registered for encoding algorithm '{uri}' and data is not raw octets (X.891 10)")
            }
            Self::NamespaceNotIndexed(uri) => {
                write!(f, "namespace name '{uri}' not indexed, declare it first (X.891 C.17, C.18)")
            }
            Self::PrefixNotIndexed(prefix) => {
                write!(f, "prefix '{prefix}' not indexed, declare it first (X.891 C.17, C.18)")
            }
            Self::UnknownRestrictedAlphabet(alphabet) => {
                write!(f, "restricted alphabet \"{alphabet}\" is not in the vocabulary (X.891 7.16)")
            }
            Self::IntegerOutOfRange(v) => {
                write!(f, "integer {v} out of range for codec (X.891 C.25 to C.28)")
            }
            Self::CharacterOutOfAlphabet(c) => {
                write!(f, "character {c:?} (U+{:04X}) out of restricted alphabet range (X.891 9.2)", *c as u32)
            }
            Self::InvalidAlphabet(msg) => write!(f, "invalid restricted alphabet: {msg} (X.891 9.2)"),
            Self::UnterminatedSurrogate(unit) => {
                write!(f, "unterminated UTF-16 surrogate 0x{unit:04X}")
            }
            Self::InvalidUtf8 { offset } => {
                write!(f, "malformed UTF-8 sequence at offset {offset} (X.891 C.22)")
            }
            Self::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            Self::PrematureEndOfStream => write!(f, "premature end of octet stream"),
            Self::IllegalState { table, octet } => {
                write!(f, "octet 0x{octet:02X} is illegal in state table {table}")
            }
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::XmlParseError(msg) => write!(f, "XML parse error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl Error {
    /// Creates an `AlgorithmDataMismatch` error.
    pub fn algorithm_data_mismatch(
        algorithm: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::AlgorithmDataMismatch {
            algorithm: algorithm.into(),
            found: found.into(),
        }
    }

    /// Creates an `InvalidAlphabet` error.
    pub fn invalid_alphabet(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidAlphabet(msg.into())
    }
}

/// Result type alias for Fast Infoset operations.
pub type Result<T> = core::result::Result<T, Error>;
