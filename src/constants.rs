//! Wire constants of the Fast Infoset binary format (X.891 clauses 12 and C).
//!
//! Flag values are already shifted into their octet position. Integer and
//! length limits are exclusive upper bounds of the respective tier.

// ============================================================================
// Dokument
// ============================================================================

/// Fixed binary header: identification `0xE000` followed by version 1 (X.891 12.6, 12.7).
pub const BINARY_HEADER: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// Optional XML declarations that may precede the binary header (X.891 12.3).
///
/// Index 0 is the shortest form and the one the encoder writes.
pub const XML_DECLARATION_VALUES: [&str; 9] = [
    "<?xml encoding='finf'?>",
    "<?xml version='1.0' encoding='finf'?>",
    "<?xml version='1.1' encoding='finf'?>",
    "<?xml encoding='finf' standalone='no'?>",
    "<?xml encoding='finf' standalone='yes'?>",
    "<?xml version='1.0' encoding='finf' standalone='no'?>",
    "<?xml version='1.1' encoding='finf' standalone='no'?>",
    "<?xml version='1.0' encoding='finf' standalone='yes'?>",
    "<?xml version='1.1' encoding='finf' standalone='yes'?>",
];

pub const DOCUMENT_ADDITIONAL_DATA_FLAG: u8 = 0x40;
pub const DOCUMENT_INITIAL_VOCABULARY_FLAG: u8 = 0x20;
pub const DOCUMENT_NOTATIONS_FLAG: u8 = 0x10;
pub const DOCUMENT_UNPARSED_ENTITIES_FLAG: u8 = 0x08;
pub const DOCUMENT_CHARACTER_ENCODING_SCHEME: u8 = 0x04;
pub const DOCUMENT_STANDALONE_FLAG: u8 = 0x02;
pub const DOCUMENT_VERSION_FLAG: u8 = 0x01;

/// First octet of the initial vocabulary: external vocabulary present (X.891 C.2.5).
pub const INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG: u8 = 0x10;

// ============================================================================
// Terminatoren
// ============================================================================

pub const TERMINATOR: u8 = 0xF0;
pub const DOUBLE_TERMINATOR: u8 = 0xFF;

// ============================================================================
// Element / Attribut / Namespace (X.891 C.3, C.4, C.12)
// ============================================================================

pub const ELEMENT: u8 = 0x00;
pub const ELEMENT_ATTRIBUTE_FLAG: u8 = 0x40;
pub const ELEMENT_NAMESPACES_FLAG: u8 = 0x38;
pub const ELEMENT_LITERAL_QNAME_FLAG: u8 = 0x3C;

pub const ATTRIBUTE_LITERAL_QNAME_FLAG: u8 = 0x78;

pub const LITERAL_QNAME_PREFIX_FLAG: u8 = 0x02;
pub const LITERAL_QNAME_NAMESPACE_NAME_FLAG: u8 = 0x01;

pub const NAMESPACE_ATTRIBUTE: u8 = 0xCC;
pub const NAMESPACE_ATTRIBUTE_PREFIX_FLAG: u8 = 0x02;
pub const NAMESPACE_ATTRIBUTE_NAME_FLAG: u8 = 0x01;

// ============================================================================
// Sonstige Informationseinheiten (X.891 C.5 to C.11)
// ============================================================================

pub const PROCESSING_INSTRUCTION: u8 = 0xE1;
pub const COMMENT: u8 = 0xE2;

pub const DOCUMENT_TYPE_DECLARATION: u8 = 0xC4;
pub const DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG: u8 = 0x02;
pub const DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

pub const UNEXPANDED_ENTITY_REFERENCE: u8 = 0xC8;
pub const UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG: u8 = 0x02;
pub const UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

pub const NOTATIONS: u8 = 0xC0;
pub const UNPARSED_ENTITIES: u8 = 0xD0;

// ============================================================================
// Character chunks (X.891 C.7, C.15)
// ============================================================================

pub const CHARACTER_CHUNK: u8 = 0x80;
pub const CHARACTER_CHUNK_ADD_TO_TABLE_FLAG: u8 = 0x10;
pub const CHARACTER_CHUNK_UTF_8_FLAG: u8 = 0x00;
pub const CHARACTER_CHUNK_UTF_16_FLAG: u8 = 0x04;
pub const CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG: u8 = 0x08;
pub const CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG: u8 = 0x0C;
/// Index form of a character chunk, followed by an integer on the fourth bit.
pub const CHARACTER_CHUNK_INDEX_FLAG: u8 = 0x20;

// ============================================================================
// Non identifying strings (X.891 C.14)
// ============================================================================

pub const NISTRING_ADD_TO_TABLE_FLAG: u8 = 0x40;
pub const NISTRING_UTF_8_FLAG: u8 = 0x00;
pub const NISTRING_UTF_16_FLAG: u8 = 0x10;
pub const NISTRING_RESTRICTED_ALPHABET_FLAG: u8 = 0x20;
pub const NISTRING_ENCODING_ALGORITHM_FLAG: u8 = 0x30;
/// Index form of a non identifying string (first bit set).
pub const NISTRING_INDEX_FLAG: u8 = 0x80;
/// The empty string: index form with all remaining bits set (X.891 C.26).
pub const NISTRING_EMPTY: u8 = 0xFF;

// ============================================================================
// Integer-Tiers (X.891 C.25 to C.28)
// ============================================================================

/// Largest value (exclusive) any "on the Nth bit" integer codec accepts.
pub const INTEGER_MAXIMUM_SIZE: u32 = 1_048_576;

pub const INTEGER_2ND_BIT_SMALL_LIMIT: u32 = 64;
pub const INTEGER_2ND_BIT_MEDIUM_LIMIT: u32 = 8256;
pub const INTEGER_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const INTEGER_2ND_BIT_LARGE_FLAG: u8 = 0x60;
pub const INTEGER_2ND_BIT_SMALL_MASK: u8 = 0x3F;
pub const INTEGER_2ND_BIT_MEDIUM_MASK: u8 = 0x1F;
pub const INTEGER_2ND_BIT_LARGE_MASK: u8 = 0x0F;

pub const INTEGER_3RD_BIT_SMALL_LIMIT: u32 = 32;
pub const INTEGER_3RD_BIT_MEDIUM_LIMIT: u32 = 2080;
pub const INTEGER_3RD_BIT_LARGE_LIMIT: u32 = 526_368;
pub const INTEGER_3RD_BIT_MEDIUM_FLAG: u8 = 0x20;
pub const INTEGER_3RD_BIT_LARGE_FLAG: u8 = 0x28;
pub const INTEGER_3RD_BIT_LARGE_LARGE_FLAG: u8 = 0x30;
pub const INTEGER_3RD_BIT_SMALL_MASK: u8 = 0x1F;
pub const INTEGER_3RD_BIT_MEDIUM_MASK: u8 = 0x07;
pub const INTEGER_3RD_BIT_LARGE_MASK: u8 = 0x07;
pub const INTEGER_3RD_BIT_LARGE_LARGE_MASK: u8 = 0x0F;

pub const INTEGER_4TH_BIT_SMALL_LIMIT: u32 = 16;
pub const INTEGER_4TH_BIT_MEDIUM_LIMIT: u32 = 1040;
pub const INTEGER_4TH_BIT_LARGE_LIMIT: u32 = 263_184;
pub const INTEGER_4TH_BIT_MEDIUM_FLAG: u8 = 0x10;
pub const INTEGER_4TH_BIT_LARGE_FLAG: u8 = 0x14;
pub const INTEGER_4TH_BIT_LARGE_LARGE_FLAG: u8 = 0x18;
pub const INTEGER_4TH_BIT_SMALL_MASK: u8 = 0x0F;
pub const INTEGER_4TH_BIT_MEDIUM_MASK: u8 = 0x03;
pub const INTEGER_4TH_BIT_LARGE_MASK: u8 = 0x03;
pub const INTEGER_4TH_BIT_LARGE_LARGE_MASK: u8 = 0x0F;

// ============================================================================
// Octet-String-Laengen (X.891 C.22 to C.24)
// ============================================================================

pub const OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT: u32 = 65;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT: u32 = 321;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG: u8 = 0x60;
pub const OCTET_STRING_LENGTH_2ND_BIT_SMALL_MASK: u8 = 0x3F;

pub const OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT: u32 = 9;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT: u32 = 265;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG: u8 = 0x08;
pub const OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG: u8 = 0x0C;
pub const OCTET_STRING_LENGTH_5TH_BIT_SMALL_MASK: u8 = 0x07;

pub const OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT: u32 = 3;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT: u32 = 259;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG: u8 = 0x02;
pub const OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG: u8 = 0x03;
pub const OCTET_STRING_LENGTH_7TH_BIT_SMALL_MASK: u8 = 0x01;

// ============================================================================
// Encoding algorithms / restricted alphabets (X.891 9, 10)
// ============================================================================

/// Last id of the built-in encoding algorithm table (CDATA).
pub const ENCODING_ALGORITHM_BUILTIN_END: u8 = 9;
/// First id available for application encoding algorithms.
pub const ENCODING_ALGORITHM_APPLICATION_START: u32 = 32;
/// Largest encoding algorithm id that fits the wire format.
pub const ENCODING_ALGORITHM_APPLICATION_MAX: u32 = 255;

pub const RESTRICTED_ALPHABET_BUILTIN_END: u8 = 1;
pub const RESTRICTED_ALPHABET_APPLICATION_START: u32 = 16;
pub const RESTRICTED_ALPHABET_APPLICATION_MAX: u32 = 255;

// ============================================================================
// Vordefinierte Namen
// ============================================================================

pub const XML_NAMESPACE_PREFIX: &str = "xml";
pub const XML_NAMESPACE_NAME: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE_PREFIX: &str = "xmlns";
pub const XMLNS_NAMESPACE_NAME: &str = "http://www.w3.org/2000/xmlns/";
