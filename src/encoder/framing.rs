//! Header, initial vocabulary and terminators (X.891 12.6 to 12.8, C.2).

use std::io::Write;

use log::debug;

use super::{DocumentState, Encoder, PendingTerminator, SessionVocabulary};
use crate::constants::{
    BINARY_HEADER, COMMENT, DOCUMENT_INITIAL_VOCABULARY_FLAG, DOCUMENT_TYPE_DECLARATION,
    DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG, DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG, DOUBLE_TERMINATOR,
    INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG, PROCESSING_INSTRUCTION, TERMINATOR, UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG,
    UNEXPANDED_ENTITY_REFERENCE, UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG, XML_DECLARATION_VALUES,
};
use crate::error::Result;
use crate::integer;
use crate::vocabulary::StringCategory;

impl<W: Write> Encoder<'_, W> {
    /// Writes the optional XML declaration and the four header octets.
    pub fn encode_header(&mut self, include_xml_declaration: bool) -> Result<()> {
        if include_xml_declaration {
            self.out.write_bytes(XML_DECLARATION_VALUES[0].as_bytes())?;
        }
        self.out.write_bytes(&BINARY_HEADER)?;
        self.state = DocumentState::HeaderWritten;
        debug!("header written (xml declaration: {include_xml_declaration})");
        Ok(())
    }

    /// Writes the document's optional-components octet.
    ///
    /// An owned vocabulary is cleared first (back to its external base, if
    /// any). With an external vocabulary the octet announces an initial
    /// vocabulary that only names the external URI.
    pub fn encode_initial_vocabulary(&mut self) -> Result<()> {
        if let SessionVocabulary::Owned(ref mut v) = self.vocabulary {
            v.clear();
            debug!("vocabulary cleared");
        }
        let external = self.vocabulary.get().external_vocabulary_uri().map(str::to_owned);
        match external {
            None => self.out.write(0)?,
            Some(uri) => {
                debug!("initial vocabulary: external {uri}");
                self.out.write(DOCUMENT_INITIAL_VOCABULARY_FLAG)?;
                self.out.write(INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG)?;
                self.out.write(0)?;
                integer::encode_length_on_second_bit(&mut self.out, uri.len())?;
                self.out.write_bytes(uri.as_bytes())?;
            }
        }
        self.state = DocumentState::VocabularyNegotiated;
        Ok(())
    }

    /// Ends the children (or attributes) of the current item.
    ///
    /// Nothing is written yet: a single pending terminator turns into a
    /// double one, a pending double one is written out first.
    pub fn encode_element_termination(&mut self) -> Result<()> {
        self.terminator = match self.terminator {
            PendingTerminator::None => PendingTerminator::Single,
            PendingTerminator::Single => PendingTerminator::Double,
            PendingTerminator::Double => {
                self.out.write(DOUBLE_TERMINATOR)?;
                PendingTerminator::Single
            }
        };
        Ok(())
    }

    /// Writes the pending terminator, if any.
    pub fn encode_termination(&mut self) -> Result<()> {
        match std::mem::take(&mut self.terminator) {
            PendingTerminator::None => {}
            PendingTerminator::Single => self.out.write(TERMINATOR)?,
            PendingTerminator::Double => self.out.write(DOUBLE_TERMINATOR)?,
        }
        Ok(())
    }

    /// Closes the document and flushes buffer and sink.
    pub fn encode_document_termination(&mut self) -> Result<()> {
        self.encode_element_termination()?;
        self.encode_termination()?;
        self.out.flush()?;
        self.state = DocumentState::Terminated;
        debug!("document terminated");
        Ok(())
    }

    /// Schedules a single terminator (end of an attribute list or DTD children).
    pub(crate) fn set_pending_terminator(&mut self) {
        self.terminator = PendingTerminator::Single;
    }

    // ========================================================================
    // Kommentare, PIs, DTD, Entity-Referenzen
    // ========================================================================

    /// Comment (X.891 C.8): `0xE2` and the text in the other-string table.
    pub fn encode_comment(&mut self, text: &str) -> Result<()> {
        self.out.write(COMMENT)?;
        let add = self.config.character_content_chunk_length_in_limits(text.chars().count());
        self.encode_non_identifying_string_on_first_bit(text, StringCategory::OtherString, add, false)
    }

    /// Processing instruction (X.891 C.5): `0xE1`, target, data.
    pub fn encode_processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.out.write(PROCESSING_INSTRUCTION)?;
        self.encode_identifying_string(target, StringCategory::OtherNcName)?;
        let add = self.config.character_content_chunk_length_in_limits(data.chars().count());
        self.encode_non_identifying_string_on_first_bit(data, StringCategory::OtherString, add, false)
    }

    /// Document type declaration header (X.891 C.9).
    ///
    /// Its children (processing instructions) follow; the caller ends the
    /// list with [`Encoder::encode_element_termination`].
    pub fn encode_document_type_declaration(&mut self, system_id: &str, public_id: &str) -> Result<()> {
        let mut b = DOCUMENT_TYPE_DECLARATION;
        if !system_id.is_empty() {
            b |= DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG;
        }
        if !public_id.is_empty() {
            b |= DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG;
        }
        self.out.write(b)?;
        if !system_id.is_empty() {
            self.encode_identifying_string(system_id, StringCategory::OtherUri)?;
        }
        if !public_id.is_empty() {
            self.encode_identifying_string(public_id, StringCategory::OtherUri)?;
        }
        Ok(())
    }

    /// Unexpanded entity reference (X.891 C.6).
    pub fn encode_unexpanded_entity_reference(&mut self, name: &str, system_id: &str, public_id: &str) -> Result<()> {
        let mut b = UNEXPANDED_ENTITY_REFERENCE;
        if !system_id.is_empty() {
            b |= UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG;
        }
        if !public_id.is_empty() {
            b |= UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG;
        }
        self.out.write(b)?;
        self.encode_identifying_string(name, StringCategory::OtherNcName)?;
        if !system_id.is_empty() {
            self.encode_identifying_string(system_id, StringCategory::OtherUri)?;
        }
        if !public_id.is_empty() {
            self.encode_identifying_string(public_id, StringCategory::OtherUri)?;
        }
        Ok(())
    }
}
