//! Qualified names and namespace attributes (X.891 C.12, C.17, C.18).

use std::io::Write;

use log::trace;

use super::{DocumentState, Encoder};
use crate::constants::{
    ATTRIBUTE_LITERAL_QNAME_FLAG, ELEMENT_LITERAL_QNAME_FLAG, LITERAL_QNAME_NAMESPACE_NAME_FLAG, LITERAL_QNAME_PREFIX_FLAG,
    NAMESPACE_ATTRIBUTE, NAMESPACE_ATTRIBUTE_NAME_FLAG, NAMESPACE_ATTRIBUTE_PREFIX_FLAG, XMLNS_NAMESPACE_NAME,
};
use crate::error::{Error, Result};
use crate::integer;
use crate::qname::{QName, same_str};
use crate::vocabulary::{NameCategory, StringCategory};

/// Prefix and namespace indices of a literal qualified name.
struct LiteralParts {
    prefix: Option<u32>,
    namespace_name: Option<u32>,
}

impl LiteralParts {
    fn flags(&self) -> u8 {
        let mut b = 0;
        if self.namespace_name.is_some() {
            b |= LITERAL_QNAME_NAMESPACE_NAME_FLAG;
            if self.prefix.is_some() {
                b |= LITERAL_QNAME_PREFIX_FLAG;
            }
        }
        b
    }
}

impl<W: Write> Encoder<'_, W> {
    /// Namespace attribute (X.891 C.12): `0xCC` with prefix/name flags and
    /// the present parts as identifying strings.
    pub fn encode_namespace_attribute(&mut self, prefix: &str, namespace_name: &str) -> Result<()> {
        let mut b = NAMESPACE_ATTRIBUTE;
        if !prefix.is_empty() {
            b |= NAMESPACE_ATTRIBUTE_PREFIX_FLAG;
        }
        if !namespace_name.is_empty() {
            b |= NAMESPACE_ATTRIBUTE_NAME_FLAG;
        }
        self.out.write(b)?;
        if !prefix.is_empty() {
            self.encode_identifying_string(prefix, StringCategory::Prefix)?;
        }
        if !namespace_name.is_empty() {
            self.encode_identifying_string(namespace_name, StringCategory::NamespaceName)?;
        }
        Ok(())
    }

    /// Element name on the third bit of octet `b` (X.891 C.18).
    ///
    /// `b` carries the element's leading bits (e.g. the attribute flag). A
    /// known name is written as index, a new one as literal and registered.
    pub fn encode_element_qname(&mut self, name: QName<'_>, b: u8) -> Result<()> {
        self.state = DocumentState::InElement;
        let v = self.vocabulary.get();
        if let Some(index) = v.find_name(NameCategory::Element, name.local_name, name.prefix, name.namespace_name) {
            return integer::encode_on_third_bit(&mut self.out, b, index);
        }
        let parts = self.literal_parts(name)?;
        let index = self.vocabulary.get_mut().register_name(
            NameCategory::Element,
            name.prefix,
            name.namespace_name,
            name.local_name,
        );
        trace!("element name {name} -> {index}");
        self.out.write(b | ELEMENT_LITERAL_QNAME_FLAG | parts.flags())?;
        self.encode_literal_qname_tail(name, &parts)
    }

    /// Attribute name on the second bit (X.891 C.17).
    ///
    /// Returns `Ok(false)` without writing anything for an undeclared name in
    /// the `xmlns` namespace; the caller skips such attributes.
    pub fn encode_attribute_qname(&mut self, name: QName<'_>) -> Result<bool> {
        let v = self.vocabulary.get();
        if let Some(index) = v.find_name(NameCategory::Attribute, name.local_name, name.prefix, name.namespace_name) {
            integer::encode_on_second_bit_first_bit_zero(&mut self.out, index)?;
            return Ok(true);
        }
        let parts = match self.literal_parts(name) {
            Ok(parts) => parts,
            Err(Error::NamespaceNotIndexed(_)) if same_str(name.namespace_name, XMLNS_NAMESPACE_NAME) => {
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let index = self.vocabulary.get_mut().register_name(
            NameCategory::Attribute,
            name.prefix,
            name.namespace_name,
            name.local_name,
        );
        trace!("attribute name {name} -> {index}");
        self.out.write(ATTRIBUTE_LITERAL_QNAME_FLAG | parts.flags())?;
        self.encode_literal_qname_tail(name, &parts)?;
        Ok(true)
    }

    /// Looks up prefix and namespace name; both must have been declared.
    ///
    /// A prefix without namespace name is dropped.
    fn literal_parts(&self, name: QName<'_>) -> Result<LiteralParts> {
        if name.namespace_name.is_empty() {
            return Ok(LiteralParts {
                prefix: None,
                namespace_name: None,
            });
        }
        let v = self.vocabulary.get();
        let namespace_name = v
            .get(StringCategory::NamespaceName, name.namespace_name)
            .ok_or_else(|| Error::NamespaceNotIndexed(name.namespace_name.to_owned()))?;
        let prefix = if name.prefix.is_empty() {
            None
        } else {
            let index = v
                .get(StringCategory::Prefix, name.prefix)
                .ok_or_else(|| Error::PrefixNotIndexed(name.prefix.to_owned()))?;
            Some(index)
        };
        Ok(LiteralParts {
            prefix,
            namespace_name: Some(namespace_name),
        })
    }

    /// Prefix index, namespace index and local name of a literal name.
    fn encode_literal_qname_tail(&mut self, name: QName<'_>, parts: &LiteralParts) -> Result<()> {
        if let Some(ns) = parts.namespace_name {
            if let Some(prefix) = parts.prefix {
                integer::encode_on_second_bit_first_bit_one(&mut self.out, prefix)?;
            }
            integer::encode_on_second_bit_first_bit_one(&mut self.out, ns)?;
        }
        self.encode_identifying_string(name.local_name, StringCategory::LocalName)
    }
}
