//! XML text front end.
//!
//! Parses XML with quick-xml's `NsReader` and drives a [`Serializer`]:
//! namespace declarations, resolved element and attribute names, text with
//! predefined and character references resolved (CDATA sections are merged
//! into the surrounding text), comments, processing instructions and the
//! DOCTYPE's system and public ids. References to other general entities are
//! written as unexpanded entity references.

use std::borrow::Cow;
use std::io::{BufRead, Write};

use memchr::memchr;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::encoder::EncoderConfig;
use crate::error::{Error, Result};
use crate::qname::QName;
use crate::serializer::{Attribute, Namespace, Serializer};

/// Parses `reader` as one XML document and writes it through `serializer`.
///
/// Calls `start_document` first and `end_document` at the end of input.
pub fn encode_xml<R: BufRead, W: Write>(reader: R, serializer: &mut Serializer<'_, W>) -> Result<()> {
    let mut reader = NsReader::from_reader(reader);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut seen_root = false;
    // Text, CDATA und Referenzen werden zu einem Chunk zusammengefasst
    let mut pending_text = String::new();

    serializer.start_document()?;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                flush_text(&mut pending_text, serializer)?;
                if depth == 0 && seen_root {
                    return Err(Error::XmlParseError("more than one root element".into()));
                }
                start_element(&reader, &e, serializer)?;
                seen_root = true;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                flush_text(&mut pending_text, serializer)?;
                if depth == 0 && seen_root {
                    return Err(Error::XmlParseError("more than one root element".into()));
                }
                start_element(&reader, &e, serializer)?;
                seen_root = true;
                serializer.end_element()?;
            }
            Ok(Event::End(_)) => {
                flush_text(&mut pending_text, serializer)?;
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::XmlParseError("end tag without start tag".into()))?;
                serializer.end_element()?;
            }
            Ok(Event::Text(e)) => {
                let text = utf8(&e)?;
                if depth == 0 {
                    if !text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n')) {
                        return Err(Error::XmlParseError("character data outside root element".into()));
                    }
                } else {
                    pending_text.push_str(&normalize_line_endings(text));
                }
            }
            Ok(Event::CData(e)) => {
                if depth == 0 {
                    return Err(Error::XmlParseError("CDATA section outside root element".into()));
                }
                let raw = e.into_inner();
                pending_text.push_str(&normalize_line_endings(utf8(&raw)?));
            }
            Ok(Event::Comment(e)) => {
                flush_text(&mut pending_text, serializer)?;
                serializer.comment(&normalize_line_endings(utf8(&e)?))?;
            }
            Ok(Event::PI(e)) => {
                flush_text(&mut pending_text, serializer)?;
                let target = utf8(e.target())?;
                // Separator zwischen Target und Daten gehoert nicht zu den Daten
                let data = normalize_line_endings(utf8(e.content())?.trim_start());
                serializer.processing_instruction(target, &data)?;
            }
            Ok(Event::DocType(e)) => {
                let (system_id, public_id) = doctype_identifiers(utf8(&e)?);
                serializer.document_type_declaration(&system_id, &public_id)?;
            }
            Ok(Event::GeneralRef(e)) => {
                let name = utf8(e.as_ref())?;
                if depth == 0 {
                    return Err(Error::XmlParseError(format!("reference &{name}; outside root element")));
                }
                if let Some(code) = name.strip_prefix('#') {
                    let c = resolve_char_reference(code)
                        .ok_or_else(|| Error::XmlParseError(format!("invalid character reference &{name};")))?;
                    pending_text.push(c);
                } else if let Some(resolved) = resolve_predefined_entity(name) {
                    pending_text.push_str(resolved);
                } else {
                    flush_text(&mut pending_text, serializer)?;
                    serializer.entity_reference(name, "", "")?;
                }
            }
            Ok(Event::Decl(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlParseError(format!(
                    "parse XML error at {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(Error::XmlParseError(format!("{depth} element(s) not closed at end of input")));
    }
    if !seen_root {
        return Err(Error::XmlParseError("no root element".into()));
    }
    serializer.end_document()
}

/// Encodes an XML string into a new octet vector.
pub fn encode_xml_str(xml: &str, config: EncoderConfig) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::new(), config);
    encode_xml(xml.as_bytes(), &mut serializer)?;
    serializer.into_inner()
}

// ============================================================================
// Elemente
// ============================================================================

/// Resolved attribute: prefix, namespace name, local name, value.
type OwnedAttribute = (String, String, String, String);

fn start_element<R: BufRead, W: Write>(
    reader: &NsReader<R>,
    e: &BytesStart<'_>,
    serializer: &mut Serializer<'_, W>,
) -> Result<()> {
    let name = e.name();
    let (ns, local) = reader.resolver().resolve_element(name);
    let namespace_name = resolve_to_uri(ns)?;
    let local_name = utf8(local.as_ref())?;
    let prefix = split_prefix(name.as_ref()).map(utf8).transpose()?.unwrap_or("");

    let mut namespaces: Vec<(String, String)> = Vec::new();
    let mut attributes: Vec<OwnedAttribute> = Vec::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|er| Error::XmlParseError(er.to_string()))?;
        let key = attr.key.as_ref();
        let value = unescape_attribute_value(utf8(&attr.value)?)?.into_owned();

        if key == b"xmlns" {
            namespaces.push((String::new(), value));
            continue;
        }
        if let Some(p) = key.strip_prefix(b"xmlns:") {
            namespaces.push((utf8(p)?.to_owned(), value));
            continue;
        }

        let (ns, local) = reader.resolver().resolve_attribute(attr.key);
        let attr_ns = resolve_to_uri(ns)?;
        let attr_prefix = split_prefix(key).map(utf8).transpose()?.unwrap_or("");
        attributes.push((attr_prefix.to_owned(), attr_ns, utf8(local.as_ref())?.to_owned(), value));
    }

    let namespaces: Vec<Namespace<'_>> = namespaces.iter().map(|(p, n)| Namespace::new(p, n)).collect();
    let attributes: Vec<Attribute<'_>> = attributes
        .iter()
        .map(|(p, n, l, v)| Attribute::text(QName::new(p, n, l), v))
        .collect();
    serializer.start_element(QName::new(prefix, &namespace_name, local_name), &namespaces, &attributes)
}

fn resolve_to_uri(ns: ResolveResult<'_>) -> Result<String> {
    match ns {
        ResolveResult::Bound(ns) => Ok(utf8(ns.as_ref())?.to_owned()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(Error::XmlParseError(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn split_prefix(name: &[u8]) -> Option<&[u8]> {
    let pos = memchr(b':', name)?;
    Some(&name[..pos])
}

// ============================================================================
// Text
// ============================================================================

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::XmlParseError(format!("invalid UTF-8: {e}")))
}

fn flush_text<W: Write>(pending: &mut String, serializer: &mut Serializer<'_, W>) -> Result<()> {
    if !pending.is_empty() {
        serializer.characters(pending)?;
        pending.clear();
    }
    Ok(())
}

/// Resolves character and predefined references in an attribute value.
fn unescape_attribute_value(value: &str) -> Result<Cow<'_, str>> {
    let bytes = value.as_bytes();
    let Some(mut amp) = memchr(b'&', bytes) else {
        return Ok(normalize_line_endings(value));
    };
    let mut out = String::with_capacity(value.len());
    let mut pos = 0;
    loop {
        out.push_str(&value[pos..amp]);
        let semi = memchr(b';', &bytes[amp + 1..])
            .map(|rel| amp + 1 + rel)
            .ok_or_else(|| Error::XmlParseError("unterminated reference in attribute value".into()))?;
        let name = &value[amp + 1..semi];
        if let Some(code) = name.strip_prefix('#') {
            let c = resolve_char_reference(code)
                .ok_or_else(|| Error::XmlParseError(format!("invalid character reference &{name};")))?;
            out.push(c);
        } else if let Some(resolved) = resolve_predefined_entity(name) {
            out.push_str(resolved);
        } else {
            return Err(Error::XmlParseError(format!("unknown entity &{name}; in attribute value")));
        }
        pos = semi + 1;
        match memchr(b'&', &bytes[pos..]) {
            Some(rel) => amp = pos + rel,
            None => {
                out.push_str(&value[pos..]);
                break;
            }
        }
    }
    Ok(Cow::Owned(normalize_line_endings(&out).into_owned()))
}

/// `49` (dezimal) oder `x31` (hex), ohne `&#` und `;`.
fn resolve_char_reference(code: &str) -> Option<char> {
    let code_point = match code.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse::<u32>().ok()?,
    };
    char::from_u32(code_point)
}

/// XML 1.0 Sec. 2.11: \r\n -> \n, alleinstehende \r -> \n
fn normalize_line_endings(s: &str) -> Cow<'_, str> {
    if memchr(b'\r', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
}

// ============================================================================
// DOCTYPE
// ============================================================================

/// System and public id from the DOCTYPE content (`root PUBLIC "p" "s" [...]`).
fn doctype_identifiers(raw: &str) -> (String, String) {
    let trimmed = raw.trim();
    let name_end = trimmed
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(trimmed.len());
    let rest = trimmed[name_end..].trim_start();

    if let Some(after) = rest.strip_prefix("SYSTEM") {
        let (system, _) = quoted(after.trim_start());
        (system.to_owned(), String::new())
    } else if let Some(after) = rest.strip_prefix("PUBLIC") {
        let (public, remaining) = quoted(after.trim_start());
        let (system, _) = quoted(remaining.trim_start());
        (system.to_owned(), public.to_owned())
    } else {
        (String::new(), String::new())
    }
}

/// Splits a leading single- or double-quoted string off `s`.
fn quoted(s: &str) -> (&str, &str) {
    let Some(q) = s.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        return ("", s);
    };
    match s[1..].find(q) {
        Some(end) => (&s[1..1 + end], &s[end + 2..]),
        None => ("", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(xml: &str) -> Result<Vec<u8>> {
        encode_xml_str(xml, EncoderConfig::default())
    }

    /// Ohne Header und Initial-Vocabulary-Octet.
    fn body(xml: &str) -> Vec<u8> {
        encode(xml).unwrap()[5..].to_vec()
    }

    #[test]
    fn empty_root_element() {
        assert_eq!(body("<r/>"), vec![0x3C, 0x00, b'r', 0xFF]);
        assert_eq!(body("<?xml version=\"1.0\"?>\n<r></r>\n"), vec![0x3C, 0x00, b'r', 0xFF]);
    }

    #[test]
    fn references_merge_into_one_chunk() {
        // "a<b" als ein Chunk
        assert_eq!(body("<r>a&lt;&#98;</r>"), vec![0x3C, 0x00, b'r', 0x92, 0x00, b'a', b'<', b'b', 0xFF]);
    }

    #[test]
    fn cdata_merges_with_text() {
        assert_eq!(body("<r>x<![CDATA[<y>]]></r>"), vec![0x3C, 0x00, b'r', 0x92, 0x01, b'x', b'<', b'y', b'>', 0xFF]);
    }

    #[test]
    fn attribute_references_resolved() {
        let out = body("<r a=\"1&amp;2\"/>");
        assert_eq!(out, vec![0x7C, 0x00, b'r', 0x78, 0x00, b'a', 0x42, b'1', b'&', b'2', 0xFF, 0xF0]);
    }

    #[test]
    fn prefixed_names_resolve() {
        let out = body("<p:r xmlns:p=\"urn:a\" p:x=\"\"/>");
        assert_eq!(
            out,
            vec![
                0x78, 0xCF, 0x00, b'p', 0x04, b'u', b'r', b'n', b':', b'a', 0xF0, //
                0x3F, 0x81, 0x81, 0x00, b'r', //
                0x7B, 0x81, 0x81, 0x00, b'x', 0xFF, //
                0xFF, 0xF0,
            ]
        );
    }

    #[test]
    fn unknown_entity_becomes_reference() {
        let out = body("<r>&ent;</r>");
        assert_eq!(out, vec![0x3C, 0x00, b'r', 0xC8, 0x02, b'e', b'n', b't', 0xFF]);
    }

    #[test]
    fn doctype_identifiers_parsed() {
        assert_eq!(doctype_identifiers("r SYSTEM \"r.dtd\""), ("r.dtd".into(), String::new()));
        assert_eq!(
            doctype_identifiers(" r PUBLIC '-//X' \"x.dtd\" [ <!ENTITY e \"v\"> ]"),
            ("x.dtd".into(), "-//X".into())
        );
        assert_eq!(doctype_identifiers("r [ ]"), (String::new(), String::new()));
    }

    #[test]
    fn line_endings_normalized() {
        assert_eq!(normalize_line_endings("a\r\nb\rc"), "a\nb\nc");
        assert!(matches!(normalize_line_endings("abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn malformed_documents_fail() {
        for xml in ["", "<a>", "<a></b>", "text", "<a/><b/>", "<p:a/>", "<a x=\"&zz;\"/>", "<a>&#xZZ;</a>"] {
            assert!(matches!(encode(xml), Err(Error::XmlParseError(_))), "{xml:?}");
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut s = Serializer::new(Vec::new(), EncoderConfig::default());
        let input: &[u8] = b"<a>\xFF\xFE</a>";
        assert!(encode_xml(input, &mut s).is_err());
    }
}
