//! Serializer vocabulary (X.891 7.2, 8).
//!
//! One [`StringIntMap`] per string category and one [`QualifiedNameMap`]
//! per name category. Indices are assigned in first-occurrence order and
//! never reused within a session.
//!
//! A vocabulary may sit on top of a read-only base taken from an
//! [`ExternalVocabulary`]: lookups consult the base first, new entries
//! continue after the base's last index, and [`SerializerVocabulary::clear`]
//! only drops what the session added.
//!
//! Lifecycle: the encoder clears an owned vocabulary at the start of every
//! document. A borrowed one is left alone.

use std::fmt;
use std::rc::Rc;

use crate::alphabet::RestrictedAlphabet;
use crate::constants::{XML_NAMESPACE_NAME, XML_NAMESPACE_PREFIX};
use crate::qname::QualifiedName;
use crate::{FastHashMap, FastIndexMap, Result};

/// Ab dieser Groesse wird eine HashMap fuer den Lookup angelegt,
/// darunter reicht lineare Suche.
const LINEAR_THRESHOLD: usize = 64;

// ============================================================================
// StringIntMap
// ============================================================================

/// String to index map of one vocabulary table.
#[derive(Debug, Clone, Default)]
pub struct StringIntMap {
    /// Erster Index dieser Map (Groesse der Basis).
    offset: u32,
    entries: Vec<Rc<str>>,
    lookup: Option<FastHashMap<Rc<str>, u32>>,
    total_characters: usize,
}

impl StringIntMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn starting_at(offset: u32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Index of `key`, if present.
    #[inline]
    pub fn get(&self, key: &str) -> Option<u32> {
        match self.lookup {
            Some(ref map) => map.get(key).copied(),
            None => self
                .entries
                .iter()
                .position(|e| &**e == key)
                .map(|i| self.offset + i as u32),
        }
    }

    /// Insert-or-get: returns the existing index, or adds `key` and returns `None`.
    pub fn obtain_index(&mut self, key: &str) -> Option<u32> {
        match self.get(key) {
            Some(index) => Some(index),
            None => {
                self.insert(key);
                None
            }
        }
    }

    /// Adds `key` (idempotent) and returns its index.
    pub fn add(&mut self, key: &str) -> u32 {
        match self.get(key) {
            Some(index) => index,
            None => self.insert(key),
        }
    }

    fn insert(&mut self, key: &str) -> u32 {
        let index = self.next_index();
        let rc: Rc<str> = key.into();

        // Lookup-Map lazy anlegen
        if self.lookup.is_none() && self.entries.len() + 1 >= LINEAR_THRESHOLD {
            let mut map = FastHashMap::with_capacity_and_hasher(self.entries.len() + 1, Default::default());
            for (i, e) in self.entries.iter().enumerate() {
                map.insert(Rc::clone(e), self.offset + i as u32);
            }
            self.lookup = Some(map);
        }
        if let Some(ref mut map) = self.lookup {
            map.insert(Rc::clone(&rc), index);
        }

        self.total_characters += key.chars().count();
        self.entries.push(rc);
        index
    }

    /// String at `index`, if it belongs to this map.
    pub fn value(&self, index: u32) -> Option<&str> {
        let i = index.checked_sub(self.offset)?;
        self.entries.get(i as usize).map(AsRef::as_ref)
    }

    /// Index the next insertion receives.
    pub fn next_index(&self) -> u32 {
        self.offset + self.entries.len() as u32
    }

    /// Entries added to this map (the base excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Characters held by this map's own entries.
    pub fn total_character_count(&self) -> usize {
        self.total_characters
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lookup = None;
        self.total_characters = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (self.offset + i as u32, &**e))
    }
}

// ============================================================================
// QualifiedNameMap
// ============================================================================

/// Local name to the qualified names registered under it.
#[derive(Debug, Clone, Default)]
pub struct QualifiedNameMap {
    offset: u32,
    entries: FastIndexMap<Rc<str>, Vec<QualifiedName>>,
    count: u32,
}

impl QualifiedNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn starting_at(offset: u32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Registered name with this exact triple, if any.
    pub fn find(&self, local_name: &str, prefix: &str, namespace_name: &str) -> Option<&QualifiedName> {
        self.entries
            .get(local_name)?
            .iter()
            .find(|q| q.matches(prefix, namespace_name))
    }

    /// Registers a new qualified name and returns its index.
    pub fn register(&mut self, prefix: &str, namespace_name: &str, local_name: &str) -> u32 {
        let index = self.next_index();
        // Lokalnamen-Rc teilen, falls schon vorhanden
        let key: Rc<str> = match self.entries.get_key_value(local_name) {
            Some((k, _)) => Rc::clone(k),
            None => local_name.into(),
        };
        let name = QualifiedName::new(prefix.into(), namespace_name.into(), Rc::clone(&key), index);
        self.entries.entry(key).or_default().push(name);
        self.count += 1;
        index
    }

    pub fn next_index(&self) -> u32 {
        self.offset + self.count
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }

    /// All registered names, grouped by local name in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &QualifiedName> {
        self.entries.values().flatten()
    }
}

// ============================================================================
// Kategorien
// ============================================================================

/// Flat string tables of a vocabulary (X.891 7.2.2 to 7.2.20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringCategory {
    RestrictedAlphabet,
    EncodingAlgorithm,
    Prefix,
    NamespaceName,
    LocalName,
    OtherNcName,
    OtherUri,
    AttributeValue,
    OtherString,
    CharacterContentChunk,
}

impl StringCategory {
    pub const ALL: [StringCategory; 10] = [
        Self::RestrictedAlphabet,
        Self::EncodingAlgorithm,
        Self::Prefix,
        Self::NamespaceName,
        Self::LocalName,
        Self::OtherNcName,
        Self::OtherUri,
        Self::AttributeValue,
        Self::OtherString,
        Self::CharacterContentChunk,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Qualified-name tables of a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameCategory {
    Element,
    Attribute,
}

impl NameCategory {
    const fn slot(self) -> usize {
        self as usize
    }
}

// ============================================================================
// Application data
// ============================================================================

/// Application state attached to a vocabulary and reset with it.
pub trait VocabularyApplicationData: fmt::Debug {
    /// Called whenever the owning vocabulary is cleared.
    fn clear(&mut self);
}

// ============================================================================
// SerializerVocabulary
// ============================================================================

/// The complete vocabulary of one encoding session.
#[derive(Debug)]
pub struct SerializerVocabulary {
    base: Option<Rc<SerializerVocabulary>>,
    external_uri: Option<Rc<str>>,
    strings: [StringIntMap; 10],
    names: [QualifiedNameMap; 2],
    /// Parallel zu `strings[RestrictedAlphabet]` (eigene Eintraege).
    alphabets: Vec<Rc<RestrictedAlphabet>>,
    application_data: Option<Box<dyn VocabularyApplicationData>>,
}

impl SerializerVocabulary {
    /// Empty vocabulary holding only the built-in `xml` prefix and namespace name at index 0.
    pub fn new() -> Self {
        let mut v = Self {
            base: None,
            external_uri: None,
            strings: Default::default(),
            names: Default::default(),
            alphabets: Vec::new(),
            application_data: None,
        };
        v.seed_builtins();
        v
    }

    /// Vocabulary layered on top of an external one.
    pub fn with_external(external: &ExternalVocabulary) -> Self {
        let base = Rc::clone(&external.vocabulary);
        let strings = StringCategory::ALL.map(|c| StringIntMap::starting_at(base.next_index(c)));
        let names = [
            QualifiedNameMap::starting_at(base.next_name_index(NameCategory::Element)),
            QualifiedNameMap::starting_at(base.next_name_index(NameCategory::Attribute)),
        ];
        Self {
            base: Some(base),
            external_uri: Some(Rc::clone(&external.uri)),
            strings,
            names,
            alphabets: Vec::new(),
            application_data: None,
        }
    }

    fn seed_builtins(&mut self) {
        if self.base.is_none() {
            self.strings[StringCategory::Prefix.slot()].add(XML_NAMESPACE_PREFIX);
            self.strings[StringCategory::NamespaceName.slot()].add(XML_NAMESPACE_NAME);
        }
    }

    /// URI of the external vocabulary this one is layered on.
    pub fn external_vocabulary_uri(&self) -> Option<&str> {
        self.external_uri.as_deref()
    }

    // --- Strings ---

    /// Index of `key` in `category`, base included.
    pub fn get(&self, category: StringCategory, key: &str) -> Option<u32> {
        self.base
            .as_ref()
            .and_then(|b| b.get(category, key))
            .or_else(|| self.strings[category.slot()].get(key))
    }

    /// Insert-or-get: the existing index, or `None` after adding `key`.
    pub fn obtain_index(&mut self, category: StringCategory, key: &str) -> Option<u32> {
        if let Some(index) = self.base.as_ref().and_then(|b| b.get(category, key)) {
            return Some(index);
        }
        self.strings[category.slot()].obtain_index(key)
    }

    /// Adds `key` (idempotent) and returns its index.
    pub fn add(&mut self, category: StringCategory, key: &str) -> u32 {
        match self.base.as_ref().and_then(|b| b.get(category, key)) {
            Some(index) => index,
            None => self.strings[category.slot()].add(key),
        }
    }

    /// String at `index`, base included.
    pub fn value(&self, category: StringCategory, index: u32) -> Option<&str> {
        let own = &self.strings[category.slot()];
        match self.base {
            Some(ref b) if index < own.offset => b.value(category, index),
            _ => own.value(index),
        }
    }

    /// Entries in `category`, base included.
    pub fn len(&self, category: StringCategory) -> usize {
        self.next_index(category) as usize
    }

    pub fn next_index(&self, category: StringCategory) -> u32 {
        self.strings[category.slot()].next_index()
    }

    /// Characters added to `category` during this session.
    pub fn total_character_count(&self, category: StringCategory) -> usize {
        self.strings[category.slot()].total_character_count()
    }

    /// The session's own map of `category`.
    pub fn map(&self, category: StringCategory) -> &StringIntMap {
        &self.strings[category.slot()]
    }

    // --- Qualified names ---

    /// Index of the registered name with this exact triple, base included.
    pub fn find_name(&self, category: NameCategory, local_name: &str, prefix: &str, namespace_name: &str) -> Option<u32> {
        self.base
            .as_ref()
            .and_then(|b| b.find_name(category, local_name, prefix, namespace_name))
            .or_else(|| {
                self.names[category.slot()]
                    .find(local_name, prefix, namespace_name)
                    .map(QualifiedName::index)
            })
    }

    /// Registers a new qualified name and returns its index.
    pub fn register_name(&mut self, category: NameCategory, prefix: &str, namespace_name: &str, local_name: &str) -> u32 {
        self.names[category.slot()].register(prefix, namespace_name, local_name)
    }

    pub fn next_name_index(&self, category: NameCategory) -> u32 {
        self.names[category.slot()].next_index()
    }

    /// The session's own map of `category`.
    pub fn names(&self, category: NameCategory) -> &QualifiedNameMap {
        &self.names[category.slot()]
    }

    // --- Restricted alphabets / encoding algorithms ---

    /// Registers an application restricted alphabet and returns its table index.
    ///
    /// The wire id is the index plus 16.
    pub fn add_restricted_alphabet(&mut self, characters: &str) -> Result<u32> {
        if let Some(index) = self.get(StringCategory::RestrictedAlphabet, characters) {
            return Ok(index);
        }
        let alphabet = RestrictedAlphabet::new(characters)?;
        self.alphabets.push(Rc::new(alphabet));
        Ok(self.strings[StringCategory::RestrictedAlphabet.slot()].add(characters))
    }

    /// Alphabet at table `index`, base included.
    pub fn restricted_alphabet(&self, index: u32) -> Option<&RestrictedAlphabet> {
        let offset = self.strings[StringCategory::RestrictedAlphabet.slot()].offset;
        match self.base {
            Some(ref b) if index < offset => b.restricted_alphabet(index),
            _ => self.alphabets.get(index.checked_sub(offset)? as usize).map(|a| &**a),
        }
    }

    /// Registers an application encoding algorithm URI and returns its table index.
    ///
    /// The wire id is the index plus 32.
    pub fn add_encoding_algorithm(&mut self, uri: &str) -> u32 {
        self.add(StringCategory::EncodingAlgorithm, uri)
    }

    // --- Lifecycle ---

    pub fn set_application_data(&mut self, data: Box<dyn VocabularyApplicationData>) {
        self.application_data = Some(data);
    }

    pub fn application_data(&self) -> Option<&dyn VocabularyApplicationData> {
        self.application_data.as_deref()
    }

    pub fn application_data_mut(&mut self) -> Option<&mut (dyn VocabularyApplicationData + 'static)> {
        self.application_data.as_deref_mut()
    }

    /// Drops everything added during the session; the base stays.
    pub fn clear(&mut self) {
        self.strings.iter_mut().for_each(StringIntMap::clear);
        self.names.iter_mut().for_each(QualifiedNameMap::clear);
        self.alphabets.clear();
        if let Some(data) = self.application_data.as_mut() {
            data.clear();
        }
        self.seed_builtins();
    }
}

impl Default for SerializerVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ExternalVocabulary
// ============================================================================

/// A read-only vocabulary shared across sessions and referenced by URI (X.891 C.2.5.2).
#[derive(Debug, Clone)]
pub struct ExternalVocabulary {
    uri: Rc<str>,
    vocabulary: Rc<SerializerVocabulary>,
}

impl ExternalVocabulary {
    /// Freezes `vocabulary` under `uri`.
    pub fn new(uri: impl Into<Rc<str>>, mut vocabulary: SerializerVocabulary) -> Self {
        // Application-Daten gehoeren zur Session, nicht zur Basis
        vocabulary.application_data = None;
        Self {
            uri: uri.into(),
            vocabulary: Rc::new(vocabulary),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn vocabulary(&self) -> &SerializerVocabulary {
        &self.vocabulary
    }
}
