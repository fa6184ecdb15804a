//! Qualified names (X.891 7.6).
//!
//! [`QName`] is the borrowed name an event source hands in;
//! [`QualifiedName`] is the immutable record the vocabulary keeps once a
//! (prefix, namespace name, local name) triple has been encoded literally.

use std::fmt;
use std::rc::Rc;

/// Borrowed qualified name as supplied by the caller.
///
/// Empty `prefix` / `namespace_name` mean "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QName<'a> {
    pub prefix: &'a str,
    pub namespace_name: &'a str,
    pub local_name: &'a str,
}

impl<'a> QName<'a> {
    pub fn new(prefix: &'a str, namespace_name: &'a str, local_name: &'a str) -> Self {
        Self {
            prefix,
            namespace_name,
            local_name,
        }
    }

    /// A name without namespace and prefix.
    pub fn local(local_name: &'a str) -> Self {
        Self::new("", "", local_name)
    }
}

impl fmt::Display for QName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(self.local_name)
        } else {
            write!(f, "{}:{}", self.prefix, self.local_name)
        }
    }
}

/// String equality with an identity pre-check.
///
/// Event sources that intern their names hand in the same allocation again
/// and again; the pointer comparison short-cuts those.
#[inline]
pub(crate) fn same_str(a: &str, b: &str) -> bool {
    (std::ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()) || a == b
}

/// A qualified name registered in an element-name or attribute-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    prefix: Rc<str>,
    namespace_name: Rc<str>,
    local_name: Rc<str>,
    /// `prefix:local` oder `local`
    qname: Rc<str>,
    index: u32,
}

impl QualifiedName {
    pub fn new(prefix: Rc<str>, namespace_name: Rc<str>, local_name: Rc<str>, index: u32) -> Self {
        let qname: Rc<str> = if prefix.is_empty() {
            Rc::clone(&local_name)
        } else {
            format!("{prefix}:{local_name}").into()
        };
        Self {
            prefix,
            namespace_name,
            local_name,
            qname,
            index,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Lexical `prefix:local` form.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Index in its element-name or attribute-name table.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// True if prefix and namespace name equal the given ones.
    #[inline]
    pub fn matches(&self, prefix: &str, namespace_name: &str) -> bool {
        same_str(&self.prefix, prefix) && same_str(&self.namespace_name, namespace_name)
    }

    pub fn as_qname(&self) -> QName<'_> {
        QName::new(&self.prefix, &self.namespace_name, &self.local_name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qname)
    }
}
