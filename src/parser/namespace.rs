//! Namespace tree
//!
//! A namespace stores only its own segment. Its qualified name is read by
//! walking the `outer` handles up to a root, see
//! [`Module::qualified_namespace_name`](super::module::Module::qualified_namespace_name).

use super::ast::TypeId;

/// Handle to a namespace inside a module's namespace arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub(crate) usize);

impl NamespaceId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Single segment, empty for the global namespace
    pub name: String,
    pub outer: Option<NamespaceId>,
    pub inner: Vec<NamespaceId>,
    pub interfaces: Vec<TypeId>,
    pub sequenceables: Vec<TypeId>,
}

impl Namespace {
    pub(crate) fn new(name: &str, outer: Option<NamespaceId>) -> Self {
        Self {
            name: name.to_string(),
            outer,
            inner: Vec::new(),
            interfaces: Vec::new(),
            sequenceables: Vec::new(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.name.is_empty() && self.outer.is_none()
    }
}

/// Split `a.b.Name` into (`a.b`, `Name`). A name without dots has an empty namespace part.
pub fn split_qualified(full_name: &str) -> (&str, &str) {
    match full_name.rfind('.') {
        Some(index) => (&full_name[..index], &full_name[index + 1..]),
        None => ("", full_name),
    }
}

/// A dotted name is well formed when every segment is non-empty.
pub fn is_valid_qualified_name(full_name: &str) -> bool {
    !full_name.is_empty() && full_name.split('.').all(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("a.b.Foo"), ("a.b", "Foo"));
        assert_eq!(split_qualified("Foo"), ("", "Foo"));
    }

    #[test]
    fn test_valid_qualified_names() {
        assert!(is_valid_qualified_name("Foo"));
        assert!(is_valid_qualified_name("ohos.app.Foo"));
        assert!(!is_valid_qualified_name(".Foo"));
        assert!(!is_valid_qualified_name("Foo."));
        assert!(!is_valid_qualified_name("a..Foo"));
        assert!(!is_valid_qualified_name(""));
    }
}
