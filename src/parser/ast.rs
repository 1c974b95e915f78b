//! AST node definitions for IDL modules
//!
//! Nodes live in arenas owned by [`Module`](super::module::Module) and refer to
//! each other through [`TypeId`] and [`NamespaceId`] handles. The only links that
//! point "upwards" (a type's namespace, a namespace's outer scope) are plain
//! handles as well, so the tree can never own itself.

use super::namespace::NamespaceId;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Handle to a type node inside a module's type arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Built-in types, registered once per module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Char,
    String,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 10] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Short,
        Primitive::Integer,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Char,
        Primitive::String,
        Primitive::Void,
    ];

    /// The keyword the type is spelled with, also its key in the type table.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Integer => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Char => "char",
            Primitive::String => "String",
            Primitive::Void => "void",
        }
    }

    pub fn signature(self) -> &'static str {
        match self {
            Primitive::Boolean => "Z",
            Primitive::Byte => "B",
            Primitive::Short => "S",
            Primitive::Integer => "I",
            Primitive::Long => "J",
            Primitive::Float => "F",
            Primitive::Double => "D",
            Primitive::Char => "C",
            Primitive::String => "T",
            Primitive::Void => "V",
        }
    }
}

/// Parameter passing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }

    /// True for `out` and `inout`, which need a reply to carry the value back.
    pub fn is_out(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single type node.
///
/// The set of node shapes is closed, so consumers match on it directly instead
/// of going through a trait object.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(Primitive),
    List { element: TypeId },
    Map { key: TypeId, value: TypeId },
    Array { element: TypeId },
    Interface(Interface),
    Sequenceable(Sequenceable),
    /// Stand-in for a name that was never declared; reported by the integrity check
    Unresolved(Unresolved),
}

impl TypeKind {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeKind::Primitive(Primitive::Void))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeKind::Unresolved(_))
    }

    pub fn as_interface(&self) -> Option<&Interface> {
        match self {
            TypeKind::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub fn as_sequenceable(&self) -> Option<&Sequenceable> {
        match self {
            TypeKind::Sequenceable(sequenceable) => Some(sequenceable),
            _ => None,
        }
    }

    /// Namespace the node was declared in; generics and primitives have none.
    pub fn namespace(&self) -> Option<NamespaceId> {
        match self {
            TypeKind::Interface(interface) => Some(interface.namespace),
            TypeKind::Sequenceable(sequenceable) => Some(sequenceable.namespace),
            _ => None,
        }
    }
}

/// A remote-callable interface
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub namespace: NamespaceId,
    pub methods: Vec<Method>,
    pub oneway: bool,
    /// Forward declaration: the body lives in another file
    pub external: bool,
    /// Named by `interface x.Y;` before (or instead of) its definition
    pub forward_declared: bool,
    pub license: Option<String>,
    pub location: SourceLocation,
}

impl Interface {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A data-only type marshalled as an opaque blob
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenceable {
    pub name: String,
    pub namespace: NamespaceId,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    pub name: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub return_type: TypeId,
    pub parameters: Vec<Parameter>,
    pub oneway: bool,
    pub location: SourceLocation,
}

impl Method {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub direction: Direction,
    pub ty: TypeId,
    pub location: SourceLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keywords_are_unique() {
        let mut seen: Vec<&str> = Primitive::ALL.iter().map(|p| p.keyword()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Primitive::ALL.len());
    }

    #[test]
    fn test_direction_out_flags() {
        assert!(!Direction::In.is_out());
        assert!(Direction::Out.is_out());
        assert!(Direction::InOut.is_out());
        assert_eq!(Direction::InOut.to_string(), "inout");
    }
}
