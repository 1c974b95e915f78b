//! IDL front end
//!
//! This module transforms IDL source text into a [`Module`]:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`], [`declarations`], [`types`]: Parsing (tokens → module)
//! - [`ast`], [`namespace`], [`module`]: the type and namespace model
//! - [`diagnostics`]: fatal errors and collected diagnostics
//!
//! # Supported language
//!
//! - Declarations: `interface` (with methods, or `;` as a forward declaration)
//!   and `sequenceable`, both with dotted namespace-qualified names
//! - Types: `boolean`, `byte`, `short`, `int`, `long`, `float`, `double`,
//!   `char`, `String`, `void` (return types only), `List<T>`, `Map<K, V>`,
//!   arrays `T[]` and declared names
//! - Parameters: `in`, `out`, `inout`, bare or in brackets
//! - `oneway` interfaces and methods, as a keyword or as `[oneway]`
//! - `//` and `/* */` comments; a leading block comment is the license
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead.
//! No external parser generator dependencies.

pub mod ast;
pub mod declarations;
pub mod diagnostics;
pub mod lexer;
pub mod module;
pub mod namespace;
pub mod parse;
pub mod types;

pub use ast::{
    Direction, Interface, Method, Parameter, Primitive, Sequenceable, SourceLocation, TypeId,
    TypeKind, Unresolved,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, IdlError};
pub use module::Module;
pub use namespace::{Namespace, NamespaceId};
pub use parse::{Options, Parser};
