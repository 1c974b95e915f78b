//! # Introduction
//!
//! A front end for a small interface-definition language used to describe
//! remote-callable interfaces: interfaces containing methods, methods taking
//! directional parameters, and opaque marshalable data types called
//! sequenceables, all placed in dotted namespaces.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → Module (+ diagnostics) → dump / TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source, builds the [`parser::Module`], and
//!    resolves type names against it while parsing.
//! 2. [`ui`]: ratatui-based viewer for a parsed file; not part of the stable
//!    library API.
//!
//! ## Example
//!
//! ```
//! use idl_parser::parser::{Options, Parser};
//!
//! let mut parser = Parser::new(Options::default());
//! assert!(parser.parse_source("IFoo.idl", "interface ohos.IFoo { int bar(in int x); }"));
//!
//! let module = parser.module().unwrap();
//! let foo = module.find_interface("ohos.IFoo").unwrap();
//! assert_eq!(module.method_signature(&foo.methods[0]), "(I)I");
//! ```

pub mod parser;
pub mod ui;
