//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! configuration, token helpers, diagnostics, error recovery and the
//! post-parse integrity check.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: interfaces, methods, parameters and sequenceables
//! - `types`: type expressions (`int`, `List<T>`, `Map<K, V>`, `T[]`, names)
//!
//! Every parsing method takes the [`Module`] under construction explicitly.
//! Names resolve against whatever the module has seen so far, so a type must be
//! declared before it is used.
//!
//! # Error handling
//!
//! Only loading the file can fail outright ([`IdlError`]). Grammar and
//! resolution problems are pushed to the diagnostic list and the parser skips
//! ahead to the next point it can resume from.

use super::ast::SourceLocation;
use super::diagnostics::{display_file_name, Diagnostic, DiagnosticKind, IdlError};
use super::lexer::{Lexer, Token, TokenKind};
use super::module::Module;
use std::mem;
use std::path::Path;

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Reject interfaces declared without a dotted namespace prefix
    pub require_namespace: bool,
}

/// Recursive descent parser for IDL files
pub struct Parser {
    pub(crate) options: Options,
    pub(crate) lexer: Lexer,
    /// Block comment waiting to be attached to the next declaration
    pub(crate) pending_license: Option<String>,
    diagnostics: Vec<Diagnostic>,
    module: Option<Module>,
}

impl Parser {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            lexer: Lexer::new("", ""),
            pending_license: None,
            diagnostics: Vec::new(),
            module: None,
        }
    }

    /// Parse the file at `path`.
    ///
    /// Returns `Ok(true)` when the file produced no diagnostics. The module and the
    /// diagnostics are available afterwards in both cases.
    pub fn parse(&mut self, path: impl AsRef<Path>) -> Result<bool, IdlError> {
        let lexer = Lexer::open(path)?;
        Ok(self.run(lexer))
    }

    /// Parse in-memory source as if it were read from `file`.
    pub fn parse_source(&mut self, file: &str, source: &str) -> bool {
        self.run(Lexer::new(file, source))
    }

    pub fn module(&self) -> Option<&Module> {
        self.module.as_ref()
    }

    pub fn take_module(&mut self) -> Option<Module> {
        self.module.take()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        mem::take(&mut self.diagnostics)
    }

    fn run(&mut self, lexer: Lexer) -> bool {
        self.lexer = lexer;
        self.pending_license = None;
        self.diagnostics.clear();

        let file = self.lexer.file().to_string();
        let mut module = Module::new(&module_name(&file), &file);
        self.parse_file(&mut module);
        self.check_integrity(&module);

        self.module = Some(module);
        self.diagnostics.is_empty()
    }

    /// file := license? (interface_decl | sequenceable_decl)*
    fn parse_file(&mut self, module: &mut Module) {
        self.parse_license(module);

        loop {
            let token = self.lexer.peek_token(false);
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::BlockComment(text) => {
                    self.pending_license = Some(text.clone());
                    self.lexer.next_token(false);
                }
                TokenKind::LineComment(_) => {
                    self.lexer.next_token(false);
                }
                TokenKind::Interface | TokenKind::Oneway | TokenKind::LBracket => {
                    self.parse_interface(module)
                }
                TokenKind::Sequenceable => self.parse_sequenceable(module),
                _ => {
                    self.error_at(&token, format!("{} is not expected", token));
                    self.advance();
                    self.synchronize_top_level();
                }
            }
        }
    }

    /// A block comment before anything else is the module license.
    fn parse_license(&mut self, module: &mut Module) {
        if let TokenKind::BlockComment(text) = self.lexer.peek_token(false).kind {
            self.lexer.next_token(false);
            module.set_license(text.clone());
            self.pending_license = Some(text);
        }
    }

    /// Report what the finished module lacks: unresolved names and interfaces.
    fn check_integrity(&mut self, module: &Module) {
        let unresolved: Vec<(String, SourceLocation)> = module
            .unresolved_references()
            .into_iter()
            .map(|u| (u.name.clone(), u.location))
            .collect();
        for (name, location) in unresolved {
            let message = format!("Type \"{}\" was not declared in the module", name);
            self.report_at(DiagnosticKind::Resolution, &name, location, message);
        }

        let end = self.lexer.peek_token(true);
        if module.name().is_empty() {
            self.report(DiagnosticKind::Integrity, &end, "Module name is empty".to_string());
        }
        if module.local_interface_count() == 0 {
            self.report(
                DiagnosticKind::Integrity,
                &end,
                "An interface is not defined".to_string(),
            );
        }
    }

    // ===== Diagnostics =====

    pub(crate) fn report_at(
        &mut self,
        kind: DiagnosticKind,
        token_text: &str,
        location: SourceLocation,
        message: String,
    ) {
        self.diagnostics.push(Diagnostic {
            kind,
            file: display_file_name(self.lexer.file()),
            token: token_text.to_string(),
            location,
            message,
        });
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind, token: &Token, message: String) {
        self.report_at(kind, &token.text(), token.location, message);
    }

    /// Grammar error at `token`; an unrecognised character is reported as lexical.
    pub(crate) fn error_at(&mut self, token: &Token, message: String) {
        let kind = match token.kind {
            TokenKind::Unknown(_) => DiagnosticKind::Lexical,
            _ => DiagnosticKind::Syntax,
        };
        self.report(kind, token, message);
    }

    pub(crate) fn expected(&mut self, what: &str, token: &Token) {
        self.error_at(token, format!("Expected {}, found {}", what, token));
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&mut self) -> Token {
        self.lexer.peek_token(true)
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.lexer.next_token(true)
    }

    pub(crate) fn check(&mut self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.peek().kind) == mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report `Expected '<kind>' <ctx>` without consuming.
    pub(crate) fn expect_token(&mut self, kind: &TokenKind, ctx: &str) -> bool {
        if self.match_token(kind) {
            return true;
        }
        let token = self.peek();
        self.expected(&format!("'{}' {}", kind.text(), ctx), &token);
        false
    }

    /// Consume an identifier, returning its text and token.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<(String, Token)> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some((name, token))
            }
            _ => {
                self.expected(what, &token);
                None
            }
        }
    }

    // ===== Error recovery =====

    /// Skip to the next `interface`, `oneway`, `sequenceable` or `[` outside braces.
    pub(crate) fn synchronize_top_level(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Interface
                | TokenKind::Oneway
                | TokenKind::Sequenceable
                | TokenKind::LBracket
                    if depth == 0 =>
                {
                    return
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip past the `;` ending a method, stopping early at `}` or a new declaration.
    pub(crate) fn skip_to_method_end(&mut self) {
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace
                | TokenKind::Eof
                | TokenKind::Interface
                | TokenKind::Sequenceable => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the `,` or `)` after a broken parameter.
    pub(crate) fn skip_to_parameter_end(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Module name derived from the file name: `dir/IFoo.idl` → `IFoo`.
fn module_name(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Direction, Primitive, TypeKind};

    fn parse(source: &str) -> (bool, Parser) {
        let mut parser = Parser::default();
        let ok = parser.parse_source("Test.idl", source);
        (ok, parser)
    }

    #[test]
    fn test_parse_simple_interface() {
        let (ok, parser) = parse("interface Foo { int bar(in int x); }");
        assert!(ok, "{:?}", parser.diagnostics());

        let module = parser.module().unwrap();
        assert!(module.is_valid());
        assert_eq!(module.name(), "Test");

        let foo = module.find_interface("Foo").unwrap();
        assert_eq!(foo.methods.len(), 1);
        let bar = &foo.methods[0];
        assert_eq!(bar.name, "bar");
        assert_eq!(module.get(bar.return_type), &TypeKind::Primitive(Primitive::Integer));
        assert_eq!(bar.parameters[0].name, "x");
        assert_eq!(bar.parameters[0].direction, Direction::In);
    }

    #[test]
    fn test_module_name_from_path() {
        assert_eq!(module_name("a/b/IFoo.idl"), "IFoo");
        assert_eq!(module_name("IFoo"), "IFoo");
        assert_eq!(module_name(""), "");
    }

    #[test]
    fn test_license_attached_to_module_and_interface() {
        let (ok, parser) = parse("/* Copyright */\ninterface a.Foo { }");
        assert!(ok);
        let module = parser.module().unwrap();
        assert_eq!(module.license(), Some("/* Copyright */"));
        assert_eq!(
            module.find_interface("Foo").unwrap().license.as_deref(),
            Some("/* Copyright */")
        );
    }

    #[test]
    fn test_top_level_garbage_reported_once() {
        let (ok, parser) = parse("int x; interface Foo { }");
        assert!(!ok);
        let diags = parser.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::Syntax);
        assert_eq!(diags[0].token, "int");
        assert!(parser.module().unwrap().find_interface("Foo").is_some());
    }

    #[test]
    fn test_unknown_character_is_lexical() {
        let (_, parser) = parse("@ interface Foo { }");
        let diags = parser.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::Lexical);
        assert_eq!(diags[0].location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_parser_is_reusable() {
        let mut parser = Parser::default();
        assert!(!parser.parse_source("A.idl", "sequenceable a.D;"));
        assert!(parser.parse_source("B.idl", "interface B { }"));
        assert!(parser.diagnostics().is_empty());
        assert_eq!(parser.module().unwrap().name(), "B");
    }
}
