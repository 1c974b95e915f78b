//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations in IDL files:
//!
//! - Interfaces, including forward declarations: `interface a.b.IFoo;`
//! - Methods and their parameters
//! - Sequenceables: `sequenceable a.b.Data;`
//!
//! # Grammar
//!
//! ```text
//! interface_decl    ::= properties? "oneway"? "interface" qualified_name ( ";" | "{" method_decl* "}" )
//! method_decl       ::= properties? "oneway"? type IDENT "(" (param_decl ("," param_decl)*)? ")" ";"
//! param_decl        ::= direction type IDENT
//! direction         ::= "in" | "out" | "inout" | "[" ("in" | "out" | "inout") "]"
//! properties        ::= "[" "oneway" "]"
//! sequenceable_decl ::= "sequenceable" qualified_name ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::DiagnosticKind;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::module::Module;
use crate::parser::namespace::is_valid_qualified_name;
use crate::parser::parse::Parser;

fn direction_of(kind: &TokenKind) -> Option<Direction> {
    match kind {
        TokenKind::In => Some(Direction::In),
        TokenKind::Out => Some(Direction::Out),
        TokenKind::InOut => Some(Direction::InOut),
        _ => None,
    }
}

impl Parser {
    /// Parse `[oneway]`. Returns whether `oneway` was present.
    pub(crate) fn parse_properties(&mut self, target: &str) -> bool {
        self.advance(); // consume '['

        let mut oneway = false;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Oneway => {
                    self.advance();
                    oneway = true;
                }
                TokenKind::RBracket | TokenKind::Eof => {}
                _ => {
                    self.error_at(
                        &token,
                        format!("\"{}\" is an illegal {} property", token.text(), target),
                    );
                    self.advance();
                }
            }
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(&TokenKind::RBracket, &format!("after {} properties", target));
        oneway
    }

    /// Leading `[oneway]` and/or `oneway`
    fn parse_oneway_prefix(&mut self, target: &str) -> bool {
        let mut oneway = false;
        if self.check(&TokenKind::LBracket) {
            oneway |= self.parse_properties(target);
        }
        if self.match_token(&TokenKind::Oneway) {
            oneway = true;
        }
        oneway
    }

    /// Check a dotted declaration name, reporting it when malformed.
    fn check_type_name(&mut self, what: &str, name: &str, token: &Token) -> bool {
        if is_valid_qualified_name(name) {
            return true;
        }
        self.report(
            DiagnosticKind::Syntax,
            token,
            format!("{} name \"{}\" is illegal", what, name),
        );
        false
    }

    /// Method and parameter names are plain identifiers.
    fn check_member_name(&mut self, what: &str, name: &str, token: &Token) -> bool {
        if !name.contains('.') {
            return true;
        }
        self.report(
            DiagnosticKind::Syntax,
            token,
            format!("{} name \"{}\" is illegal", what, name),
        );
        false
    }

    /// Parse an interface definition or forward declaration.
    pub(crate) fn parse_interface(&mut self, module: &mut Module) {
        let oneway = self.parse_oneway_prefix("interface");

        let keyword = self.peek();
        if !self.match_token(&TokenKind::Interface) {
            self.expected("'interface'", &keyword);
            self.synchronize_top_level();
            return;
        }

        let Some((full_name, name_token)) = self.expect_identifier("interface name") else {
            self.synchronize_top_level();
            return;
        };
        if !self.check_type_name("Interface", &full_name, &name_token) {
            self.synchronize_top_level();
            return;
        }
        if self.options.require_namespace && !full_name.contains('.') {
            self.report(
                DiagnosticKind::Syntax,
                &name_token,
                format!("Interface name \"{}\" does not have namespace", full_name),
            );
            self.synchronize_top_level();
            return;
        }

        let external = match self.peek().kind {
            TokenKind::Semicolon => true,
            TokenKind::LBrace => false,
            _ => {
                let token = self.peek();
                self.expected("'{' or ';' after interface name", &token);
                self.synchronize_top_level();
                return;
            }
        };
        self.advance();

        if external && oneway {
            self.report(
                DiagnosticKind::Syntax,
                &name_token,
                "Interface forward declaration should not have properties".to_string(),
            );
            return;
        }

        let license = self.pending_license.take();
        let (namespace, name) = module.declare_path(&full_name);
        let interface = Interface {
            name: name.to_string(),
            namespace,
            methods: Vec::new(),
            oneway,
            external,
            forward_declared: external,
            license,
            location: name_token.location,
        };

        let target = match module.add_interface(interface) {
            Ok(id) => Some(id),
            Err(_) => {
                self.report(
                    DiagnosticKind::Redeclaration,
                    &name_token,
                    format!("Type \"{}\" is already declared", full_name),
                );
                None
            }
        };
        if external {
            return;
        }

        let methods = self.parse_interface_body(module, oneway);
        if let Some(interface) = target.and_then(|id| module.interface_mut(id)) {
            interface.methods = methods;
        }
    }

    /// Methods up to the closing `}`. The opening brace is already consumed.
    fn parse_interface_body(&mut self, module: &mut Module, oneway: bool) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof | TokenKind::Interface | TokenKind::Sequenceable => {
                    self.expected("'}' after interface body", &token);
                    break;
                }
                _ => {
                    let Some(method) = self.parse_method(module, oneway) else {
                        continue;
                    };
                    if methods.iter().any(|m| m.name == method.name) {
                        let message = format!("Method \"{}\" is already declared", method.name);
                        self.report_at(
                            DiagnosticKind::Redeclaration,
                            &method.name,
                            method.location,
                            message,
                        );
                    } else {
                        methods.push(method);
                    }
                }
            }
        }
        methods
    }

    /// Parse one method declaration. On a grammar error the rest of the
    /// declaration is skipped and `None` returned.
    pub(crate) fn parse_method(
        &mut self,
        module: &mut Module,
        interface_oneway: bool,
    ) -> Option<Method> {
        let oneway = self.parse_oneway_prefix("method");

        let Some(return_type) = self.parse_type(module) else {
            self.skip_to_method_end();
            return None;
        };

        let Some((name, name_token)) = self.expect_identifier("method name") else {
            self.skip_to_method_end();
            return None;
        };
        if !self.check_member_name("Method", &name, &name_token) {
            self.skip_to_method_end();
            return None;
        }

        if !self.expect_token(&TokenKind::LParen, "after method name") {
            self.skip_to_method_end();
            return None;
        }

        let parameters = self.parse_parameter_list(module);

        if !self.expect_token(&TokenKind::RParen, "after parameters") {
            self.skip_to_method_end();
            return None;
        }
        if !self.expect_token(&TokenKind::Semicolon, "after method declaration") {
            self.skip_to_method_end();
            return None;
        }

        let method = Method {
            name,
            return_type,
            parameters,
            oneway,
            location: name_token.location,
        };

        if oneway || interface_oneway {
            self.check_oneway_method(module, &method, &name_token);
        }

        Some(method)
    }

    /// A oneway call gets no reply: nothing may flow back to the caller.
    fn check_oneway_method(&mut self, module: &Module, method: &Method, name_token: &Token) {
        if !module.get(method.return_type).is_void() {
            self.report(
                DiagnosticKind::Semantic,
                name_token,
                format!("void return type expected in oneway method \"{}\"", method.name),
            );
        }
        for param in method.parameters.iter().filter(|p| p.direction.is_out()) {
            let message = format!(
                "{} parameter \"{}\" not expected in oneway method \"{}\"",
                param.direction, param.name, method.name
            );
            self.report_at(DiagnosticKind::Semantic, &param.name, param.location, message);
        }
    }

    /// Parameters between the parentheses. Broken parameters are reported and dropped.
    fn parse_parameter_list(&mut self, module: &mut Module) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = Vec::new();

        if self.check(&TokenKind::RParen) {
            return params;
        }

        loop {
            match self.parse_parameter(module) {
                Some(param) if params.iter().any(|p| p.name == param.name) => {
                    let message = format!("Parameter \"{}\" is already declared", param.name);
                    self.report_at(
                        DiagnosticKind::Redeclaration,
                        &param.name,
                        param.location,
                        message,
                    );
                }
                Some(param) => params.push(param),
                None => self.skip_to_parameter_end(),
            }

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        params
    }

    /// param_decl ::= direction type IDENT
    pub(crate) fn parse_parameter(&mut self, module: &mut Module) -> Option<Parameter> {
        let start = self.peek();
        let direction = if start.kind == TokenKind::LBracket {
            self.advance();
            let token = self.peek();
            let Some(direction) = direction_of(&token.kind) else {
                self.expected("'in', 'out' or 'inout'", &token);
                return None;
            };
            self.advance();
            if !self.expect_token(&TokenKind::RBracket, "after parameter direction") {
                return None;
            }
            direction
        } else if let Some(direction) = direction_of(&start.kind) {
            self.advance();
            direction
        } else {
            self.expected("parameter direction 'in', 'out' or 'inout'", &start);
            return None;
        };

        let type_token = self.peek();
        let ty = self.parse_type(module)?;
        self.reject_void(module, ty, &type_token, "parameter");

        let (name, name_token) = self.expect_identifier("parameter name")?;
        if !self.check_member_name("Parameter", &name, &name_token) {
            return None;
        }

        Some(Parameter {
            name,
            direction,
            ty,
            location: start.location,
        })
    }

    /// sequenceable_decl ::= "sequenceable" qualified_name ";"
    pub(crate) fn parse_sequenceable(&mut self, module: &mut Module) {
        self.advance(); // consume 'sequenceable'

        // A license comment only ever belongs to an interface.
        self.pending_license = None;

        let Some((full_name, name_token)) = self.expect_identifier("sequenceable name") else {
            self.synchronize_top_level();
            return;
        };
        if !self.expect_token(&TokenKind::Semicolon, "after sequenceable name") {
            self.synchronize_top_level();
            return;
        }
        if !self.check_type_name("Sequenceable", &full_name, &name_token) {
            return;
        }

        let (namespace, name) = module.declare_path(&full_name);
        let sequenceable = Sequenceable {
            name: name.to_string(),
            namespace,
            location: name_token.location,
        };
        if module.add_sequenceable(sequenceable).is_err() {
            self.report(
                DiagnosticKind::Redeclaration,
                &name_token,
                format!("Type \"{}\" is already declared", full_name),
            );
        }
    }
}
