//! Type expression parsing
//!
//! ```text
//! type ::= base ("[" "]")*
//! base ::= primitive | "List" "<" type ">" | "Map" "<" type "," type ">" | qualified_name
//! ```
//!
//! Generic instantiations are interned in the module, so every `List<int>` in a
//! file is the same node. A name that is not yet declared becomes an
//! unresolved placeholder and is reported by the integrity check after parsing.

use crate::parser::ast::TypeId;
use crate::parser::diagnostics::DiagnosticKind;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::module::Module;
use crate::parser::namespace::is_valid_qualified_name;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse a type expression, including any `[]` suffixes.
    ///
    /// Returns `None` after reporting when no type could be built; the caller
    /// decides how far to skip.
    pub(crate) fn parse_type(&mut self, module: &mut Module) -> Option<TypeId> {
        let token = self.peek();
        let mut ty = match &token.kind {
            TokenKind::List => self.parse_list(module)?,
            TokenKind::Map => self.parse_map(module)?,
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                self.resolve_type_name(module, &name, &token)?
            }
            kind => match kind.primitive() {
                Some(primitive) => {
                    self.advance();
                    module.primitive(primitive)
                }
                None => {
                    self.expected("type", &token);
                    return None;
                }
            },
        };

        while self.check(&TokenKind::LBracket) {
            self.advance();
            if !self.expect_token(&TokenKind::RBracket, "to close array type") {
                return None;
            }
            self.reject_void(module, ty, &token, "array element");
            ty = module.array_of(ty);
        }

        Some(ty)
    }

    fn resolve_type_name(&mut self, module: &mut Module, name: &str, token: &Token) -> Option<TypeId> {
        if !is_valid_qualified_name(name) {
            self.report(
                DiagnosticKind::Syntax,
                token,
                format!("Type name \"{}\" is illegal", name),
            );
            return None;
        }
        Some(
            module
                .find_type(name)
                .unwrap_or_else(|| module.unresolved(name, token.location)),
        )
    }

    /// "List" "<" type ">"
    fn parse_list(&mut self, module: &mut Module) -> Option<TypeId> {
        self.advance(); // consume 'List'
        if !self.expect_token(&TokenKind::LAngle, "after 'List'") {
            return None;
        }

        let element_token = self.peek();
        let Some(element) = self.parse_type(module) else {
            self.skip_past_closing_angle();
            return None;
        };
        self.reject_void(module, element, &element_token, "List element");

        if !self.expect_token(&TokenKind::RAngle, "after List element type") {
            self.skip_past_closing_angle();
            return None;
        }

        Some(module.list_of(element))
    }

    /// "Map" "<" type "," type ">"
    fn parse_map(&mut self, module: &mut Module) -> Option<TypeId> {
        self.advance(); // consume 'Map'
        if !self.expect_token(&TokenKind::LAngle, "after 'Map'") {
            return None;
        }

        let key_token = self.peek();
        let Some(key) = self.parse_type(module) else {
            self.skip_past_closing_angle();
            return None;
        };
        self.reject_void(module, key, &key_token, "Map key");

        if !self.expect_token(&TokenKind::Comma, "between Map key and value types") {
            self.skip_past_closing_angle();
            return None;
        }

        let value_token = self.peek();
        let Some(value) = self.parse_type(module) else {
            self.skip_past_closing_angle();
            return None;
        };
        self.reject_void(module, value, &value_token, "Map value");

        if !self.expect_token(&TokenKind::RAngle, "after Map value type") {
            self.skip_past_closing_angle();
            return None;
        }

        Some(module.map_of(key, value))
    }

    /// Report `void` used anywhere but as a return type. Returns true when `ty` is fine.
    pub(crate) fn reject_void(
        &mut self,
        module: &Module,
        ty: TypeId,
        token: &Token,
        position: &str,
    ) -> bool {
        if !module.get(ty).is_void() {
            return true;
        }
        self.report(
            DiagnosticKind::Semantic,
            token,
            format!("\"void\" cannot be used as {} type", position),
        );
        false
    }

    /// Skip past the `>` closing the generic argument list we are inside,
    /// stopping early at anything that ends a declaration.
    fn skip_past_closing_angle(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.peek().kind {
                TokenKind::LAngle => depth += 1,
                TokenKind::RAngle => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semicolon | TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => {
                    return
                }
                _ => {}
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Primitive, TypeKind};
    use crate::parser::diagnostics::DiagnosticKind;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Parser {
        let mut parser = Parser::default();
        parser.parse_source("Types.idl", source);
        parser
    }

    fn kinds(parser: &Parser) -> Vec<DiagnosticKind> {
        parser.diagnostics().iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_nested_generics() {
        let parser = parse("interface T { Map<String, List<long>> get(in List<List<int>> x); }");
        assert!(parser.diagnostics().is_empty(), "{:?}", parser.diagnostics());
        let module = parser.module().unwrap();
        let method = &module.find_interface("T").unwrap().methods[0];
        assert_eq!(module.type_name(method.return_type), "Map<String, List<long>>");
        assert_eq!(module.type_name(method.parameters[0].ty), "List<List<int>>");
        assert_eq!(module.signature(method.return_type), "Ljava/util/HashMap;");
    }

    #[test]
    fn test_generic_instances_shared() {
        let parser = parse("interface T { void a(in List<int> x); void b(in List<int> y); }");
        let module = parser.module().unwrap();
        let t = module.find_interface("T").unwrap();
        assert_eq!(t.methods[0].parameters[0].ty, t.methods[1].parameters[0].ty);
    }

    #[test]
    fn test_array_types() {
        let parser = parse("sequenceable a.D;\ninterface T { int[][] grid(in D[] items); }");
        assert!(parser.diagnostics().is_empty(), "{:?}", parser.diagnostics());
        let module = parser.module().unwrap();
        let method = &module.find_interface("T").unwrap().methods[0];
        assert_eq!(module.type_name(method.return_type), "int[][]");
        assert_eq!(module.signature(method.return_type), "[[I");
        assert_eq!(module.signature(method.parameters[0].ty), "[La/D;");
        assert_eq!(module.method_signature(method), "([La/D;)[[I");
    }

    #[test]
    fn test_declared_type_resolves_to_declaration() {
        let parser = parse("sequenceable a.b.Data;\ninterface T { Data get(in a.b.Data d); }");
        assert!(parser.diagnostics().is_empty());
        let module = parser.module().unwrap();
        let method = &module.find_interface("T").unwrap().methods[0];
        assert_eq!(method.return_type, method.parameters[0].ty);
        assert!(matches!(module.get(method.return_type), TypeKind::Sequenceable(_)));
    }

    #[test]
    fn test_undeclared_type_reported_once() {
        let parser = parse("interface X { void f(in Unknown u); }");
        assert_eq!(kinds(&parser), vec![DiagnosticKind::Resolution]);
        let diag = &parser.diagnostics()[0];
        assert_eq!(diag.token, "Unknown");
        assert!(diag.message.contains("Unknown"));
        assert_eq!((diag.line(), diag.column()), (1, 25));

        let module = parser.module().unwrap();
        let param = &module.find_interface("X").unwrap().methods[0].parameters[0];
        assert!(module.get(param.ty).is_unresolved());
    }

    #[test]
    fn test_each_unresolved_reference_reported() {
        let parser = parse("interface X { void f(in Missing a, in List<Missing> b); }");
        assert_eq!(
            kinds(&parser),
            vec![DiagnosticKind::Resolution, DiagnosticKind::Resolution]
        );
    }

    #[test]
    fn test_use_before_declaration_is_unresolved() {
        let parser = parse("interface X { void f(in Data d); }\nsequenceable a.Data;");
        assert_eq!(kinds(&parser), vec![DiagnosticKind::Resolution]);
    }

    #[test]
    fn test_map_with_one_argument() {
        let parser = parse("interface X { void f(in Map<int> m); void g(); }");
        assert_eq!(kinds(&parser), vec![DiagnosticKind::Syntax]);
        let x = parser.module().unwrap().find_interface("X").unwrap();
        assert_eq!(x.methods.len(), 2);
        assert!(x.methods[0].parameters.is_empty());
    }

    #[test]
    fn test_list_without_brackets() {
        let parser = parse("interface X { void f(in List l); void g(); }");
        assert_eq!(kinds(&parser), vec![DiagnosticKind::Syntax]);
        assert!(parser.diagnostics()[0].message.contains("'<' after 'List'"));
    }

    #[test]
    fn test_void_inside_generic() {
        let parser = parse("interface X { void f(in List<void> l); }");
        assert_eq!(kinds(&parser), vec![DiagnosticKind::Semantic]);
    }

    #[test]
    fn test_void_return_allowed() {
        let parser = parse("interface X { void f(); }");
        assert!(parser.diagnostics().is_empty());
        let module = parser.module().unwrap();
        let method = &module.find_interface("X").unwrap().methods[0];
        assert_eq!(module.get(method.return_type), &TypeKind::Primitive(Primitive::Void));
        assert_eq!(module.method_signature(method), "()V");
    }

    #[test]
    fn test_missing_type() {
        let parser = parse("interface X { void f(in ; }");
        assert!(kinds(&parser).contains(&DiagnosticKind::Syntax));
        assert!(parser.diagnostics()[0].message.starts_with("Expected type"));
    }
}
