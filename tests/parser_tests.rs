// Integration tests for the IDL front end

use idl_parser::parser::{
    Diagnostic, DiagnosticKind, Direction, IdlError, Options, Parser, Primitive, TypeKind,
};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

fn parse(source: &str) -> (bool, Parser) {
    let mut parser = Parser::new(Options::default());
    let ok = parser.parse_source("Test.idl", source);
    (ok, parser)
}

fn count(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}

#[test]
fn test_single_interface() {
    let (ok, parser) = parse("interface Foo { int bar(in int x); }");
    assert!(ok);

    let module = parser.module().unwrap();
    assert!(module.is_valid());
    assert_eq!(module.root_namespaces().len(), 1);
    let global = module.namespace(module.root_namespaces()[0]);
    assert!(global.is_global());
    assert_eq!(global.interfaces.len(), 1);

    let foo = module.interface(global.interfaces[0]).unwrap();
    assert_eq!(foo.name, "Foo");
    assert_eq!(foo.methods.len(), 1);
    let bar = &foo.methods[0];
    assert_eq!(bar.name, "bar");
    assert_eq!(
        module.get(bar.return_type),
        &TypeKind::Primitive(Primitive::Integer)
    );
    assert_eq!(bar.parameters.len(), 1);
    assert_eq!(bar.parameters[0].direction, Direction::In);
    assert_eq!(bar.parameters[0].name, "x");
    assert_eq!(module.type_name(bar.parameters[0].ty), "int");
}

#[test]
fn test_sequenceable_only_module() {
    let (ok, parser) = parse("sequenceable a.b.Data;");
    assert!(!ok);

    let module = parser.module().unwrap();
    assert!(!module.is_valid());
    let data = module.find_sequenceable("a.b.Data").unwrap();
    assert_eq!(data.name, "Data");
    assert_eq!(module.qualified_namespace_name(data.namespace), "a.b");

    let diags = parser.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::Integrity);
    assert_eq!(diags[0].message, "An interface is not defined");
}

#[test]
fn test_oneway_interface_with_map_parameter() {
    let (ok, parser) = parse("oneway interface Evt { void fire(in Map<String,int> m); }");
    assert!(ok);

    let module = parser.module().unwrap();
    let evt = module.find_interface("Evt").unwrap();
    assert!(evt.oneway);
    let param = &evt.methods[0].parameters[0];
    let TypeKind::Map { key, value } = module.get(param.ty) else {
        panic!("Expected map type");
    };
    assert_eq!(module.type_name(*key), "String");
    assert_eq!(module.type_name(*value), "int");
}

#[test]
fn test_undeclared_type() {
    let (ok, parser) = parse("interface X { void f(in Unknown u); }");
    assert!(!ok);

    let diags = parser.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::Resolution);
    assert_eq!(diags[0].token, "Unknown");

    // The structure survives with a placeholder in place of the type
    let module = parser.module().unwrap();
    let x = module.find_interface("X").unwrap();
    assert_eq!(x.methods[0].parameters[0].name, "u");
}

#[test]
fn test_missing_interface_name() {
    let (ok, parser) = parse("interface { }\ninterface Good { void f(); }");
    assert!(!ok);

    let diags = parser.diagnostics();
    assert_eq!(count(diags, DiagnosticKind::Syntax), 1);
    assert_eq!(diags.len(), 1);
    assert_eq!((diags[0].line(), diags[0].column()), (1, 11));
    assert_eq!(diags[0].to_string(), "Test.idl[line 1, column 11] Expected interface name, found '{'");

    assert!(parser.module().unwrap().find_interface("Good").is_some());
}

#[test]
fn test_missing_interface_name_alone() {
    let (_, parser) = parse("interface { }");
    let diags = parser.diagnostics();
    assert_eq!(count(diags, DiagnosticKind::Syntax), 1);
    assert_eq!(count(diags, DiagnosticKind::Integrity), 1);
}

#[rstest]
#[case("interface Foo { }", true)]
#[case("interface Foo;\ninterface Bar { }", true)]
#[case("sequenceable a.Data;\ninterface a.Foo { void f(in Data d); }", true)]
#[case("sequenceable Data;", false)]
#[case("interface Foo;", false)]
#[case("// nothing here\n", false)]
fn test_validity(#[case] source: &str, #[case] valid: bool) {
    let (_, parser) = parse(source);
    assert_eq!(parser.module().unwrap().is_valid(), valid);
}

#[rstest]
#[case("interface X { void f(in int x) }", DiagnosticKind::Syntax)]
#[case("interface X { void f(in List<int x); }", DiagnosticKind::Syntax)]
#[case("interface X { void f(int x); }", DiagnosticKind::Syntax)]
#[case("interface X { void f(in int x); } $", DiagnosticKind::Lexical)]
#[case("interface X { void f(in Foo x); }", DiagnosticKind::Resolution)]
#[case("interface X { } interface X { }", DiagnosticKind::Redeclaration)]
#[case("oneway interface X { int f(); }", DiagnosticKind::Semantic)]
#[case("interface X { void f(in void v); }", DiagnosticKind::Semantic)]
fn test_single_diagnostic(#[case] source: &str, #[case] kind: DiagnosticKind) {
    let (ok, parser) = parse(source);
    assert!(!ok);
    let kinds: Vec<DiagnosticKind> = parser.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![kind], "{:?}", parser.diagnostics());
}

#[test]
fn test_multiple_defects_reported_in_one_pass() {
    let source = "\
interface a.IFoo {
    void f(in Missing m);
    void g(int x);
    void f();
}
sequenceable a.Data
interface a.IBar { void h(in Data d); }
";
    let (ok, parser) = parse(source);
    assert!(!ok);
    let diags = parser.diagnostics();
    // The broken sequenceable never registers, so `Data` is unresolved as well
    assert_eq!(count(diags, DiagnosticKind::Syntax), 2, "{:?}", diags);
    assert_eq!(count(diags, DiagnosticKind::Redeclaration), 1);
    assert_eq!(count(diags, DiagnosticKind::Resolution), 2);

    let module = parser.module().unwrap();
    assert!(module.find_interface("a.IBar").is_some());
    assert!(module.find_sequenceable("a.Data").is_none());
}

#[test]
fn test_parse_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("IRemote.idl");
    fs::write(
        &path,
        "/*\n * Copyright (c) 2024\n */\n\ninterface ohos.app.IRemote {\n    void ping();\n}\n",
    )
    .unwrap();

    let mut parser = Parser::default();
    assert!(parser.parse(&path).unwrap());
    let module = parser.module().unwrap();
    assert_eq!(module.name(), "IRemote");
    assert!(module.license().unwrap().contains("Copyright"));
    let remote = module.find_type("ohos.app.IRemote").unwrap();
    assert_eq!(module.signature(remote), "Lohos/app/IRemote;");
}

#[test]
fn test_diagnostic_uses_file_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Broken.idl");
    fs::write(&path, "interface Broken { void f() }\n").unwrap();

    let mut parser = Parser::default();
    assert!(!parser.parse(&path).unwrap());
    let diag = &parser.diagnostics()[0];
    assert_eq!(diag.file, "Broken.idl");
    assert!(diag.to_string().starts_with("Broken.idl[line 1, column 29]"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut parser = Parser::default();
    let err = parser.parse(dir.path().join("absent.idl")).unwrap_err();
    assert!(matches!(err, IdlError::Io { .. }));
    assert!(parser.module().is_none());
}

#[test]
fn test_empty_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Empty.idl");
    fs::write(&path, "  \n\n").unwrap();

    let mut parser = Parser::default();
    let err = parser.parse(&path).unwrap_err();
    assert!(matches!(err, IdlError::EmptySource { .. }));
}

#[test]
fn test_require_namespace_option() {
    let mut parser = Parser::new(Options {
        require_namespace: true,
    });
    assert!(!parser.parse_source("IFoo.idl", "interface IFoo { }"));
    assert!(parser.parse_source("IFoo.idl", "interface a.IFoo { }"));
}
