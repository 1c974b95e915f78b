//! Lexer (tokenizer) for IDL source
//!
//! Produces [`Token`]s on demand with a single token of lookahead. Dotted names
//! such as `ohos.app.IFoo` are scanned as one identifier; the parser splits
//! them into namespace and simple name.
//!
//! The lexer never fails once the source is loaded: characters it does not
//! recognise come back as [`TokenKind::Unknown`] and the parser decides what to
//! report.

use super::ast::{Primitive, SourceLocation};
use super::diagnostics::IdlError;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    In,
    InOut,
    Integer,
    Interface,
    List,
    Long,
    Map,
    Oneway,
    Out,
    Sequenceable,
    Short,
    String,
    Void,

    // Punctuation
    LAngle,    // <
    RAngle,    // >
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Dot,       // .
    Semicolon, // ;

    Ident(String),
    LineComment(String),
    BlockComment(String),
    Unknown(char),
    Eof,
}

impl TokenKind {
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment(_) | TokenKind::BlockComment(_))
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            TokenKind::Boolean => Some(Primitive::Boolean),
            TokenKind::Byte => Some(Primitive::Byte),
            TokenKind::Short => Some(Primitive::Short),
            TokenKind::Integer => Some(Primitive::Integer),
            TokenKind::Long => Some(Primitive::Long),
            TokenKind::Float => Some(Primitive::Float),
            TokenKind::Double => Some(Primitive::Double),
            TokenKind::Char => Some(Primitive::Char),
            TokenKind::String => Some(Primitive::String),
            TokenKind::Void => Some(Primitive::Void),
            _ => None,
        }
    }

    /// Source text of the token as it is echoed in diagnostics
    pub fn text(&self) -> String {
        let fixed = match self {
            TokenKind::Boolean => "boolean",
            TokenKind::Byte => "byte",
            TokenKind::Char => "char",
            TokenKind::Double => "double",
            TokenKind::Float => "float",
            TokenKind::In => "in",
            TokenKind::InOut => "inout",
            TokenKind::Integer => "int",
            TokenKind::Interface => "interface",
            TokenKind::List => "List",
            TokenKind::Long => "long",
            TokenKind::Map => "Map",
            TokenKind::Oneway => "oneway",
            TokenKind::Out => "out",
            TokenKind::Sequenceable => "sequenceable",
            TokenKind::Short => "short",
            TokenKind::String => "String",
            TokenKind::Void => "void",
            TokenKind::LAngle => "<",
            TokenKind::RAngle => ">",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "eof",
            TokenKind::Ident(text)
            | TokenKind::LineComment(text)
            | TokenKind::BlockComment(text) => return text.clone(),
            TokenKind::Unknown(ch) => return ch.to_string(),
        };
        fixed.to_string()
    }
}

/// Keyword table. Anything else shaped like an identifier stays an identifier.
fn keyword(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "boolean" => TokenKind::Boolean,
        "byte" => TokenKind::Byte,
        "char" => TokenKind::Char,
        "double" => TokenKind::Double,
        "float" => TokenKind::Float,
        "in" => TokenKind::In,
        "inout" => TokenKind::InOut,
        "int" => TokenKind::Integer,
        "interface" => TokenKind::Interface,
        "List" => TokenKind::List,
        "long" => TokenKind::Long,
        "Map" => TokenKind::Map,
        "oneway" => TokenKind::Oneway,
        "out" => TokenKind::Out,
        "sequenceable" => TokenKind::Sequenceable,
        "short" => TokenKind::Short,
        "String" => TokenKind::String,
        "void" => TokenKind::Void,
        _ => return None,
    };
    Some(kind)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn text(&self) -> String {
        self.kind.text()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::LineComment(_) | TokenKind::BlockComment(_) => write!(f, "comment"),
            TokenKind::Unknown(ch) => write!(f, "unknown character '{}'", ch.escape_debug()),
            TokenKind::Eof => write!(f, "end of file"),
            other => write!(f, "'{}'", other.text()),
        }
    }
}

/// Lexer for IDL source
pub struct Lexer {
    file: String,
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    peeked: Option<Token>,
}

impl Lexer {
    /// Create a lexer over in-memory source. `file` is only used for reporting.
    pub fn new(file: &str, source: &str) -> Self {
        Self {
            file: file.to_string(),
            input: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            peeked: None,
        }
    }

    /// Load a source file. Missing, unreadable and empty files are fatal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IdlError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| IdlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if source.trim().is_empty() {
            return Err(IdlError::EmptySource {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::new(&path.to_string_lossy(), &source))
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Consume and return the next token.
    ///
    /// With `skip_comments` set, comments are still scanned (so line numbers stay
    /// right) but never returned.
    pub fn next_token(&mut self, skip_comments: bool) -> Token {
        match self.peeked.take() {
            Some(token) if !(skip_comments && token.kind.is_comment()) => token,
            _ => self.read_token(skip_comments),
        }
    }

    /// Return the next token without consuming it.
    pub fn peek_token(&mut self, skip_comments: bool) -> Token {
        let token = self.next_token(skip_comments);
        self.peeked = Some(token.clone());
        token
    }

    /// Drain the remaining input into a vector ending with [`TokenKind::Eof`].
    pub fn tokenize(&mut self, skip_comments: bool) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(skip_comments);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn read_token(&mut self, skip_comments: bool) -> Token {
        loop {
            let loc = self.current_location();
            let Some(ch) = self.peek() else {
                return Token::new(TokenKind::Eof, loc);
            };

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            if ch.is_ascii_alphabetic() || ch == '_' {
                return self.identifier_or_keyword(loc);
            }

            if ch == '/' && self.peek_ahead(1) == Some('/') {
                let token = self.line_comment(loc);
                if skip_comments {
                    continue;
                }
                return token;
            }

            if ch == '/' && self.peek_ahead(1) == Some('*') {
                let token = self.block_comment(loc);
                if skip_comments {
                    continue;
                }
                return token;
            }

            self.advance();
            let kind = match ch {
                '<' => TokenKind::LAngle,
                '>' => TokenKind::RAngle,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                ';' => TokenKind::Semicolon,
                other => TokenKind::Unknown(other),
            };
            return Token::new(kind, loc);
        }
    }

    /// Letters, digits, `_` and embedded `.` form one identifier.
    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = keyword(&ident).unwrap_or(TokenKind::Ident(ident));
        Token::new(kind, loc)
    }

    /// `// ...` up to (not including) the newline, which is consumed.
    fn line_comment(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
        }
        Token::new(TokenKind::LineComment(text), loc)
    }

    /// `/* ... */` including the delimiters. Runs to end of input if unterminated.
    fn block_comment(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        // opening "/*"
        for _ in 0..2 {
            if let Some(ch) = self.advance() {
                text.push(ch);
            }
        }
        while let Some(ch) = self.advance() {
            text.push(ch);
            if ch == '*' && self.peek() == Some('/') {
                self.advance();
                text.push('/');
                break;
            }
        }
        Token::new(TokenKind::BlockComment(text), loc)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new("test.idl", source)
            .tokenize(true)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("interface Foo { int bar(in int x); }");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Interface,
                TokenKind::Ident("Foo".to_string()),
                TokenKind::LBrace,
                TokenKind::Integer,
                TokenKind::Ident("bar".to_string()),
                TokenKind::LParen,
                TokenKind::In,
                TokenKind::Integer,
                TokenKind::Ident("x".to_string()),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dotted_identifier_is_one_token() {
        let tokens = kinds("sequenceable a.b.Data;");
        assert_eq!(tokens[1], TokenKind::Ident("a.b.Data".to_string()));
        assert_eq!(tokens[2], TokenKind::Semicolon);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let tokens = kinds("String string List list");
        assert_eq!(tokens[0], TokenKind::String);
        assert_eq!(tokens[1], TokenKind::Ident("string".to_string()));
        assert_eq!(tokens[2], TokenKind::List);
        assert_eq!(tokens[3], TokenKind::Ident("list".to_string()));
    }

    #[test]
    fn test_comments_skipped_or_returned() {
        let source = "/* license */\n// note\ninterface";
        assert_eq!(kinds(source), vec![TokenKind::Interface, TokenKind::Eof]);

        let mut lexer = Lexer::new("test.idl", source);
        assert_eq!(
            lexer.next_token(false).kind,
            TokenKind::BlockComment("/* license */".to_string())
        );
        assert_eq!(
            lexer.next_token(false).kind,
            TokenKind::LineComment("// note".to_string())
        );
        let token = lexer.next_token(false);
        assert_eq!(token.kind, TokenKind::Interface);
        assert_eq!(token.location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_peek_then_next_returns_same_token() {
        let mut lexer = Lexer::new("test.idl", "oneway interface");
        let peeked = lexer.peek_token(true);
        assert_eq!(peeked.kind, TokenKind::Oneway);
        assert_eq!(lexer.peek_token(true), peeked);
        assert_eq!(lexer.next_token(true), peeked);
        assert_eq!(lexer.next_token(true).kind, TokenKind::Interface);
    }

    #[test]
    fn test_peeked_comment_dropped_when_skipping() {
        let mut lexer = Lexer::new("test.idl", "/* c */ sequenceable");
        assert!(lexer.peek_token(false).kind.is_comment());
        assert_eq!(lexer.next_token(true).kind, TokenKind::Sequenceable);
    }

    #[test]
    fn test_unknown_character_recovers() {
        let tokens = kinds("int @ x");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Integer,
                TokenKind::Unknown('@'),
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_locations_are_one_based() {
        let tokens = Lexer::new("test.idl", "interface\n  Foo {").tokenize(true);
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 7));
    }

    #[test]
    fn test_nested_generic_closes_with_two_tokens() {
        let tokens = kinds("Map<String, List<int>>");
        assert_eq!(tokens[tokens.len() - 3], TokenKind::RAngle);
        assert_eq!(tokens[tokens.len() - 2], TokenKind::RAngle);
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_eof() {
        let mut lexer = Lexer::new("test.idl", "/* never closed\ninterface");
        let token = lexer.next_token(false);
        assert_eq!(
            token.kind,
            TokenKind::BlockComment("/* never closed\ninterface".to_string())
        );
        assert_eq!(lexer.next_token(false).kind, TokenKind::Eof);
    }
}
