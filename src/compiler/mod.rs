//! Front end of the translator: tokens, the scanner, the parser, the AST and
//! C output assembly.

use std::fmt::{Display, Formatter};

pub mod ast;
pub mod output;
pub mod parser;
pub mod scanner;

/// The kind of a [`Token`].
///
/// Operator kinds stand for exactly one lexeme. The remaining kinds are
/// classes whose lexeme varies (`num`, `id`), or markers with no source text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // operators
    Assign,     // =
    Plus,       // +
    Minus,      // -
    Multiply,   // *
    Divide,     // /
    LeftParen,  // (
    RightParen, // )
    Semicolon,  // ;

    // classes
    Number,
    Identifier,
    Eof,

    // only used in diagnostics
    Any,
    Empty,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let s = match self {
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Number => "num",
            TokenKind::Identifier => "id",
            TokenKind::Eof => "EOF",
            TokenKind::Any => "ANY",
            TokenKind::Empty => "EMPTY",
        };
        f.write_str(s)
    }
}

/// A lexical unit, borrowed from the program it was scanned from.
///
/// `pos` is the byte offset of the first character of `lexeme`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub pos: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, pos: usize) -> Self {
        Token { kind, lexeme, pos }
    }

    /// Two tokens match when their kinds are equal, whatever their lexemes.
    pub fn matches(&self, other: &Token) -> bool {
        self.kind == other.kind
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.kind {
            TokenKind::Number | TokenKind::Identifier => write!(f, "{}({})", self.kind, self.lexeme),
            kind => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Token, TokenKind};

    #[test]
    fn display() {
        assert_eq!(Token::new(TokenKind::Identifier, "foo", 0).to_string(), "id(foo)");
        assert_eq!(Token::new(TokenKind::Number, "3.5", 0).to_string(), "num(3.5)");
        assert_eq!(Token::new(TokenKind::Semicolon, ";", 0).to_string(), ";");
        assert_eq!(Token::new(TokenKind::Eof, "", 9).to_string(), "EOF");
    }

    #[test]
    fn matching_ignores_lexeme() {
        let a = Token::new(TokenKind::Identifier, "a", 0);
        let b = Token::new(TokenKind::Identifier, "b", 4);
        assert!(a.matches(&b));
        assert!(!a.matches(&Token::new(TokenKind::Number, "a", 0)));
    }
}
