//! Contains `Scanner`, an on-demand producer of tokens.

use crate::{
    compiler::{Token, TokenKind},
    error::{ErrorKind, TranslateError},
    trace, warn,
};

use once_cell::sync::Lazy;

use std::fmt::{Display, Formatter};

const WHITESPACE: u8 = 1 << 0;
const DIGIT: u8 = 1 << 1;
const LETTER: u8 = 1 << 2;
const LEGIT: u8 = LETTER | DIGIT;
const OPERATOR: u8 = 1 << 3;

/// Every operator lexeme the scanner knows. Lexemes longer than one
/// character are found by the two-character lookahead in [`Scanner::next`].
const OPERATORS: &[(&str, TokenKind)] = &[
    ("=", TokenKind::Assign),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Multiply),
    ("/", TokenKind::Divide),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    (";", TokenKind::Semicolon),
];

const KEYWORDS: &[(&str, TokenKind)] = &[];

/// Character-class membership for every byte, built once.
static CLASSES: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut table = [0; 256];

    for c in [b' ', b'\n', b'\t'] {
        table[c as usize] |= WHITESPACE;
    }
    for c in b'0'..=b'9' {
        table[c as usize] |= DIGIT;
    }
    for c in (b'A'..=b'Z').chain(b'a'..=b'z') {
        table[c as usize] |= LETTER;
    }
    for (lexeme, _) in OPERATORS {
        if let [c] = lexeme.as_bytes() {
            table[*c as usize] |= OPERATOR;
        }
    }

    table
});

fn is(c: u8, class: u8) -> bool {
    CLASSES[c as usize] & class != 0
}

fn operator(lexeme: &str) -> Option<TokenKind> {
    OPERATORS
        .iter()
        .find(|(op, _)| *op == lexeme)
        .map(|(_, kind)| *kind)
}

fn keyword(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == lexeme)
        .map(|(_, kind)| *kind)
}

/// A character the scanner did not recognize and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: usize,
    pub character: char,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "illegal character {:?} at position {}",
            self.character, self.pos
        )
    }
}

/// Converts a program into a stream of [`Token`]s.
///
/// Tokens are scanned on demand: each call to [`next`] scans exactly one
/// token and makes it the current token, available through [`curr`]. Input
/// already scanned is never looked at again.
///
/// Illegal characters do not stop the scanner. They are recorded as
/// [`Diagnostic`]s and skipped.
///
/// [`next`]: Scanner::next
/// [`curr`]: Scanner::curr
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    token: Option<Token<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    /// Create a new `Scanner` from a source. No token is current until the
    /// first call to [`next`](Scanner::next).
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            pos: 0,
            token: None,
            diagnostics: Vec::new(),
        }
    }

    /// Scans every token of `source`, not including the final `EOF`.
    pub fn scan_all(source: &'a str) -> (Vec<Token<'a>>, Vec<Diagnostic>) {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        while scanner.next() {
            if let Some(token) = scanner.token {
                tokens.push(token);
            }
        }
        (tokens, scanner.diagnostics)
    }

    /// Scans the next token. Returns false once the end of the source is
    /// reached, at which point the current token is `EOF`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        loop {
            self.many(WHITESPACE);

            if self.source[self.pos..].starts_with("//") {
                self.past(b'\n');
                continue;
            }

            if self.done() {
                self.token = Some(Token::new(TokenKind::Eof, "", self.pos));
                return false;
            }

            let c = self.source.as_bytes()[self.pos];
            if is(c, DIGIT) {
                self.scan_number();
            } else if is(c, LETTER) {
                self.scan_identifier_or_keyword();
            } else if let Some((kind, len)) = self.operator_at(self.pos) {
                self.add_token(kind, self.pos, self.pos + len);
            } else {
                let character = self.source[self.pos..].chars().next().unwrap_or_default();
                let diagnostic = Diagnostic {
                    pos: self.pos,
                    character,
                };
                warn!("{}", diagnostic);
                self.diagnostics.push(diagnostic);
                self.pos += character.len_utf8();
                continue;
            }

            return true;
        }
    }

    /// The most recently scanned token.
    pub fn curr(&self) -> Result<Token<'a>, TranslateError> {
        self.token.ok_or_else(|| {
            TranslateError::new(ErrorKind::UnexpectedToken {
                expected: TokenKind::Any.to_string(),
                found: TokenKind::Empty.to_string(),
            })
            .pos(self.pos)
        })
    }

    /// Checks that the current token is of kind `kind` and moves past it,
    /// returning it.
    pub fn consume(&mut self, kind: TokenKind) -> Result<Token<'a>, TranslateError> {
        let token = self.curr()?;
        if token.kind != kind {
            return Err(TranslateError::new(ErrorKind::UnexpectedToken {
                expected: kind.to_string(),
                found: token.to_string(),
            })
            .pos(token.pos));
        }

        self.next();
        Ok(token)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn done(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Illegal characters skipped so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        self.many(DIGIT);
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            self.many(DIGIT);
        }
        self.add_token(TokenKind::Number, start, self.pos);
    }

    fn scan_identifier_or_keyword(&mut self) {
        let start = self.pos;
        self.many(LETTER);
        self.many(LEGIT);
        let kind = keyword(&self.source[start..self.pos]).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, start, self.pos);
    }

    fn operator_at(&self, start: usize) -> Option<(TokenKind, usize)> {
        if !is(self.source.as_bytes()[start], OPERATOR) {
            return None;
        }

        if let Some(kind) = self.source.get(start..start + 2).and_then(operator) {
            return Some((kind, 2));
        }

        operator(&self.source[start..start + 1]).map(|kind| (kind, 1))
    }

    fn add_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        let token = Token::new(kind, &self.source[start..end], start);
        trace!("token {} at {}", token, start);
        self.token = Some(token);
        self.pos = end;
    }

    fn many(&mut self, class: u8) {
        while let Some(c) = self.peek_byte() {
            if !is(c, class) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Moves just past the next `c`, or to the end of the source.
    fn past(&mut self, c: u8) {
        while let Some(b) = self.peek_byte() {
            self.pos += 1;
            if b == c {
                break;
            }
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }
}
