//! Errors produced while translating a program.
//!
//! There are two hard failures. Syntax errors come out of the scanner and
//! parser, evaluation errors out of [`Node::evaluate`]. Both carry the byte
//! offset into the program where they happened. Illegal characters are not
//! errors, see [`Diagnostic`].
//!
//! [`Node::evaluate`]: crate::compiler::ast::Node::evaluate
//! [`Diagnostic`]: crate::compiler::scanner::Diagnostic

use std::error::Error;
use std::fmt::{Display, Formatter};

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The parser wanted `expected` but the scanner produced `found`.
    UnexpectedToken { expected: String, found: String },
    UndefinedVariable { name: String },
    /// The node has no value of its own.
    CannotEvaluate,
    Io { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateError {
    kind: ErrorKind,
    pos: usize,
}

impl TranslateError {
    pub fn new(kind: ErrorKind) -> Self {
        TranslateError { kind, pos: 0 }
    }

    pub fn pos(mut self, pos: usize) -> Self {
        self.pos = pos;
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedToken { .. })
    }

    pub fn is_evaluation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UndefinedVariable { .. } | ErrorKind::CannotEvaluate
        )
    }

    /// Renders the line of `source` containing the error with a caret under
    /// the offending column, followed by the error itself.
    pub fn report(&self, source: &str) -> String {
        let pos = floor_char_boundary(source, self.pos);
        let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(source.len());
        let line_number = source[..line_start].matches('\n').count() + 1;

        let gutter = format!("{line_number} | ");
        let column = source[line_start..pos].graphemes(true).count();

        format!(
            "{gutter}{}\n{}^ {self}",
            &source[line_start..line_end],
            " ".repeat(gutter.len() + column),
        )
    }
}

fn floor_char_boundary(s: &str, mut pos: usize) -> usize {
    pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

impl Display for TranslateError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedToken { expected, found } => write!(
                f,
                "syntax error, pos={}, expected={expected}, found={found}",
                self.pos
            ),
            ErrorKind::UndefinedVariable { name } => {
                write!(f, "eval error, pos={}, undefined variable: {name}", self.pos)
            }
            ErrorKind::CannotEvaluate => {
                write!(f, "eval error, pos={}, cannot evaluate node", self.pos)
            }
            ErrorKind::Io { path, message } => write!(f, "could not read {path}: {message}"),
        }
    }
}

impl Error for TranslateError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let e = TranslateError::new(ErrorKind::UndefinedVariable {
            name: String::from("x"),
        })
        .pos(4);
        assert_eq!(e.to_string(), "eval error, pos=4, undefined variable: x");
        assert!(e.is_evaluation());
        assert!(!e.is_syntax());
    }

    #[test]
    fn report_points_at_column() {
        let src = "a = 1;\nb = é + ?;";
        let e = TranslateError::new(ErrorKind::UnexpectedToken {
            expected: String::from("factor"),
            found: String::from(";"),
        })
        .pos(src.find('?').unwrap());

        let report = e.report(src);
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("2 | b = é + ?;"));
        let caret = format!("{}^ syntax error", " ".repeat(12));
        assert!(lines.next().unwrap().starts_with(&caret));
    }

    #[test]
    fn report_clamps_position() {
        let e = TranslateError::new(ErrorKind::CannotEvaluate).pos(100);
        assert_eq!(e.report("x"), "1 | x\n     ^ eval error, pos=100, cannot evaluate node");
    }
}
