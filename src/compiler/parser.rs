//! Contains `Parser`, which converts a program into a ctrans AST.

use crate::{
    compiler::{
        ast::{BinaryOp, Node},
        scanner::{Diagnostic, Scanner},
        TokenKind,
    },
    error::{ErrorKind, TranslateError},
    trace,
};

/// A recursive descent parser for ctrans.
///
/// Tokens are pulled on demand from a [`Scanner`]. Each grammar rule is one
/// method:
///
/// ```text
/// statement  -> assignment ";"
/// assignment -> id "=" expr
/// expr       -> term (("+" | "-") term)*
/// term       -> factor (("*" | "/") factor)*
/// factor     -> "-" factor | "(" expr ")" | num | id
/// ```
///
/// The first syntax error aborts the statement being parsed.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    depth: usize,
}

/// How deeply factors may nest, counting both parentheses and unary minus.
pub const MAX_DEPTH: usize = 128;

impl<'a> Parser<'a> {
    /// Create a new parser over `source`, with its first token scanned.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        scanner.next();
        Parser { scanner, depth: 0 }
    }

    /// Parse one statement. Tokens after its semicolon are not consumed.
    pub fn statement(&mut self) -> Result<Node<'a>, TranslateError> {
        trace!("statement");
        let node = self.assignment()?;
        self.scanner.consume(TokenKind::Semicolon)?;
        Ok(node)
    }

    /// Parse statements until the end of the source.
    pub fn program(&mut self) -> Result<Node<'a>, TranslateError> {
        let pos = self.scanner.curr()?.pos;
        let mut body = Vec::new();
        while self.scanner.curr()?.kind != TokenKind::Eof {
            body.push(self.statement()?);
        }
        Ok(Node::Block { pos, body })
    }

    /// Illegal characters skipped while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.scanner.diagnostics()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.scanner.take_diagnostics()
    }

    fn assignment(&mut self) -> Result<Node<'a>, TranslateError> {
        trace!("assignment");
        let name = self.scanner.consume(TokenKind::Identifier)?;
        self.scanner.consume(TokenKind::Assign)?;
        let value = self.expr()?;
        Ok(Node::Assignment {
            name,
            value: Box::new(value),
        })
    }

    fn expr(&mut self) -> Result<Node<'a>, TranslateError> {
        trace!("expr");
        let mut lhs = self.term()?;
        while let Some(op) = self.operator(&[BinaryOp::Add, BinaryOp::Sub])? {
            let rhs = self.term()?;
            lhs = binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Node<'a>, TranslateError> {
        trace!("term");
        let mut lhs = self.factor()?;
        while let Some(op) = self.operator(&[BinaryOp::Mul, BinaryOp::Div])? {
            let rhs = self.factor()?;
            lhs = binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Node<'a>, TranslateError> {
        self.depth += 1;
        let result = self.nested_factor();
        self.depth -= 1;
        result
    }

    fn nested_factor(&mut self) -> Result<Node<'a>, TranslateError> {
        let token = self.scanner.curr()?;
        trace!("factor {} depth {}", token, self.depth);
        if self.depth > MAX_DEPTH {
            return Err(TranslateError::new(ErrorKind::UnexpectedToken {
                expected: format!("at most {MAX_DEPTH} nested factors"),
                found: token.to_string(),
            })
            .pos(token.pos));
        }

        match token.kind {
            TokenKind::Minus => {
                self.scanner.consume(TokenKind::Minus)?;
                let rhs = self.factor()?;
                Ok(Node::Negate {
                    op: token,
                    rhs: Box::new(rhs),
                })
            }

            TokenKind::LeftParen => {
                self.scanner.consume(TokenKind::LeftParen)?;
                let expr = self.expr()?;
                self.scanner.consume(TokenKind::RightParen)?;
                Ok(Node::Group {
                    paren: token,
                    expr: Box::new(expr),
                })
            }

            TokenKind::Number => {
                let literal = self.scanner.consume(TokenKind::Number)?;
                let value = literal.lexeme.parse::<f64>().map_err(|_| {
                    TranslateError::new(ErrorKind::UnexpectedToken {
                        expected: TokenKind::Number.to_string(),
                        found: literal.to_string(),
                    })
                    .pos(literal.pos)
                })?;
                Ok(Node::Number { literal, value })
            }

            TokenKind::Identifier => {
                let name = self.scanner.consume(TokenKind::Identifier)?;
                Ok(Node::Variable { name })
            }

            _ => Err(TranslateError::new(ErrorKind::UnexpectedToken {
                expected: String::from("factor"),
                found: token.to_string(),
            })
            .pos(token.pos)),
        }
    }

    /// Consumes the current token if it is one of the operators `ops`.
    fn operator(
        &mut self,
        ops: &[BinaryOp],
    ) -> Result<Option<BinaryOp>, TranslateError> {
        let token = self.scanner.curr()?;
        match BinaryOp::from_kind(token.kind) {
            Some(op) if ops.contains(&op) => {
                self.scanner.consume(token.kind)?;
                Ok(Some(op))
            }
            _ => Ok(None),
        }
    }
}

fn binary<'a>(lhs: Node<'a>, op: BinaryOp, rhs: Node<'a>) -> Node<'a> {
    Node::Binary {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }
}

/// Parses the first statement of `source`.
pub fn parse(source: &str) -> Result<Node<'_>, TranslateError> {
    Parser::new(source).statement()
}

/// Parses every statement of `source` into a [`Node::Block`].
pub fn parse_program(source: &str) -> Result<Node<'_>, TranslateError> {
    Parser::new(source).program()
}
