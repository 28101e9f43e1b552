//! The ctrans abstract syntax tree.
//!
//! Every syntactic construct is a variant of [`Node`]. A node can be
//! evaluated against a [`Store`], and it can be rendered as C with
//! [`Node::generate_code`]. Both walks share the same tree, so the value the
//! translator computes and the code it emits always agree on precedence.

use crate::{
    compiler::{Token, TokenKind},
    error::{ErrorKind, TranslateError},
    runtime::Store,
};

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_kind(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Multiply => Some(BinaryOp::Mul),
            TokenKind::Divide => Some(BinaryOp::Div),
            _ => None,
        }
    }

    /// IEEE 754 arithmetic. Dividing by zero gives an infinity or NaN.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// ctrans AST node.
///
/// Nodes keep the tokens they were parsed from, which gives every node a
/// source position for error reporting.
#[derive(Debug, PartialEq, Clone)]
pub enum Node<'a> {
    Number {
        literal: Token<'a>,
        value: f64,
    },
    Variable {
        name: Token<'a>,
    },
    Negate {
        op: Token<'a>,
        rhs: Box<Node<'a>>,
    },
    /// A parenthesized expression.
    Group {
        paren: Token<'a>,
        expr: Box<Node<'a>>,
    },
    /// Positioned at its left operand.
    Binary {
        lhs: Box<Node<'a>>,
        op: BinaryOp,
        rhs: Box<Node<'a>>,
    },
    Assignment {
        name: Token<'a>,
        value: Box<Node<'a>>,
    },
    /// A list of statements, in source order.
    Block {
        pos: usize,
        body: Vec<Node<'a>>,
    },
}

impl<'a> Node<'a> {
    pub fn pos(&self) -> usize {
        match self {
            Node::Number { literal, .. } => literal.pos,
            Node::Variable { name } => name.pos,
            Node::Negate { op, .. } => op.pos,
            Node::Group { paren, .. } => paren.pos,
            Node::Binary { lhs, .. } => lhs.pos(),
            Node::Assignment { name, .. } => name.pos,
            Node::Block { pos, .. } => *pos,
        }
    }

    /// Computes the value of this node. Assignments write to `store`.
    ///
    /// A block evaluates to its last statement. An empty block has no value
    /// and can't be evaluated.
    pub fn evaluate(&self, store: &mut Store) -> Result<f64, TranslateError> {
        match self {
            Node::Number { value, .. } => Ok(*value),
            Node::Variable { name } => store.get(name.pos, name.lexeme),
            Node::Negate { rhs, .. } => Ok(-rhs.evaluate(store)?),
            Node::Group { expr, .. } => expr.evaluate(store),
            Node::Binary { lhs, op, rhs } => {
                let lhs = lhs.evaluate(store)?;
                let rhs = rhs.evaluate(store)?;
                Ok(op.apply(lhs, rhs))
            }
            Node::Assignment { name, value } => {
                let value = value.evaluate(store)?;
                Ok(store.put(name.lexeme, value))
            }
            Node::Block { pos, body } => {
                let mut last = None;
                for stmt in body {
                    last = Some(stmt.evaluate(store)?);
                }
                last.ok_or_else(|| TranslateError::new(ErrorKind::CannotEvaluate).pos(*pos))
            }
        }
    }

    /// Renders this node as C.
    ///
    /// Parentheses appear only where the program had them. Precedence is
    /// otherwise carried by the shape of the tree.
    pub fn generate_code(&self) -> String {
        match self {
            Node::Number { literal, .. } => literal.lexeme.to_owned(),
            Node::Variable { name } => name.lexeme.to_owned(),
            Node::Negate { rhs, .. } => {
                let rhs = rhs.generate_code();
                format!("-{}{rhs}", separator(&rhs))
            }
            Node::Group { expr, .. } => format!("({})", expr.generate_code()),
            Node::Binary { lhs, op, rhs } => {
                let rhs = rhs.generate_code();
                let sep = if *op == BinaryOp::Sub { separator(&rhs) } else { "" };
                format!("{}{}{sep}{rhs}", lhs.generate_code(), op.symbol())
            }
            Node::Assignment { name, value } => {
                format!("{} = {};", name.lexeme, value.generate_code())
            }
            Node::Block { body, .. } => body
                .iter()
                .map(Node::generate_code)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

// keeps "a - -b" from turning into the C decrement operator
fn separator(rhs: &str) -> &'static str {
    if rhs.starts_with('-') {
        " "
    } else {
        ""
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Node::Number { literal, .. } => write!(f, "{}", literal.lexeme),
            Node::Variable { name } => write!(f, "{}", name.lexeme),
            Node::Negate { rhs, .. } => write!(f, "(- {rhs})"),
            Node::Group { expr, .. } => write!(f, "(group {expr})"),
            Node::Binary { lhs, op, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
            Node::Assignment { name, value } => write!(f, "(= {} {value})", name.lexeme),
            Node::Block { body, .. } => {
                write!(f, "(block")?;
                for stmt in body {
                    write!(f, " {stmt}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Prints the tree one node per line, indented by depth.
pub fn print_ast(node: &Node) -> String {
    let mut s = String::new();
    print_node(node, 0, &mut s);
    s
}

fn print_node(node: &Node, depth: usize, s: &mut String) {
    s.push_str(&"  ".repeat(depth));
    match node {
        Node::Number { literal, .. } => s.push_str(&format!("Number {}\n", literal.lexeme)),
        Node::Variable { name } => s.push_str(&format!("Variable {}\n", name.lexeme)),
        Node::Negate { rhs, .. } => {
            s.push_str("Negate\n");
            print_node(rhs, depth + 1, s);
        }
        Node::Group { expr, .. } => {
            s.push_str("Group\n");
            print_node(expr, depth + 1, s);
        }
        Node::Binary { lhs, op, rhs } => {
            s.push_str(&format!("Binary {}\n", op.symbol()));
            print_node(lhs, depth + 1, s);
            print_node(rhs, depth + 1, s);
        }
        Node::Assignment { name, value } => {
            s.push_str(&format!("Assignment {}\n", name.lexeme));
            print_node(value, depth + 1, s);
        }
        Node::Block { body, .. } => {
            s.push_str("Block\n");
            for stmt in body {
                print_node(stmt, depth + 1, s);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{print_ast, BinaryOp, Node};
    use crate::{
        compiler::{parser::parse, Token, TokenKind},
        error::ErrorKind,
        runtime::Store,
    };

    fn number(lexeme: &str) -> Node {
        Node::Number {
            literal: Token::new(TokenKind::Number, lexeme, 0),
            value: lexeme.parse().unwrap(),
        }
    }

    fn binary<'a>(lhs: Node<'a>, op: BinaryOp, rhs: Node<'a>) -> Node<'a> {
        Node::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    fn run(src: &str) -> (f64, String) {
        let mut store = Store::new();
        let node = parse(src).unwrap();
        (node.evaluate(&mut store).unwrap(), node.generate_code())
    }

    #[test]
    fn precedence() {
        assert_eq!(run("x = 1 + 2 * 3;"), (7.0, String::from("x = 1+2*3;")));
        assert_eq!(run("x = 1 * 2 + 3;"), (5.0, String::from("x = 1*2+3;")));
        assert_eq!(run("x = (1 + 2) * 3;"), (9.0, String::from("x = (1+2)*3;")));
    }

    #[test]
    fn left_associative() {
        assert_eq!(run("x = 10 - 4 - 3;").0, 3.0);
        assert_eq!(run("x = 16 / 4 / 2;").0, 2.0);
        assert_eq!(run("x = 2 - 3 + 4;").0, 3.0);
    }

    #[test]
    fn unary_minus() {
        assert_eq!(run("x = -(2 + 3);"), (-5.0, String::from("x = -(2+3);")));
        assert_eq!(run("x = --2;"), (2.0, String::from("x = - -2;")));
        assert_eq!(run("x = 1 - -2;"), (3.0, String::from("x = 1- -2;")));
        assert_eq!(run("x = -2 * -3;"), (6.0, String::from("x = -2*-3;")));
        assert_eq!(run("x = 1 + -2;"), (-1.0, String::from("x = 1+-2;")));
    }

    #[test]
    fn literals_are_copied() {
        assert_eq!(run("x = 1 / 2;"), (0.5, String::from("x = 1/2;")));
        assert_eq!(run("x = 010 + 3.;"), (13.0, String::from("x = 010+3.;")));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(run("x = 1 / 0;").0, f64::INFINITY);
        assert_eq!(run("x = -1 / 0;").0, f64::NEG_INFINITY);
        assert!(run("x = 0 / 0;").0.is_nan());
    }

    #[test]
    fn assignment_writes_store() {
        let mut store = Store::new();
        parse("x = 4;").unwrap().evaluate(&mut store).unwrap();
        let node = parse("y = x * x + x;").unwrap();
        assert_eq!(node.evaluate(&mut store).unwrap(), 20.0);
        assert_eq!(store.get(0, "y").unwrap(), 20.0);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let mut store = Store::new();
        store.put("a", 1.5);
        let node = parse("b = a * 2 - 1;").unwrap();
        let first = node.evaluate(&mut store).unwrap();
        let second = node.evaluate(&mut store).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, 2.0);
    }

    #[test]
    fn undefined_variable() {
        let mut store = Store::new();
        let node = parse("y = x;").unwrap();
        let err = node.evaluate(&mut store).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UndefinedVariable {
                name: String::from("x")
            }
        );
        assert_eq!(err.position(), 4);
        assert!(store.is_empty());
    }

    #[test]
    fn empty_block() {
        let block = Node::Block {
            pos: 3,
            body: Vec::new(),
        };
        let err = block.evaluate(&mut Store::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CannotEvaluate);
        assert_eq!(err.position(), 3);
        assert_eq!(block.generate_code(), "");
    }

    #[test]
    fn no_inserted_parentheses() {
        // (1 - 2) - 3 and 1 - (2 - 3) built by hand, neither with a Group
        let left = binary(binary(number("1"), BinaryOp::Sub, number("2")), BinaryOp::Sub, number("3"));
        assert_eq!(left.generate_code(), "1-2-3");
        assert_eq!(left.evaluate(&mut Store::new()).unwrap(), -4.0);
        assert_eq!(left.to_string(), "(- (- 1 2) 3)");
    }

    #[test]
    fn printed() {
        let node = parse("x = -a * (b + 1);").unwrap();
        assert_eq!(node.to_string(), "(= x (* (- a) (group (+ b 1))))");
        assert_eq!(
            print_ast(&node),
            "Assignment x\n  Binary *\n    Negate\n      Variable a\n    Group\n      Binary +\n        Variable b\n        Number 1\n"
        );
    }
}
