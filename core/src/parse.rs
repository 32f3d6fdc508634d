//! Recursive-descent parser for the boolean query language.
//!
//! ```text
//! query    = or_expr End .
//! or_expr  = and_expr { "OR" and_expr } .
//! and_expr = unary { "AND" unary } .
//! unary    = Term | "NOT" unary | "(" or_expr ")" .
//! ```

use std::fmt;

use crate::error::{Error, Result};
use crate::scan::{Lexer, Token, TokenKind};

/// Query syntax tree.
///
/// `And` and `Or` are n-ary: operand chains at one precedence level
/// become siblings, and a chain of one collapses to the operand itself,
/// so parser-built trees never hold single-child `And`/`Or` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Term(word) => write!(f, "{word}"),
            Expr::Not(inner) => write!(f, "NOT {inner}"),
            Expr::And(operands) => write_infix(f, operands, " AND "),
            Expr::Or(operands) => write_infix(f, operands, " OR "),
        }
    }
}

fn write_infix(f: &mut fmt::Formatter<'_>, operands: &[Expr], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, "{op}")?;
        }
        write!(f, "{operand}")?;
    }
    write!(f, ")")
}

/// Parse `query` into an [`Expr`], or a positioned syntax error.
pub fn parse_query(query: &str) -> Result<Expr> {
    QueryParser::new(query).parse()
}

pub struct QueryParser<'a> {
    lexer: Lexer<'a>,
    token: Token,
}

impl<'a> QueryParser<'a> {
    pub fn new(query: &'a str) -> Self {
        let mut lexer = Lexer::new(query);
        let token = lexer.next_token();
        QueryParser { lexer, token }
    }

    pub fn parse(mut self) -> Result<Expr> {
        let tree = self.or_expr()?;
        if !self.accept(TokenKind::End) {
            return Err(self.syntax_error());
        }
        Ok(tree)
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut operands = vec![self.and_expr()?];
        while self.accept_value(TokenKind::BinaryOp, "OR") {
            operands.push(self.and_expr()?);
        }
        Ok(collapse(operands, Expr::Or))
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut operands = vec![self.unary()?];
        while self.accept_value(TokenKind::BinaryOp, "AND") {
            operands.push(self.unary()?);
        }
        Ok(collapse(operands, Expr::And))
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.token.kind == TokenKind::Term {
            let word = std::mem::take(&mut self.token.value);
            self.advance();
            return Ok(Expr::Term(word));
        }

        if self.accept_value(TokenKind::UnaryOp, "NOT") {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }

        if self.accept_value(TokenKind::Symbol, "(") {
            let tree = self.or_expr()?;
            if !self.accept_value(TokenKind::Symbol, ")") {
                return Err(self.syntax_error());
            }
            return Ok(tree);
        }

        Err(self.syntax_error())
    }

    fn advance(&mut self) {
        self.token = self.lexer.next_token();
    }

    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.token.kind == kind {
            self.advance();
            return true;
        }
        false
    }

    fn accept_value(&mut self, kind: TokenKind, value: &str) -> bool {
        if self.token.value == value {
            return self.accept(kind);
        }
        false
    }

    fn syntax_error(&self) -> Error {
        Error::Syntax(format!(
            "Syntax error at ({}, {})",
            self.token.line, self.token.column
        ))
    }
}

fn collapse(mut operands: Vec<Expr>, combine: fn(Vec<Expr>) -> Expr) -> Expr {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        combine(operands)
    }
}
