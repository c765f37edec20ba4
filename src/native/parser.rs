use std::collections::HashMap;

use lazy_static::lazy_static;

use super::scanner::NativeToken;
use super::value::HostValue;
use crate::error::{Error, Result};

lazy_static! {
    /// Identifiers that read as literal values
    static ref KEYWORDS: HashMap<&'static str, HostValue> = {
        let mut m = HashMap::new();
        m.insert("true", HostValue::Bool(true));
        m.insert("false", HostValue::Bool(false));
        m.insert("null", HostValue::Null);
        m.insert("undefined", HostValue::Undefined);
        m.insert("NaN", HostValue::Number(f64::NAN));
        m.insert("Infinity", HostValue::Number(f64::INFINITY));
        m
    };
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition or string concatenation (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Division operator (/)
    Div,
    /// Remainder operator (%)
    Mod,
    /// Loose equality (==)
    Eq,
    /// Loose inequality (!=)
    NotEq,
    /// Strict equality (===)
    StrictEq,
    /// Strict inequality (!==)
    StrictNotEq,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Greater than or equal operator (>=)
    GtEq,
    /// Short-circuit AND (&&)
    And,
    /// Short-circuit OR (||)
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation operator (-x)
    Neg,
    /// Numeric conversion (+x)
    Plus,
    /// Logical NOT operator (!x)
    Not,
}

/// Expression tree of a `native` source text
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(HostValue),
    /// Bound name
    Ident(String),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// Prefix operator
    Unary(UnaryOp, Box<Expr>),
    /// Infix operator
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `cond ? then : else`
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `object.property`
    Member(Box<Expr>, String),
    /// `object[index]`
    Index(Box<Expr>, Box<Expr>),
}

/// Precedence-climbing parser over [`NativeToken`]s
pub struct NativeParser {
    tokens: Vec<NativeToken>,
    current: usize,
}

impl NativeParser {
    /// Creates a parser over scanned tokens
    pub fn new(tokens: Vec<NativeToken>) -> Self {
        NativeParser { tokens, current: 0 }
    }

    /// Parses exactly one expression
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.conditional()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(syntax_error(format!("unexpected token {:?}", token))),
        }
    }

    fn conditional(&mut self) -> Result<Expr> {
        let cond = self.binary(0)?;
        if !self.match_punct("?") {
            return Ok(cond);
        }
        let then = self.conditional()?;
        self.expect_punct(":")?;
        let otherwise = self.conditional()?;
        Ok(Expr::Conditional(
            Box::new(cond),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    /// Left-associative binary operators at or above `min_level`
    fn binary(&mut self, min_level: u8) -> Result<Expr> {
        let mut left = self.unary()?;

        while let Some((op, level)) = self.peek_binary_op() {
            if level < min_level {
                break;
            }
            self.current += 1;
            let right = self.binary(level + 1)?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, u8)> {
        let punct = match self.peek() {
            Some(NativeToken::Punct(p)) => *p,
            _ => return None,
        };
        let entry = match punct {
            "||" => (BinaryOp::Or, 0),
            "&&" => (BinaryOp::And, 1),
            "==" => (BinaryOp::Eq, 2),
            "!=" => (BinaryOp::NotEq, 2),
            "===" => (BinaryOp::StrictEq, 2),
            "!==" => (BinaryOp::StrictNotEq, 2),
            "<" => (BinaryOp::Lt, 3),
            ">" => (BinaryOp::Gt, 3),
            "<=" => (BinaryOp::LtEq, 3),
            ">=" => (BinaryOp::GtEq, 3),
            "+" => (BinaryOp::Add, 4),
            "-" => (BinaryOp::Sub, 4),
            "*" => (BinaryOp::Mul, 5),
            "/" => (BinaryOp::Div, 5),
            "%" => (BinaryOp::Mod, 5),
            _ => return None,
        };
        Some(entry)
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(NativeToken::Punct("!")) => Some(UnaryOp::Not),
            Some(NativeToken::Punct("-")) => Some(UnaryOp::Neg),
            Some(NativeToken::Punct("+")) => Some(UnaryOp::Plus),
            _ => None,
        };
        match op {
            Some(op) => {
                self.current += 1;
                Ok(Expr::Unary(op, Box::new(self.unary()?)))
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_punct(".") {
                match self.advance() {
                    Some(NativeToken::Ident(name)) => {
                        expr = Expr::Member(Box::new(expr), name);
                    }
                    _ => return Err(syntax_error("expected property name after '.'")),
                }
            } else if self.match_punct("[") {
                let index = self.conditional()?;
                self.expect_punct("]")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(NativeToken::Number(n)) => Ok(Expr::Literal(HostValue::Number(n))),
            Some(NativeToken::Str(s)) => Ok(Expr::Literal(HostValue::Str(s))),
            Some(NativeToken::Ident(name)) => match KEYWORDS.get(name.as_str()) {
                Some(value) => Ok(Expr::Literal(value.clone())),
                None => Ok(Expr::Ident(name)),
            },
            Some(NativeToken::Punct("(")) => {
                let inner = self.conditional()?;
                self.expect_punct(")")?;
                Ok(inner)
            }
            Some(NativeToken::Punct("[")) => {
                let mut items = Vec::new();
                if !self.match_punct("]") {
                    loop {
                        items.push(self.conditional()?);
                        if self.match_punct("]") {
                            break;
                        }
                        self.expect_punct(",")?;
                    }
                }
                Ok(Expr::Array(items))
            }
            Some(token) => Err(syntax_error(format!("unexpected token {:?}", token))),
            None => Err(syntax_error("unexpected end of expression")),
        }
    }

    fn peek(&self) -> Option<&NativeToken> {
        self.tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<NativeToken> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn match_punct(&mut self, punct: &str) -> bool {
        match self.peek() {
            Some(NativeToken::Punct(p)) if *p == punct => {
                self.current += 1;
                true
            }
            _ => false,
        }
    }

    fn expect_punct(&mut self, punct: &str) -> Result<()> {
        if self.match_punct(punct) {
            Ok(())
        } else {
            Err(syntax_error(format!("expected '{}'", punct)))
        }
    }
}

fn syntax_error(message: impl Into<String>) -> Error {
    Error::Native(format!("syntax error: {}", message.into()))
}
