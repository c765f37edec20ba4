//! Host values seen by `native` expressions and their JavaScript-like semantics

use std::fmt;

use crate::runtime::format_number;

/// A value inside a `native` expression
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// `undefined`
    Undefined,
    /// `null`, also what nil and functions unpack to
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE double, NaN and infinities included
    Number(f64),
    /// String
    Str(String),
    /// Array, what lists unpack to
    Array(Vec<HostValue>),
}

impl HostValue {
    /// Type tag used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Number(_) => "number",
            HostValue::Str(_) => "string",
            HostValue::Array(_) => "array",
        }
    }

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            HostValue::Undefined | HostValue::Null => false,
            HostValue::Bool(b) => *b,
            HostValue::Number(n) => *n != 0.0 && !n.is_nan(),
            HostValue::Str(s) => !s.is_empty(),
            HostValue::Array(_) => true,
        }
    }

    /// Numeric conversion (`+x`)
    pub fn to_number(&self) -> f64 {
        match self {
            HostValue::Undefined => f64::NAN,
            HostValue::Null => 0.0,
            HostValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            HostValue::Number(n) => *n,
            HostValue::Str(s) => parse_numeric(s),
            HostValue::Array(_) => parse_numeric(&self.to_js_string()),
        }
    }

    /// String conversion (`String(x)`)
    pub fn to_js_string(&self) -> String {
        match self {
            HostValue::Undefined => "undefined".to_string(),
            HostValue::Null => "null".to_string(),
            HostValue::Bool(b) => b.to_string(),
            HostValue::Number(n) => format_number(*n),
            HostValue::Str(s) => s.clone(),
            HostValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    HostValue::Undefined | HostValue::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn is_primitive(&self) -> bool {
        !matches!(self, HostValue::Array(_))
    }

    /// `a + b`: string concatenation as soon as either side is not numeric
    pub fn add(&self, other: &HostValue) -> HostValue {
        let stringy = |v: &HostValue| matches!(v, HostValue::Str(_) | HostValue::Array(_));
        if stringy(self) || stringy(other) {
            HostValue::Str(format!("{}{}", self.to_js_string(), other.to_js_string()))
        } else {
            HostValue::Number(self.to_number() + other.to_number())
        }
    }

    /// `a === b`
    pub fn strict_equals(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::Undefined, HostValue::Undefined) => true,
            (HostValue::Null, HostValue::Null) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Number(a), HostValue::Number(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            // Arrays compare by identity, and every unpacked array is fresh
            _ => false,
        }
    }

    /// `a == b`
    pub fn loose_equals(&self, other: &HostValue) -> bool {
        use HostValue::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Array(_), Array(_)) => false,
            (Bool(_), _) => HostValue::Number(self.to_number()).loose_equals(other),
            (_, Bool(_)) => self.loose_equals(&HostValue::Number(other.to_number())),
            (Array(_), _) => HostValue::Str(self.to_js_string()).loose_equals(other),
            (_, Array(_)) => self.loose_equals(&HostValue::Str(other.to_js_string())),
            (Str(a), Str(b)) => a == b,
            _ if self.is_primitive() && other.is_primitive() => {
                self.to_number() == other.to_number()
            }
            _ => false,
        }
    }

    /// Relational comparison; `None` when either side is NaN
    pub fn compare(&self, other: &HostValue) -> Option<std::cmp::Ordering> {
        let left = self.primitive();
        let right = other.primitive();
        match (&left, &right) {
            (HostValue::Str(a), HostValue::Str(b)) => Some(a.cmp(b)),
            _ => left.to_number().partial_cmp(&right.to_number()),
        }
    }

    fn primitive(&self) -> HostValue {
        match self {
            HostValue::Array(_) => HostValue::Str(self.to_js_string()),
            other => other.clone(),
        }
    }

    /// Length of a string (in UTF-16 units) or an array
    pub fn length(&self) -> Option<usize> {
        match self {
            HostValue::Str(s) => Some(s.encode_utf16().count()),
            HostValue::Array(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_js_string())
    }
}

fn parse_numeric(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}
