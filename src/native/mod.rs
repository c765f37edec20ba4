//! Host-expression escape hatch behind the `native` form
//!
//! A `native` form carries expression text in a small JavaScript-like subset:
//! literals, names, array literals, parentheses, `! - +` prefixes,
//! arithmetic, comparison, equality, `&&`/`||`, the `?:` conditional,
//! `.length` and indexing. The text is compiled once into an [`Expr`] and
//! evaluated against named [`HostValue`] bindings.

mod parser;
mod scanner;
mod value;

use std::collections::HashMap;

pub use parser::{BinaryOp, Expr, NativeParser, UnaryOp};
pub use scanner::{NativeScanner, NativeToken};
pub use value::HostValue;

use crate::error::{Error, Result};

/// A compiled `native` expression
#[derive(Debug, Clone, PartialEq)]
pub struct NativeExpr {
    source: String,
    expr: Expr,
}

impl NativeExpr {
    /// Compile expression text
    pub fn compile(source: &str) -> Result<Self> {
        let tokens = NativeScanner::new(source).scan_tokens()?;
        let expr = NativeParser::new(tokens).parse()?;
        Ok(NativeExpr {
            source: source.to_string(),
            expr,
        })
    }

    /// Original expression text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with the given name bindings
    pub fn evaluate(&self, bindings: &HashMap<String, HostValue>) -> Result<HostValue> {
        evaluate(&self.expr, bindings)
    }
}

/// Evaluate an expression tree
pub fn evaluate(expr: &Expr, bindings: &HashMap<String, HostValue>) -> Result<HostValue> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => bindings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Native(format!("{} is not defined", name))),
        Expr::Array(items) => Ok(HostValue::Array(
            items
                .iter()
                .map(|item| evaluate(item, bindings))
                .collect::<Result<Vec<_>>>()?,
        )),
        Expr::Unary(op, operand) => {
            let value = evaluate(operand, bindings)?;
            Ok(match op {
                UnaryOp::Not => HostValue::Bool(!value.is_truthy()),
                UnaryOp::Neg => HostValue::Number(-value.to_number()),
                UnaryOp::Plus => HostValue::Number(value.to_number()),
            })
        }
        Expr::Binary(BinaryOp::And, left, right) => {
            let left = evaluate(left, bindings)?;
            if left.is_truthy() {
                evaluate(right, bindings)
            } else {
                Ok(left)
            }
        }
        Expr::Binary(BinaryOp::Or, left, right) => {
            let left = evaluate(left, bindings)?;
            if left.is_truthy() {
                Ok(left)
            } else {
                evaluate(right, bindings)
            }
        }
        Expr::Binary(op, left, right) => {
            let left = evaluate(left, bindings)?;
            let right = evaluate(right, bindings)?;
            Ok(apply_binary_op(*op, &left, &right))
        }
        Expr::Conditional(cond, then, otherwise) => {
            if evaluate(cond, bindings)?.is_truthy() {
                evaluate(then, bindings)
            } else {
                evaluate(otherwise, bindings)
            }
        }
        Expr::Member(object, property) => {
            let object = evaluate(object, bindings)?;
            member(&object, property)
        }
        Expr::Index(object, index) => {
            let object = evaluate(object, bindings)?;
            let index = evaluate(index, bindings)?;
            index_into(&object, &index)
        }
    }
}

fn apply_binary_op(op: BinaryOp, left: &HostValue, right: &HostValue) -> HostValue {
    use std::cmp::Ordering;

    let ordered = |accept: fn(Ordering) -> bool| {
        HostValue::Bool(left.compare(right).map(accept).unwrap_or(false))
    };

    match op {
        BinaryOp::Add => left.add(right),
        BinaryOp::Sub => HostValue::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => HostValue::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => HostValue::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => HostValue::Number(left.to_number() % right.to_number()),
        BinaryOp::Eq => HostValue::Bool(left.loose_equals(right)),
        BinaryOp::NotEq => HostValue::Bool(!left.loose_equals(right)),
        BinaryOp::StrictEq => HostValue::Bool(left.strict_equals(right)),
        BinaryOp::StrictNotEq => HostValue::Bool(!left.strict_equals(right)),
        BinaryOp::Lt => ordered(|o| o == Ordering::Less),
        BinaryOp::Gt => ordered(|o| o == Ordering::Greater),
        BinaryOp::LtEq => ordered(|o| o != Ordering::Greater),
        BinaryOp::GtEq => ordered(|o| o != Ordering::Less),
        // Short-circuit forms are handled before both sides are evaluated
        BinaryOp::And | BinaryOp::Or => HostValue::Undefined,
    }
}

fn member(object: &HostValue, property: &str) -> Result<HostValue> {
    match object {
        HostValue::Undefined | HostValue::Null => Err(Error::Native(format!(
            "cannot read property '{}' of {}",
            property,
            object.type_name()
        ))),
        _ if property == "length" => Ok(object
            .length()
            .map(|n| HostValue::Number(n as f64))
            .unwrap_or(HostValue::Undefined)),
        _ => Ok(HostValue::Undefined),
    }
}

fn index_into(object: &HostValue, index: &HostValue) -> Result<HostValue> {
    if let HostValue::Str(property) = index {
        if property == "length" {
            return member(object, property);
        }
    }

    let position = index.to_number();
    let slot = if position >= 0.0 && position.fract() == 0.0 {
        Some(position as usize)
    } else {
        None
    };

    match (object, slot) {
        (HostValue::Undefined | HostValue::Null, _) => Err(Error::Native(format!(
            "cannot read index {} of {}",
            index,
            object.type_name()
        ))),
        (HostValue::Array(items), Some(i)) => Ok(items.get(i).cloned().unwrap_or(HostValue::Undefined)),
        (HostValue::Str(s), Some(i)) => Ok(s
            .chars()
            .nth(i)
            .map(|c| HostValue::Str(c.to_string()))
            .unwrap_or(HostValue::Undefined)),
        _ => Ok(HostValue::Undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, bindings: &[(&str, HostValue)]) -> Result<HostValue> {
        let bindings: HashMap<String, HostValue> = bindings
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        NativeExpr::compile(source)?.evaluate(&bindings)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("1 + 1", &[]).unwrap(), HostValue::Number(2.0));
        assert_eq!(run("2 * (3 + 4) - 1", &[]).unwrap(), HostValue::Number(13.0));
        assert_eq!(run("7 % 3", &[]).unwrap(), HostValue::Number(1.0));
        assert_eq!(run("-a", &[("a", HostValue::Number(2.0))]).unwrap(), HostValue::Number(-2.0));
    }

    #[test]
    fn test_bound_names() {
        let result = run(
            "a + b",
            &[("a", HostValue::Number(1.0)), ("b", HostValue::Number(2.0))],
        );
        assert_eq!(result.unwrap(), HostValue::Number(3.0));
        assert_eq!(NativeExpr::compile("a + b").unwrap().source(), "a + b");
    }

    #[test]
    fn test_string_length_conditional() {
        let s = HostValue::Str("abc".into());
        assert_eq!(run("s? s.length: 0", &[("s", s)]).unwrap(), HostValue::Number(3.0));
        let empty = HostValue::Str(String::new());
        assert_eq!(run("s? s.length: 0", &[("s", empty)]).unwrap(), HostValue::Number(0.0));
    }

    #[test]
    fn test_logic_short_circuits() {
        // `missing` is never evaluated
        assert_eq!(run("false && missing", &[]).unwrap(), HostValue::Bool(false));
        assert_eq!(run("1 || missing", &[]).unwrap(), HostValue::Number(1.0));
        assert!(run("true && missing", &[]).is_err());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(run("1 < 2", &[]).unwrap(), HostValue::Bool(true));
        assert_eq!(run("'b' > 'a'", &[]).unwrap(), HostValue::Bool(true));
        assert_eq!(run("1 == '1'", &[]).unwrap(), HostValue::Bool(true));
        assert_eq!(run("1 === '1'", &[]).unwrap(), HostValue::Bool(false));
        assert_eq!(run("NaN <= NaN", &[]).unwrap(), HostValue::Bool(false));
    }

    #[test]
    fn test_arrays() {
        let xs = HostValue::Array(vec![HostValue::Number(5.0), HostValue::Number(6.0)]);
        assert_eq!(run("xs[1]", &[("xs", xs.clone())]).unwrap(), HostValue::Number(6.0));
        assert_eq!(run("xs.length", &[("xs", xs.clone())]).unwrap(), HostValue::Number(2.0));
        assert_eq!(run("xs[9]", &[("xs", xs)]).unwrap(), HostValue::Undefined);
        assert_eq!(
            run("[1, 'a']", &[]).unwrap(),
            HostValue::Array(vec![HostValue::Number(1.0), HostValue::Str("a".into())])
        );
    }

    #[test]
    fn test_errors() {
        assert!(run("x", &[]).unwrap_err().to_string().contains("x is not defined"));
        assert!(run("u.length", &[("u", HostValue::Undefined)]).is_err());
        assert!(NativeExpr::compile("1 +").is_err());
    }
}
