//! String builtins (`len` and `empty?` also accept lists)

use crate::builtins::{check_arity, Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Env, Term};

/// Register string builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(ConcatBuiltin);
    registry.register(StrToListBuiltin);
    registry.register(LenBuiltin);
    registry.register(IsEmptyBuiltin);
}

/// concat - Join one or more strings
pub struct ConcatBuiltin;

impl Builtin for ConcatBuiltin {
    fn name(&self) -> &str {
        "concat"
    }

    fn description(&self) -> &str {
        "Concatenation of one or more strings"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        check_arity("concat", args, 1, None, "function takes at least 1 argument")?;

        let mut joined = String::new();
        for arg in args {
            match arg {
                Term::String(s) => joined.push_str(s),
                _ => {
                    return Err(Error::invalid_args(
                        "concat",
                        "function needs to be called with arguments of type string",
                    ))
                }
            }
        }
        Ok(Term::String(joined))
    }
}

/// str->list - Split a string into one-character strings
pub struct StrToListBuiltin;

impl Builtin for StrToListBuiltin {
    fn name(&self) -> &str {
        "str->list"
    }

    fn description(&self) -> &str {
        "List of the characters of a string"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        match args {
            [Term::String(s)] => Ok(Term::list(
                s.chars().map(|c| Term::String(c.to_string())).collect(),
            )),
            _ => Err(Error::invalid_args(
                "str->list",
                "function takes 1 string argument",
            )),
        }
    }
}

/// len - Length of a list or string
pub struct LenBuiltin;

impl Builtin for LenBuiltin {
    fn name(&self) -> &str {
        "len"
    }

    fn description(&self) -> &str {
        "Number of elements of a list or characters of a string"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        const REASON: &str = "function takes 1 list or string argument";
        check_arity("len", args, 1, Some(1), REASON)?;
        let len = match &args[0] {
            Term::String(s) => s.chars().count(),
            Term::List(items) => items.len(),
            _ => return Err(Error::invalid_args("len", REASON)),
        };
        Ok(Term::number(len as f64))
    }
}

/// empty? - Whether a list or string has no elements
pub struct IsEmptyBuiltin;

impl Builtin for IsEmptyBuiltin {
    fn name(&self) -> &str {
        "empty?"
    }

    fn description(&self) -> &str {
        "True for the empty list and the empty string"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        const REASON: &str = "function takes 1 list or string argument";
        check_arity("empty?", args, 1, Some(1), REASON)?;
        match &args[0] {
            Term::String(s) => Ok(Term::Boolean(s.is_empty())),
            Term::List(items) => Ok(Term::Boolean(items.is_empty())),
            _ => Err(Error::invalid_args("empty?", REASON)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::test_support::env;

    #[test]
    fn test_concat() {
        let env = env();
        let joined = ConcatBuiltin
            .call(&[Term::string("A"), Term::string("B")], &env)
            .unwrap();
        assert_eq!(joined.to_string(), "\"AB\"");
        assert!(ConcatBuiltin.call(&[], &env).is_err());
        let err = ConcatBuiltin
            .call(&[Term::string("A"), Term::number(1.0)], &env)
            .unwrap_err();
        assert!(err.to_string().contains("of type string"));
    }

    #[test]
    fn test_str_to_list() {
        let env = env();
        let chars = StrToListBuiltin.call(&[Term::string("Hey")], &env).unwrap();
        assert_eq!(chars.to_string(), "(\"H\" \"e\" \"y\")");
        let err = StrToListBuiltin.call(&[Term::number(3.0)], &env).unwrap_err();
        assert_eq!(err.to_string(), "[str->list] function takes 1 string argument");
    }

    #[test]
    fn test_len_and_empty() {
        let env = env();
        assert_eq!(
            LenBuiltin.call(&[Term::string("Hello")], &env).unwrap(),
            Term::number(5.0)
        );
        assert_eq!(
            LenBuiltin.call(&[Term::list(vec![Term::Nil, Term::Nil])], &env).unwrap(),
            Term::number(2.0)
        );
        assert_eq!(
            IsEmptyBuiltin.call(&[Term::string("")], &env).unwrap(),
            Term::Boolean(true)
        );
        assert_eq!(
            IsEmptyBuiltin.call(&[Term::list(vec![Term::number(1.0)])], &env).unwrap(),
            Term::Boolean(false)
        );
        assert!(LenBuiltin.call(&[Term::number(1.0)], &env).is_err());
        assert!(IsEmptyBuiltin.call(&[], &env).is_err());
    }
}
