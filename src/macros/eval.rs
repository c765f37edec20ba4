//! `eval` and `read-string`

use crate::error::Result;
use crate::macros::{form, macro_error};
use crate::parser::parse;
use crate::runtime::{eval_item, expand, Env, Function, Macro, Term};

/// `(eval x)`: evaluates `x`, then evaluates the result again
pub struct EvalMacro;

impl Macro for EvalMacro {
    fn name(&self) -> &str {
        "eval"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() != 1 {
            return Err(macro_error("eval", "requires 1 argument"));
        }
        let code = expand(&args[0], env)?;

        let again = Function::new(|values, env| match values.first() {
            Some(value) => eval_item(value, env),
            None => Ok(Term::Nil),
        })
        .with_id("<native eval>");
        Ok(form(again, vec![code]))
    }
}

/// `(read-string s)`: reads the first form of `s` and expands it
///
/// A non-string argument is evaluated once more in the hope of producing a
/// string. Read, expansion and evaluation failures come back as a string
/// starting with `Exception parsing expression: ` rather than as errors.
pub struct ReadStringMacro;

impl Macro for ReadStringMacro {
    fn name(&self) -> &str {
        "read-string"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() != 1 {
            return Err(macro_error("read-string", "requires 1 string argument"));
        }
        let source = expand(&args[0], env)?;

        let reader = Function::new(|values, env| {
            let value = values.first().cloned().unwrap_or(Term::Nil);
            let value = match value {
                Term::Nil => return Ok(Term::Nil),
                Term::String(_) => value,
                other => match eval_item(&other, env) {
                    Ok(value) => value,
                    Err(err) => return Ok(parse_failure(err)),
                },
            };
            match value {
                Term::String(text) => Ok(read_first(&text, env).unwrap_or_else(parse_failure)),
                other => Ok(other),
            }
        })
        .with_id("<native read-string>");
        Ok(form(reader, vec![source]))
    }
}

fn read_first(text: &str, env: &Env) -> Result<Term> {
    match parse(text)?.first() {
        Some(term) => expand(term, env),
        None => Ok(Term::Nil),
    }
}

fn parse_failure(err: crate::error::Error) -> Term {
    Term::String(format!("Exception parsing expression: {}", err))
}
