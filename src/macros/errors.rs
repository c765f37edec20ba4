//! `try` and `throw`

use crate::error::{Error, Result};
use crate::macros::{form, macro_error};
use crate::runtime::{eval_item, expand, Env, Function, Macro, Term};

/// Variable holding the caught error message inside a `try` fallback
pub const EXCEPTION_VAR: &str = "__exception__";

/// `(try body fallback?)`
///
/// Evaluates `body`; if that raises a recoverable error, binds its message to
/// `__exception__` and evaluates `fallback` instead (nil when absent).
/// Read and expansion errors are not intercepted.
pub struct TryMacro;

impl Macro for TryMacro {
    fn name(&self) -> &str {
        "try"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.is_empty() || args.len() > 2 {
            return Err(macro_error("try", "macro takes 1 or 2 arguments"));
        }
        let body = expand(&args[0], env)?;
        let fallback = match args.get(1) {
            Some(arg) => Some(expand(arg, env)?),
            None => None,
        };

        let guarded = Function::new(move |_, env| match eval_item(&body, env) {
            Err(err) if err.is_recoverable() => {
                env.define(EXCEPTION_VAR, Term::String(err.to_string()));
                match &fallback {
                    Some(fallback) => eval_item(fallback, env),
                    None => Ok(Term::Nil),
                }
            }
            outcome => outcome,
        })
        .with_id("<native try>");
        Ok(form(guarded, Vec::new()))
    }
}

/// `(throw value)`: raises an error whose message is the printed `value`
pub struct ThrowMacro;

impl Macro for ThrowMacro {
    fn name(&self) -> &str {
        "throw"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() != 1 {
            return Err(macro_error("throw", "macro takes 1 arguments"));
        }
        let message = expand(&args[0], env)?;

        let raise = Function::new(|values, _| {
            let thrown = values.first().cloned().unwrap_or(Term::Nil);
            Err(Error::Thrown(thrown.to_string()))
        })
        .with_id("<native throw>");
        Ok(form(raise, vec![message]))
    }
}
