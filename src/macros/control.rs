//! `begin`, `if`, `while` and `break`

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::macros::{form, macro_error};
use crate::runtime::{eval_item, expand, Env, Environment, Function, Macro, Term};

/// Name of the flag a `while` loop keeps in its private scope
pub const BREAK_FLAG: &str = "<< BREAK >>";

/// `(begin form...)`: evaluates every form, returns the last value
pub struct BeginMacro;

impl Macro for BeginMacro {
    fn name(&self) -> &str {
        "begin"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        let body = args
            .iter()
            .map(|arg| expand(arg, env))
            .collect::<Result<Vec<_>>>()?;

        // The evaluator has already evaluated every form in order
        let last = Function::new(|values, _| Ok(values.last().cloned().unwrap_or(Term::Nil)));
        Ok(form(last, body))
    }
}

/// `(if cond then else?)`
///
/// Only the condition is evaluated eagerly. Both branches are expanded up
/// front and at most one of them runs.
pub struct IfMacro;

impl Macro for IfMacro {
    fn name(&self) -> &str {
        "if"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() < 2 || args.len() > 3 {
            return Err(macro_error(
                "if",
                "macro takes 2 or 3 arguments, first of which must evaluate to a boolean",
            ));
        }

        let cond = expand(&args[0], env)?;
        let then = expand(&args[1], env)?;
        let otherwise = match args.get(2) {
            Some(arg) => expand(arg, env)?,
            None => Term::Nil,
        };

        let id = format!("<native if[{}]>", env.context().next_if_number());
        let line = cond.line();
        let branch = Function::new(move |values, env| {
            if values.first().map(Term::is_true).unwrap_or(false) {
                eval_item(&then, env)
            } else if otherwise.is_nil() {
                Ok(Term::Nil)
            } else {
                eval_item(&otherwise, env)
            }
        })
        .with_id(id)
        .at_line(line);

        Ok(form(branch, vec![cond]))
    }
}

/// `(while cond body...)`: loops while `cond` is `true`, returns nil
///
/// Each run of the loop gets a private scope holding its break flag; the
/// flag is checked after every body form.
pub struct WhileMacro;

impl Macro for WhileMacro {
    fn name(&self) -> &str {
        "while"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        let (cond, body) = match args.split_first() {
            Some(split) => split,
            None => {
                return Err(macro_error(
                    "while",
                    "macro takes a condition and zero or more body forms",
                ))
            }
        };

        let cond = expand(cond, env)?;
        let body: Vec<Term> = body
            .iter()
            .map(|stmt| expand(stmt, env))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|stmt| !stmt.is_nil())
            .collect();
        let body = Rc::new(body);

        let run = Function::new(move |_, env| {
            let scope = Environment::child(env);
            scope.define(BREAK_FLAG, Term::Boolean(false));

            while eval_item(&cond, &scope)?.is_true() {
                for stmt in body.iter() {
                    eval_item(stmt, &scope)?;
                    if scope.lookup(BREAK_FLAG).map(|f| f.is_true()).unwrap_or(false) {
                        return Ok(Term::Nil);
                    }
                }
            }
            Ok(Term::Nil)
        })
        .with_id("<native while>");

        Ok(form(run, Vec::new()))
    }
}

/// `(break)`: stops the nearest enclosing `while` after the current form
pub struct BreakMacro;

impl Macro for BreakMacro {
    fn name(&self) -> &str {
        "break"
    }

    fn expand(&self, _args: &[Term], _env: &Env) -> Result<Term> {
        let stop = Function::new(|_, env| match Environment::owner_of(env, BREAK_FLAG) {
            Some(scope) => {
                scope.define(BREAK_FLAG, Term::Boolean(true));
                Ok(Term::Nil)
            }
            None => Err(Error::InvalidBreak),
        });
        Ok(form(stop, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::macros::test_support::{env, eval_str};
    use crate::runtime::Term;

    #[test]
    fn test_begin_returns_last() {
        let env = env();
        assert_eq!(eval_str("(begin (+ 1 1) (- 1 1))", &env).unwrap(), Term::number(0.0));
        assert_eq!(eval_str("(begin)", &env).unwrap(), Term::Nil);
    }

    #[test]
    fn test_if_branches() {
        let env = env();
        assert_eq!(eval_str("(if (= 1 1) 10 20)", &env).unwrap(), Term::number(10.0));
        assert_eq!(eval_str("(if (= 1 0) 10 20)", &env).unwrap(), Term::number(20.0));
        assert_eq!(eval_str("(if (= 1 0) 10)", &env).unwrap(), Term::Nil);
        // Only `true` itself selects the first branch
        assert_eq!(eval_str("(if 1 10 20)", &env).unwrap(), Term::number(20.0));
    }

    #[test]
    fn test_if_arity() {
        let env = env();
        let err = eval_str("(if true)", &env).unwrap_err();
        assert!(matches!(err, Error::Expansion(_)));
        assert!(err.to_string().contains("[if] macro takes 2 or 3 arguments"));
        assert!(eval_str("(if true 1 2 3)", &env).is_err());
    }

    #[test]
    fn test_if_helper_ids_are_numbered() {
        let env = env();
        let first = crate::runtime::expand(
            &crate::parser::parse("(if true 1 2)").unwrap()[0],
            &env,
        )
        .unwrap();
        let head = first.as_list().unwrap()[0].to_string();
        assert!(head.starts_with("#<Function '<native if["));
    }

    #[test]
    fn test_while_and_break() {
        let env = env();
        let result = eval_str(
            "(define i 0)
             (while (< i 10)
                (set! i (+ i 1))
                (if (= i 3) (break)))
             i",
            &env,
        )
        .unwrap();
        assert_eq!(result, Term::number(3.0));
    }

    #[test]
    fn test_while_returns_nil() {
        let env = env();
        assert_eq!(eval_str("(while false 1)", &env).unwrap(), Term::Nil);
    }

    #[test]
    fn test_break_outside_loop() {
        let env = env();
        assert_eq!(eval_str("(break)", &env).unwrap_err(), Error::InvalidBreak);
    }
}
