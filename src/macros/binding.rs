//! `define`, `set!` and `defn`

use crate::error::Result;
use crate::macros::{form, macro_error, symbol_name};
use crate::runtime::{expand, Env, Function, Macro, Term};

/// `(define name value)`: binds in the calling scope, returns the value
///
/// Expansion strips `nil` from call sites, so `(define x nil)` arrives as
/// `(define x)` and binds nil.
pub struct DefineMacro;

impl Macro for DefineMacro {
    fn name(&self) -> &str {
        "define"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        const USAGE: &str =
            "macro takes two arguments, the first of which must be a variable name";
        if args.is_empty() || args.len() > 2 {
            let line = args.first().and_then(Term::line).unwrap_or(0);
            return Err(macro_error("define", format!("{} (line = {})", USAGE, line)));
        }
        let name = symbol_name("define", &args[0], USAGE)?;
        let tail = match args.get(1) {
            Some(value) => vec![expand(value, env)?],
            None => Vec::new(),
        };

        let bind = Function::new(move |values, env| {
            let value = values.first().cloned().unwrap_or(Term::Nil);
            env.define(&name, value.clone());
            Ok(value)
        });
        Ok(form(bind, tail))
    }
}

/// `(set! name value)`: assigns the nearest binding, returns nil
pub struct SetBangMacro;

impl Macro for SetBangMacro {
    fn name(&self) -> &str {
        "set!"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() != 2 {
            return Err(macro_error("set!", "macro takes two arguments"));
        }
        let name = symbol_name("set!", &args[0], "macro: first argument must be a variable")?;
        let value = expand(&args[1], env)?;

        let assign = Function::new(move |values, env| {
            env.assign(&name, values.first().cloned().unwrap_or(Term::Nil));
            Ok(Term::Nil)
        });
        Ok(form(assign, vec![value]))
    }
}

/// `(defn name (params) body...)`, sugar for `(define name (lambda ...))`
///
/// The lambda takes the defined name as its id.
pub struct DefnMacro;

impl Macro for DefnMacro {
    fn name(&self) -> &str {
        "defn"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() < 3 {
            return Err(macro_error(
                "defn",
                "macro takes a name, a parameter list and a body",
            ));
        }
        let name = symbol_name("defn", &args[0], "first argument must be a function name")?;
        let line = args[0].line().unwrap_or(0);

        let mut lambda = vec![Term::symbol_at("lambda", line), Term::string(name.as_str())];
        lambda.extend(args[1..].iter().cloned());

        let definition = Term::list(vec![
            Term::symbol_at("define", line),
            args[0].clone(),
            Term::list(lambda),
        ]);
        expand(&definition, env)
    }
}
