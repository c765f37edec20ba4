//! `defmacro`: user-defined macros and macro aliases

use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::macros::{macro_error, rewrite_quasiquotes, symbol_name};
use crate::runtime::{eval_item, expand, Env, Environment, Macro, Term};

/// `(defmacro name (params) body)` or `(defmacro alias existing)`
///
/// Registration happens during expansion and is global for the rest of the
/// run; the form itself expands to nil.
pub struct DefMacroMacro;

impl Macro for DefMacroMacro {
    fn name(&self) -> &str {
        "defmacro"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        match args {
            [alias, existing] => define_alias(alias, existing, env),
            [name, params, body] => define_macro(name, params, body, env),
            _ => Err(macro_error("defmacro", "expects 3 arguments")),
        }
    }
}

fn define_alias(alias: &Term, existing: &Term, env: &Env) -> Result<Term> {
    let alias = symbol_name(
        "defmacro",
        alias,
        "with two arguments, the first of which must be a variable name",
    )?;
    let target_name = symbol_name(
        "defmacro",
        existing,
        "with two arguments, the second of which must be a macro name",
    )?;
    let target = env
        .find_macro(&target_name)
        .ok_or_else(|| macro_error("defmacro", format!("macro not found ({})", target_name)))?;

    debug!(alias = %alias, target = %target_name, "registering macro alias");
    env.add_macro(Rc::new(AliasMacro {
        name: alias,
        target,
    }));
    Ok(Term::Nil)
}

fn define_macro(name: &Term, params: &Term, body: &Term, env: &Env) -> Result<Term> {
    let name = symbol_name("defmacro", name, "first argument must be a variable")?;
    let line = params.line().unwrap_or(0);
    let params = params.as_list().ok_or_else(|| {
        macro_error(
            "defmacro",
            format!("second argument must be a list of symbols (line = {})", line),
        )
    })?;

    let mut names = Vec::with_capacity(params.len());
    for param in params {
        let param = symbol_name(
            "defmacro",
            param,
            "second argument must be a list of symbols",
        )?;
        names.push(param);
    }
    let (params, rest) = match names.iter().position(|n| n == "&") {
        None => (names, None),
        Some(at) if at + 2 == names.len() => {
            let rest = names.pop();
            names.truncate(at);
            (names, rest)
        }
        Some(_) => {
            return Err(macro_error(
                "defmacro",
                "'&' must be followed by exactly one parameter name",
            ))
        }
    };

    if body.as_list().is_none() {
        return Err(macro_error(
            "defmacro",
            format!("body must be a list (line = {})", line),
        ));
    }

    debug!(macro_name = %name, params = params.len(), "registering macro");
    env.add_macro(Rc::new(UserMacro {
        name,
        params,
        rest,
        body: rewrite_quasiquotes(body)?,
    }));
    Ok(Term::Nil)
}

/// A second name for an existing macro
pub struct AliasMacro {
    name: String,
    target: Rc<dyn Macro>,
}

impl Macro for AliasMacro {
    fn name(&self) -> &str {
        &self.name
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        self.target.expand(args, env)
    }
}

/// A macro whose expansion is computed by evaluating a body
///
/// Each parameter is bound, in a scope nested in the call site's, to the
/// quoted call-site argument; a `&` rest parameter gets the list of the
/// remaining quoted arguments. The body's value is then expanded twice: once
/// to strip the quotes it carries, once to expand the code it produced.
pub struct UserMacro {
    name: String,
    params: Vec<String>,
    rest: Option<String>,
    body: Term,
}

fn quoted(term: Term) -> Term {
    Term::list(vec![Term::symbol("quote"), term])
}

impl Macro for UserMacro {
    fn name(&self) -> &str {
        &self.name
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        debug!(macro_name = %self.name, args = args.len(), "expanding user macro");

        let scope = Environment::child(env);
        for (param, arg) in self.params.iter().zip(args) {
            scope.define(param, quoted(arg.clone()));
        }
        if let Some(rest) = &self.rest {
            let remaining = args.iter().skip(self.params.len()).cloned().map(quoted).collect();
            scope.define(rest, Term::list(remaining));
        }

        let produced = eval_item(&self.body, &scope)?;
        let unquoted = expand(&produced, env)?;
        expand(&unquoted, env)
    }
}
