//! The quote family: `quote`, `quasiquote`, `unquote`, `unquote-splice`

use crate::error::{Error, Result};
use crate::macros::macro_error;
use crate::runtime::{expand, Env, Macro, Term};

/// `(quote x)` expands to `x` itself, unexpanded
pub struct QuoteMacro;

impl Macro for QuoteMacro {
    fn name(&self) -> &str {
        "quote"
    }

    fn expand(&self, args: &[Term], _env: &Env) -> Result<Term> {
        match args {
            [quoted] => Ok(quoted.clone()),
            _ => Err(macro_error("quote", "takes exactly 1 argument")),
        }
    }
}

/// `` `x ``: expands to the code that builds `x`, with unquoted parts
/// spliced in as expressions
pub struct QuasiquoteMacro;

impl Macro for QuasiquoteMacro {
    fn name(&self) -> &str {
        "quasiquote"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        match args {
            [template] => expand(&quasiquote_template(template)?, env),
            _ => Err(macro_error("quasiquote", "takes exactly 1 argument")),
        }
    }
}

/// `unquote` outside of a quasiquote
pub struct UnquoteMacro;

impl Macro for UnquoteMacro {
    fn name(&self) -> &str {
        "unquote"
    }

    fn expand(&self, _args: &[Term], _env: &Env) -> Result<Term> {
        Err(macro_error(
            "unquote",
            "Unbalanced quotes: 'unquote' found without corresponding ' or `",
        ))
    }
}

/// Reserved; splicing is not supported
pub struct UnquoteSpliceMacro;

impl Macro for UnquoteSpliceMacro {
    fn name(&self) -> &str {
        "unquote-splice"
    }

    fn expand(&self, _args: &[Term], _env: &Env) -> Result<Term> {
        Err(Error::UnquoteSpliceNotImplemented)
    }
}

fn head_symbol(items: &[Term]) -> Option<&str> {
    items.first().and_then(Term::as_symbol)
}

/// List-construction code for a quasiquoted term
///
/// `(unquote e)` becomes `e`, any other list becomes `(list ...)` over its
/// rewritten elements, and atoms are wrapped in `quote`.
pub fn quasiquote_template(term: &Term) -> Result<Term> {
    let items = match term {
        Term::List(items) => items,
        Term::Nil => return Ok(Term::Nil),
        atom => return Ok(Term::list(vec![Term::symbol("quote"), atom.clone()])),
    };

    match head_symbol(items) {
        Some("unquote") => match &items[1..] {
            [inner] => Ok(inner.clone()),
            _ => Err(macro_error("unquote", "takes exactly 1 argument")),
        },
        Some("unquote-splice") => Err(Error::UnquoteSpliceNotImplemented),
        _ => {
            let mut code = Vec::with_capacity(items.len() + 1);
            code.push(Term::symbol("list"));
            for item in items.iter() {
                code.push(quasiquote_template(item)?);
            }
            Ok(Term::list(code))
        }
    }
}

/// Replace every `(quasiquote x)` inside `term` by its construction code
///
/// Macro bodies run through this before they are evaluated, so a body
/// written with backquotes produces the same tree as one spelled out with
/// `list` and `quote`.
pub fn rewrite_quasiquotes(term: &Term) -> Result<Term> {
    let items = match term {
        Term::List(items) => items,
        _ => return Ok(term.clone()),
    };

    if head_symbol(items) == Some("quasiquote") {
        return match &items[1..] {
            [template] => quasiquote_template(&rewrite_quasiquotes(template)?),
            _ => Err(macro_error("quasiquote", "takes exactly 1 argument")),
        };
    }

    let rewritten = items
        .iter()
        .map(rewrite_quasiquotes)
        .collect::<Result<Vec<_>>>()?;
    Ok(Term::list(rewritten))
}
