//! Tree-walking evaluation of expanded terms

use tracing::trace;

use super::environment::Env;
use super::value::{Symbol, Term};
use crate::error::{Error, Result};

/// Evaluate a term in an environment
///
/// - Numbers, strings, booleans, nil and functions evaluate to themselves.
/// - Symbols resolve through the scope chain; a binding to another symbol is
///   resolved in turn. An unbound symbol, or one bound to nil, is an error.
/// - A list headed by a macro name is returned untouched: it was not expanded
///   (typically it came out of a quoted context) and is data here.
/// - Any other list evaluates all of its elements left to right and applies
///   the head, which must be a function, to the rest.
pub fn eval_item(term: &Term, env: &Env) -> Result<Term> {
    match term {
        Term::Symbol(sym) => resolve_symbol(sym, env),
        Term::List(items) => eval_list(term, items, env),
        _ => Ok(term.clone()),
    }
}

fn resolve_symbol(sym: &Symbol, env: &Env) -> Result<Term> {
    let _guard = env.context().enter()?;

    match env.lookup(&sym.name) {
        None | Some(Term::Nil) => Err(Error::SymbolNotFound {
            name: sym.name.clone(),
            line: sym.line.unwrap_or(0),
        }),
        Some(Term::Symbol(next)) => resolve_symbol(&next, env),
        Some(value) => Ok(value),
    }
}

fn eval_list(term: &Term, items: &[Term], env: &Env) -> Result<Term> {
    let head = match items.first() {
        Some(head) => head,
        None => return Ok(Term::Nil),
    };

    if let Term::Symbol(sym) = head {
        if env.is_macro(&sym.name) {
            return Ok(term.clone());
        }
    }

    let _guard = env.context().enter()?;

    let mut values = items
        .iter()
        .map(|item| eval_item(item, env))
        .collect::<Result<Vec<_>>>()?;
    let func = values.remove(0);

    match func {
        Term::Function(f) => {
            trace!(function = f.label(), args = values.len(), "applying function");
            f.call(&values, env)
        }
        other => Err(Error::NotAFunction {
            line: head.line().or_else(|| other.line()).unwrap_or(0),
            found: other.type_name().to_string(),
        }),
    }
}

/// Evaluate each term in order, returning the last value (nil when empty)
pub fn eval_sequence(terms: &[Term], env: &Env) -> Result<Term> {
    let mut result = Term::Nil;
    for term in terms {
        result = eval_item(term, env)?;
    }
    Ok(result)
}
