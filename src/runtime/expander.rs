//! Macro expansion
//!
//! Rewrites macro-call lists into primitive term trees before evaluation.
//! Special forms are macros too: they expand to lists whose head is a
//! synthesized [`Function`](super::Function) and whose tail holds the
//! sub-terms the evaluator should evaluate eagerly.

use tracing::trace;

use super::environment::Env;
use super::value::Term;
use crate::error::Result;

/// An expansion-time tree rewriter, registered by name
pub trait Macro {
    /// Name the macro is called by
    fn name(&self) -> &str;

    /// Rewrite the unevaluated arguments of a call site
    fn expand(&self, args: &[Term], env: &Env) -> Result<Term>;
}

/// Expand every macro call in `term`
///
/// Atoms come back unchanged. Lists drop their `nil` elements first; an
/// empty list becomes `nil`. A list headed by a macro name is replaced by
/// that macro's expansion, any other list has each element expanded.
pub fn expand(term: &Term, env: &Env) -> Result<Term> {
    let items = match term {
        Term::List(items) => items,
        _ => return Ok(term.clone()),
    };

    let _guard = env.context().enter()?;

    let items: Vec<Term> = items.iter().filter(|t| !t.is_nil()).cloned().collect();
    let head = match items.first() {
        Some(head) => head,
        None => return Ok(Term::Nil),
    };

    if let Term::Symbol(sym) = head {
        if let Some(found) = env.find_macro(&sym.name) {
            trace!(macro_name = %sym.name, "expanding macro call");
            return found.expand(&items[1..], env);
        }
    }

    let expanded = items
        .iter()
        .map(|item| expand(item, env))
        .collect::<Result<Vec<_>>>()?;
    Ok(Term::list(expanded))
}

/// Expand each term of a sequence
pub fn expand_all(terms: &[Term], env: &Env) -> Result<Vec<Term>> {
    terms.iter().map(|t| expand(t, env)).collect()
}
