//! The native macro set
//!
//! Every special form is a [`Macro`]. Expansion turns a call site into a
//! list whose head is a synthesized [`Function`] and whose tail holds the
//! sub-terms the evaluator evaluates before calling it. Whatever the macro
//! wants evaluated lazily (branches, loop bodies, closures) is captured by
//! the function instead.

mod binding;
mod control;
mod defmacro;
mod errors;
mod eval;
mod lambda;
mod native;
mod quote;

use std::rc::Rc;

pub use binding::{DefineMacro, DefnMacro, SetBangMacro};
pub use control::{BeginMacro, BreakMacro, IfMacro, WhileMacro, BREAK_FLAG};
pub use defmacro::{AliasMacro, DefMacroMacro, UserMacro};
pub use errors::{ThrowMacro, TryMacro, EXCEPTION_VAR};
pub use eval::{EvalMacro, ReadStringMacro};
pub use lambda::LambdaMacro;
pub use native::NativeMacro;
pub use quote::{
    quasiquote_template, rewrite_quasiquotes, QuasiquoteMacro, QuoteMacro, UnquoteMacro,
    UnquoteSpliceMacro,
};

use crate::error::{Error, Result};
use crate::runtime::{Context, Function, Macro, Term};

/// Register the native macros in a run's macro table
pub fn register_all(context: &Context) {
    let natives: Vec<Rc<dyn Macro>> = vec![
        Rc::new(DefineMacro),
        Rc::new(IfMacro),
        Rc::new(EvalMacro),
        Rc::new(LambdaMacro),
        Rc::new(DefnMacro),
        Rc::new(BeginMacro),
        Rc::new(WhileMacro),
        Rc::new(BreakMacro),
        Rc::new(SetBangMacro),
        Rc::new(QuoteMacro),
        Rc::new(QuasiquoteMacro),
        Rc::new(UnquoteMacro),
        Rc::new(UnquoteSpliceMacro),
        Rc::new(ReadStringMacro),
        Rc::new(DefMacroMacro),
        Rc::new(TryMacro),
        Rc::new(ThrowMacro),
        Rc::new(NativeMacro),
    ];
    for m in natives {
        context.add_macro(m);
    }
}

/// Build a form: `function` applied to the evaluated `tail`
pub(crate) fn form(function: Function, tail: Vec<Term>) -> Term {
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(Term::function(function));
    items.extend(tail);
    Term::list(items)
}

/// Expansion error raised by the named macro
pub(crate) fn macro_error(name: &str, message: impl std::fmt::Display) -> Error {
    Error::expansion(format!("[{}] {}", name, message))
}

/// Symbol name or an expansion error naming the macro
pub(crate) fn symbol_name(name: &str, term: &Term, message: &str) -> Result<String> {
    term.as_symbol()
        .map(str::to_string)
        .ok_or_else(|| macro_error(name, format!("{} (line = {})", message, term.line().unwrap_or(0))))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let env = test_support::env();
        for name in [
            "define", "if", "eval", "lambda", "defn", "begin", "while", "break", "set!",
            "quote", "quasiquote", "unquote", "unquote-splice", "read-string", "defmacro",
            "try", "throw", "native",
        ] {
            assert!(env.is_macro(name), "missing macro {}", name);
        }
    }

    #[test]
    fn test_form_shape() {
        let f = form(Function::new(|_, _| Ok(Term::Nil)), vec![Term::number(1.0)]);
        let items = f.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Term::Function(_)));
    }
}
