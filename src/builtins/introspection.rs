use crate::builtins::{check_arity, Builtin, BuiltinRegistry};
use crate::error::Result;
use crate::runtime::{Env, Term};

/// Register introspection builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(DocBuiltin);
}

/// doc - Documentation string of a function
pub struct DocBuiltin;

impl Builtin for DocBuiltin {
    fn name(&self) -> &str {
        "doc"
    }

    fn description(&self) -> &str {
        "Documentation string of a function, nil when it has none"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        check_arity("doc", args, 1, Some(1), "function takes 1 argument")?;
        Ok(match &args[0] {
            Term::Function(f) => f
                .description
                .clone()
                .map(Term::String)
                .unwrap_or(Term::Nil),
            _ => Term::Nil,
        })
    }
}
