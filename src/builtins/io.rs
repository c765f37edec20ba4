//! Console builtins, backed by the run's [`Console`](crate::runtime::Console)

use crate::builtins::{check_arity, Builtin, BuiltinRegistry};
use crate::error::Result;
use crate::runtime::{Env, Term};

/// Register console builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(PrintBuiltin);
    registry.register(ReadBuiltin);
}

/// print - Write each argument on its own line
///
/// With no arguments a single empty line is written.
pub struct PrintBuiltin;

impl Builtin for PrintBuiltin {
    fn name(&self) -> &str {
        "print"
    }

    fn description(&self) -> &str {
        "Print each argument on its own line, strings without quotes"
    }

    fn call(&self, args: &[Term], env: &Env) -> Result<Term> {
        let context = env.context();
        if args.is_empty() {
            context.write_line("")?;
        }
        for arg in args {
            context.write_line(&arg.to_display_string())?;
        }
        Ok(Term::Nil)
    }
}

/// read - Read one line of input, after an optional prompt
pub struct ReadBuiltin;

impl Builtin for ReadBuiltin {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "(read prompt?): one line of input as a string"
    }

    fn call(&self, args: &[Term], env: &Env) -> Result<Term> {
        check_arity("read", args, 0, Some(1), "function takes an optional prompt")?;
        let prompt = args
            .first()
            .map(Term::to_display_string)
            .unwrap_or_default();
        let line = env.context().read_line(&prompt)?;
        Ok(Term::String(line))
    }
}
