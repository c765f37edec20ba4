//! Native function library
//!
//! Every builtin is a small struct implementing [`Builtin`]. The registry
//! installs them into a root scope as ordinary function terms, so user code
//! can rebind or shadow any of them (`(define + -)` is legal).

pub mod arithmetic;
pub mod introspection;
pub mod io;
pub mod lists;
pub mod strings;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::runtime::{Env, Function, Term};

/// Builtin trait - all native functions implement this
pub trait Builtin {
    /// Name the function is bound to
    fn name(&self) -> &str;

    /// Documentation string, returned by `doc`
    fn description(&self) -> &str;

    /// Apply the function to evaluated arguments
    fn call(&self, args: &[Term], env: &Env) -> Result<Term>;
}

/// Builtin registry
pub struct BuiltinRegistry {
    builtins: HashMap<String, Rc<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// Create new registry with the full library
    pub fn new() -> Self {
        let mut registry = BuiltinRegistry::empty();

        arithmetic::register(&mut registry);
        lists::register(&mut registry);
        strings::register(&mut registry);
        io::register(&mut registry);
        introspection::register(&mut registry);

        registry
    }

    /// Create empty registry (for testing)
    pub fn empty() -> Self {
        BuiltinRegistry {
            builtins: HashMap::new(),
        }
    }

    /// Register a builtin
    pub fn register<T: Builtin + 'static>(&mut self, builtin: T) {
        let name = builtin.name().to_string();
        self.builtins.insert(name, Rc::new(builtin));
    }

    /// Get builtin by name
    pub fn get(&self, name: &str) -> Option<Rc<dyn Builtin>> {
        self.builtins.get(name).cloned()
    }

    /// Names of all registered builtins, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Bind every builtin in `env` as a function term
    pub fn install(&self, env: &Env) {
        for (name, builtin) in &self.builtins {
            let target = Rc::clone(builtin);
            let function = Function::new(move |args, env| target.call(args, env))
                .with_id(name.clone())
                .with_description(Some(builtin.description().to_string()));
            env.define(name, Term::function(function));
        }
        trace!(builtins = ?self.names(), "installed builtins");
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject calls whose argument count falls outside `min..=max`
pub(crate) fn check_arity(
    name: &str,
    args: &[Term],
    min: usize,
    max: Option<usize>,
    reason: &str,
) -> Result<()> {
    let too_few = args.len() < min;
    let too_many = max.map(|max| args.len() > max).unwrap_or(false);
    if too_few || too_many {
        return Err(Error::invalid_args(name, reason));
    }
    Ok(())
}

/// Borrow a list argument
pub(crate) fn list_arg<'a>(name: &str, term: &'a Term, reason: &str) -> Result<&'a [Term]> {
    term.as_list().ok_or_else(|| Error::invalid_args(name, reason))
}
