use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::context::Context;
use super::expander::Macro;
use super::value::Term;

/// Shared handle to a scope
///
/// Scopes are mutated through shared handles: a closure and its siblings see
/// each other's `define`/`set!` on the scope they captured.
pub type Env = Rc<Environment>;

/// One node of a parent-linked chain of lexical scopes
pub struct Environment {
    /// Variables defined in this scope
    bindings: RefCell<HashMap<String, Term>>,
    /// Enclosing scope (None for the root)
    parent: Option<Env>,
    /// Run-wide state, including the global macro table
    context: Rc<Context>,
}

impl Environment {
    /// Creates an empty root scope
    pub fn root(context: Rc<Context>) -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            context,
        })
    }

    /// Creates a new scope nested in `parent`
    pub fn child(parent: &Env) -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
            context: Rc::clone(&parent.context),
        })
    }

    /// Run-wide state
    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    /// Enclosing scope
    pub fn parent(&self) -> Option<&Env> {
        self.parent.as_ref()
    }

    /// Defines (or overwrites) a variable in this scope
    pub fn define(&self, name: &str, value: Term) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// Assigns to the nearest scope that owns `name`
    ///
    /// Defines locally when this scope owns the name, when this is the root, or
    /// when no enclosing scope has it.
    pub fn assign(&self, name: &str, value: Term) {
        match &self.parent {
            Some(parent) if !self.owns(name) && parent.lookup(name).is_some() => {
                parent.assign(name, value)
            }
            _ => self.define(name, value),
        }
    }

    /// Gets the value of a variable, walking up to the root
    pub fn lookup(&self, name: &str) -> Option<Term> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Checks if this scope itself binds `name`
    pub fn owns(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// The nearest scope, starting at `env`, that binds `name`
    pub fn owner_of(env: &Env, name: &str) -> Option<Env> {
        let mut current = Some(env);
        while let Some(scope) = current {
            if scope.owns(name) {
                return Some(Rc::clone(scope));
            }
            current = scope.parent.as_ref();
        }
        None
    }

    /// Names bound directly in this scope, sorted
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Looks up a macro in the run-wide table
    pub fn find_macro(&self, name: &str) -> Option<Rc<dyn Macro>> {
        self.context.find_macro(name)
    }

    /// Checks if `name` is a registered macro
    pub fn is_macro(&self, name: &str) -> bool {
        self.context.is_macro(name)
    }

    /// Registers a macro in the run-wide table, whatever scope it comes from
    pub fn add_macro(&self, m: Rc<dyn Macro>) {
        self.context.add_macro(m)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.local_names())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
