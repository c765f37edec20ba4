//! Per-run state shared by every scope of one program

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use super::expander::Macro;
use super::io::Console;
use crate::config::InterpreterConfig;
use crate::error::{Error, Result};

/// State reachable from every [`Environment`](super::Environment) of a run:
/// the global macro table, the console, limits and id counters.
///
/// Created once per run and shared by reference; macro registration is
/// immediate and global for the rest of the run.
pub struct Context {
    macros: RefCell<HashMap<String, Rc<dyn Macro>>>,
    console: RefCell<Box<dyn Console>>,
    config: InterpreterConfig,
    depth: Cell<usize>,
    stack_base: Cell<Option<usize>>,
    lambda_count: Cell<usize>,
    if_count: Cell<usize>,
}

impl Context {
    /// Creates a context with an empty macro table
    pub fn new(config: InterpreterConfig, console: Box<dyn Console>) -> Rc<Self> {
        Rc::new(Context {
            macros: RefCell::new(HashMap::new()),
            console: RefCell::new(console),
            config,
            depth: Cell::new(0),
            stack_base: Cell::new(None),
            lambda_count: Cell::new(0),
            if_count: Cell::new(0),
        })
    }

    /// Limits for this run
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Registers (or replaces) a macro under its own name
    pub fn add_macro(&self, m: Rc<dyn Macro>) {
        let name = m.name().to_string();
        self.macros.borrow_mut().insert(name, m);
    }

    /// Looks up a macro by name
    pub fn find_macro(&self, name: &str) -> Option<Rc<dyn Macro>> {
        self.macros.borrow().get(name).cloned()
    }

    /// Checks if a macro with this name is registered
    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.borrow().contains_key(name)
    }

    /// Names of all registered macros, sorted
    pub fn macro_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.macros.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Enter one level of expansion or evaluation
    ///
    /// Fails once the nesting passes `max_depth`, or once the stack below the
    /// anchor set by [`Context::anchor_stack`] passes `stack_budget`. The
    /// returned guard leaves the level again when dropped.
    pub fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth() + 1;
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        let used = self.stack_used();
        if used > self.config.stack_budget {
            warn!(depth, used, budget = self.config.stack_budget, "stack budget exhausted");
            return Err(Error::RecursionLimit { limit: depth - 1 });
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }

    /// Mark the current stack position as the base the stack budget is
    /// measured from
    ///
    /// Only the outermost anchor counts; nested ones leave it in place. The
    /// base is cleared when the outermost guard drops.
    pub fn anchor_stack(&self) -> StackAnchor<'_> {
        let outermost = self.stack_base.get().is_none();
        if outermost {
            self.stack_base.set(Some(stack_position()));
        }
        StackAnchor {
            base: &self.stack_base,
            outermost,
        }
    }

    /// Bytes of stack in use below the anchor, 0 when unanchored
    pub fn stack_used(&self) -> usize {
        self.stack_base
            .get()
            .map_or(0, |base| base.abs_diff(stack_position()))
    }

    /// Current nesting level
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Next number for an anonymous lambda id
    pub fn next_lambda_number(&self) -> usize {
        let n = self.lambda_count.get();
        self.lambda_count.set(n + 1);
        n
    }

    /// Next number for an `if` helper id
    pub fn next_if_number(&self) -> usize {
        let n = self.if_count.get();
        self.if_count.set(n + 1);
        n
    }

    /// Write one line to the console
    pub fn write_line(&self, text: &str) -> Result<()> {
        self.console.borrow_mut().write_line(text)
    }

    /// Read one line from the console
    pub fn read_line(&self, prompt: &str) -> Result<String> {
        self.console.borrow_mut().read_line(prompt)
    }
}

#[inline(never)]
fn stack_position() -> usize {
    let marker = 0u8;
    std::ptr::addr_of!(marker) as usize
}

/// Guard returned by [`Context::anchor_stack`]
pub struct StackAnchor<'a> {
    base: &'a Cell<Option<usize>>,
    outermost: bool,
}

impl Drop for StackAnchor<'_> {
    fn drop(&mut self) {
        if self.outermost {
            self.base.set(None);
        }
    }
}

/// Scope guard returned by [`Context::enter`]
pub struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
