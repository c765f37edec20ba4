//! # jlisp - A small homoiconic Lisp
//!
//! A Lisp-family language built as a pipeline of small pieces:
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → Terms → Expander → Evaluator → Term
//! ```
//!
//! Code and data share one value type, [`Term`]. Special forms such as `if`,
//! `lambda` and `while` are macros: before evaluation they rewrite their call
//! sites into lists headed by native functions, so the evaluator itself only
//! knows how to resolve symbols and apply functions.
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> jlisp::Result<()> {
//! let printed = jlisp::run(r#"
//!     (defn factorial (n)
//!         (if (= 1 n)
//!             1
//!             (* n (factorial (- n 1)))))
//!     (factorial 5)
//! "#)?;
//! assert_eq!(printed, "120");
//! # Ok(())
//! # }
//! ```
//!
//! [`run`] loads the prelude (`not`, `or`, `and`, `<=`, `>`, `>=`, `!=`,
//! `strlen`, `def`, `fn`, `defun`) ahead of the program and returns the
//! printed form of the last top-level form. [`run_without_includes`] skips
//! the prelude.
//!
//! ### Keeping state between fragments
//!
//! ```rust
//! use jlisp::{Interpreter, InterpreterConfig, StdConsole, Term};
//!
//! # fn main() -> jlisp::Result<()> {
//! let interpreter = Interpreter::new(InterpreterConfig::default(), Box::new(StdConsole), true)?;
//! interpreter.eval_source("(define counter 0)")?;
//! interpreter.eval_source("(set! counter (+ counter 1))")?;
//! assert_eq!(interpreter.eval_source("counter")?, Term::number(1.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - **Values**: numbers, strings, symbols, `true`/`false`, `nil`, lists, functions
//! - **Binding**: `(define x 1)`, `(set! x 2)`, `(defn f (a b & rest) ...)`
//! - **Control**: `(if c a b)`, `(begin ...)`, `(while c ...)`, `(break)`
//! - **Errors**: `(try body fallback)`, `(throw value)`, `__exception__`
//! - **Macros**: ``(defmacro unless (c a b) `(if (not ,c) ,a ,b))``
//! - **Escape hatch**: `(native "a + b" a b)` evaluates a host expression
//!
//! ## Error Handling
//!
//! Read and expansion errors abort a run. Evaluation errors can be caught
//! by `try`:
//!
//! ```rust
//! # fn main() -> jlisp::Result<()> {
//! assert_eq!(jlisp::run("(try (+ 1 ff) 20)")?, "20");
//! assert!(jlisp::run("(+ 1 ff)").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (macro registration at `debug`,
//! expansion steps and function applications at `trace`) and never installs
//! a subscriber.

#![allow(clippy::only_used_in_recursion)] // False positive for recursive helper functions

use std::thread;

use tracing::debug;

/// Version of the jlisp interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builtins;
pub mod config;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod native;
pub mod parser;
pub mod prelude;
pub mod runtime;

// Re-export main types
pub use builtins::{Builtin, BuiltinRegistry};
pub use config::InterpreterConfig;
pub use error::{Error, ErrorSeverity, Result};
pub use lexer::{tokenize, SExprScanner, Token, TokenKind};
pub use native::{HostValue, NativeExpr};
pub use parser::{parse, SExprParser};
pub use runtime::{
    eval_item, eval_sequence, expand, expand_all, Console, Context, Env, Environment, Function,
    Macro, StdConsole, Term,
};

/// Type alias for the S-expression scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = SExprScanner;

/// Type alias for the S-expression parser.
/// Converts tokens into term trees.
pub type Parser = SExprParser;

/// One interpreter session: a root scope with the builtins, the native
/// macros and (optionally) the prelude loaded
pub struct Interpreter {
    root: Env,
}

impl Interpreter {
    /// Create an interpreter with its own macro table and console
    ///
    /// The interpreter runs on the caller's thread; a program may use
    /// `config.stack_budget` bytes of that thread's stack before failing with
    /// [`Error::RecursionLimit`].
    pub fn new(
        config: InterpreterConfig,
        console: Box<dyn Console>,
        include_prelude: bool,
    ) -> Result<Self> {
        let context = Context::new(config, console);
        macros::register_all(&context);

        let root = Environment::root(context);
        BuiltinRegistry::new().install(&root);

        let interpreter = Interpreter { root };
        if include_prelude {
            interpreter.eval_program(prelude::LISP_MACROS)?;
            interpreter.eval_program(prelude::LISP_FUNCTIONS)?;
        }
        Ok(interpreter)
    }

    /// Root scope of the session
    pub fn root(&self) -> &Env {
        &self.root
    }

    /// Parse, expand and evaluate `text`, returning the last value
    /// (nil when the text has no forms left after expansion)
    pub fn eval_source(&self, text: &str) -> Result<Term> {
        Ok(self.eval_program(text)?.unwrap_or(Term::Nil))
    }

    /// Every form is expanded before the first one is evaluated; forms that
    /// expand to nil (macro definitions) are dropped.
    fn eval_program(&self, text: &str) -> Result<Option<Term>> {
        let _anchor = self.root.context().anchor_stack();
        let forms = parser::parse(text)?;
        let program: Vec<Term> = expand_all(&forms, &self.root)?
            .into_iter()
            .filter(|form| !form.is_nil())
            .collect();
        debug!(forms = forms.len(), expanded = program.len(), "evaluating program");

        if program.is_empty() {
            return Ok(None);
        }
        eval_sequence(&program, &self.root).map(Some)
    }
}

/// Settings for [`run_with`]
pub struct RunOptions {
    /// Limits for the run
    pub config: InterpreterConfig,
    /// Load the prelude ahead of the program
    pub include_prelude: bool,
    /// Console used by `print` and `read`
    pub console: Box<dyn Console + Send>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            config: InterpreterConfig::from_env(),
            include_prelude: true,
            console: Box::new(StdConsole),
        }
    }
}

/// Run a program with the prelude loaded, returning the printed form of its
/// last top-level form ("" when there is none)
pub fn run(text: &str) -> Result<String> {
    run_with(text, RunOptions::default())
}

/// Run a program without the prelude
pub fn run_without_includes(text: &str) -> Result<String> {
    run_with(
        text,
        RunOptions {
            include_prelude: false,
            ..RunOptions::default()
        },
    )
}

/// Run a program on a worker thread with `options.config.stack_size` bytes
/// of stack
pub fn run_with(text: &str, options: RunOptions) -> Result<String> {
    let text = text.to_string();
    debug!(
        bytes = text.len(),
        prelude = options.include_prelude,
        "starting run"
    );

    let handle = thread::Builder::new()
        .name("jlisp-run".to_string())
        .stack_size(options.config.stack_size)
        .spawn(move || -> Result<String> {
            let RunOptions {
                config,
                include_prelude,
                console,
            } = options;
            let interpreter =
                Interpreter::new(config.for_worker_thread(), console, include_prelude)?;
            let last = interpreter.eval_program(&text)?;
            Ok(last.map(|term| term.to_string()).unwrap_or_default())
        })?;

    handle
        .join()
        .map_err(|_| Error::runtime("interpreter thread panicked"))?
}
