//! Runtime for jlisp programs: terms, scopes, expansion and evaluation

mod context;
mod environment;
mod expander;
pub mod io;
mod lisp_evaluator;
mod value;

pub use context::{Context, DepthGuard, StackAnchor};
pub use environment::{Env, Environment};
pub use expander::{expand, expand_all, Macro};
pub use io::{Console, StdConsole};
pub use lisp_evaluator::{eval_item, eval_sequence};
pub use value::{format_number, Function, NativeCall, Symbol, Term};
