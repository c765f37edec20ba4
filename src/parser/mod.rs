//! jlisp Parser Module
//!
//! Reads token streams into term trees, folding quote-family prefixes into
//! explicit `(quote x)`, `(quasiquote x)`, `(unquote x)` and
//! `(unquote-splice x)` forms.

mod sexpr_parser;

pub use sexpr_parser::{parse, SExprParser};
