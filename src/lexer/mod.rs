//! Lexical analysis for jlisp
//!
//! Converts source text into a flat stream of tokens.

mod sexpr_scanner;
mod token;

pub use sexpr_scanner::{tokenize, SExprScanner};
pub use token::{Token, TokenKind};
