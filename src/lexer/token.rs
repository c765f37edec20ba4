use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// All possible token types in jlisp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,

    // Literals
    /// Numeric literal; malformed digit runs become NaN
    Number(f64),
    /// String literal with escapes resolved
    String(String),
    /// `true` or `false`
    Boolean(bool),
    /// `nil`
    Nil,

    /// Any other run of non-delimiter characters
    Symbol(String),

    // Quote family
    /// `'`
    Quote,
    /// `` ` ``
    Backquote,
    /// `,`
    Unquote,
    /// `,@`
    UnquoteSplice,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Boolean(b) => write!(f, "{}", b),
            TokenKind::Nil => write!(f, "nil"),
            TokenKind::Symbol(s) => write!(f, "{}", s),
            TokenKind::Quote => write!(f, "'"),
            TokenKind::Backquote => write!(f, "`"),
            TokenKind::Unquote => write!(f, ","),
            TokenKind::UnquoteSplice => write!(f, ",@"),
        }
    }
}
