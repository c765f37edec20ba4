use tracing::warn;

use crate::error::Result;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::runtime::Term;

/// Intermediate tree of the first pass: quote markers are kept as separate
/// nodes until [`fold_quotes`] pairs them with the unit that follows.
#[derive(Debug)]
enum Node {
    Atom(Term),
    List(Vec<Node>),
    Marker(&'static str, usize),
}

/// S-expression parser for jlisp
pub struct SExprParser {
    tokens: Vec<Token>,
    current: usize,
}

impl SExprParser {
    /// Creates a new S-expression parser
    pub fn new(tokens: Vec<Token>) -> Self {
        SExprParser { tokens, current: 0 }
    }

    /// Parses the tokens into a sequence of top-level terms
    pub fn parse(&mut self) -> Result<Vec<Term>> {
        let mut nodes = Vec::new();

        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::CloseParen => {
                    warn!(line = token.line, "skipping unmatched ')'");
                }
                TokenKind::OpenParen => nodes.push(self.parse_list(token.line)),
                _ => nodes.push(Self::leaf(&token)),
            }
        }

        Ok(fold_quotes(nodes))
    }

    /// Parse list elements up to the matching `)`
    ///
    /// Running out of tokens first yields whatever was collected.
    fn parse_list(&mut self, open_line: usize) -> Node {
        let mut items = Vec::new();

        loop {
            let token = match self.advance() {
                Some(token) => token,
                None => {
                    warn!(line = open_line, "list never closed, keeping what was read");
                    break;
                }
            };

            match token.kind {
                TokenKind::CloseParen => break,
                TokenKind::OpenParen => items.push(self.parse_list(token.line)),
                _ => items.push(Self::leaf(&token)),
            }
        }

        Node::List(items)
    }

    fn leaf(token: &Token) -> Node {
        match &token.kind {
            TokenKind::Number(n) => Node::Atom(Term::number(*n)),
            TokenKind::String(s) => Node::Atom(Term::string(s.clone())),
            TokenKind::Symbol(name) => Node::Atom(Term::symbol_at(name.clone(), token.line)),
            TokenKind::Boolean(b) => Node::Atom(Term::Boolean(*b)),
            TokenKind::Nil => Node::Atom(Term::Nil),
            TokenKind::Quote => Node::Marker("quote", token.line),
            TokenKind::Backquote => Node::Marker("quasiquote", token.line),
            TokenKind::Unquote => Node::Marker("unquote", token.line),
            TokenKind::UnquoteSplice => Node::Marker("unquote-splice", token.line),
            // Parentheses are consumed by parse/parse_list
            TokenKind::OpenParen | TokenKind::CloseParen => Node::List(Vec::new()),
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }
}

/// Pair every quote marker with the unit after it, bottom-up
///
/// Children are folded before their parent, so `''a` nests as
/// `(quote (quote a))`. A marker with nothing after it becomes a one-element
/// list that the quote macros reject later.
fn fold_quotes(nodes: Vec<Node>) -> Vec<Term> {
    let mut folded: Vec<Term> = Vec::with_capacity(nodes.len());

    for node in nodes.into_iter().rev() {
        match node {
            Node::Atom(term) => folded.push(term),
            Node::List(children) => folded.push(Term::list(fold_quotes(children))),
            Node::Marker(name, line) => {
                let marker = Term::symbol_at(name, line);
                let wrapped = match folded.pop() {
                    Some(unit) => vec![marker, unit],
                    None => vec![marker],
                };
                folded.push(Term::list(wrapped));
            }
        }
    }

    folded.reverse();
    folded
}

/// Tokenize and parse a whole program text
pub fn parse(source: &str) -> Result<Vec<Term>> {
    let tokens = tokenize(source)?;
    SExprParser::new(tokens).parse()
}
