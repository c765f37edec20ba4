use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for jlisp S-expression source
pub struct SExprScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Line and column where the current token started
    start_line: usize,
    start_column: usize,
}

impl SExprScanner {
    /// Creates a new S-expression scanner from source code
    pub fn new(source: &str) -> Self {
        SExprScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// There is no end-of-file token: `(= 1 1)` yields exactly five tokens.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' => {}
            '\n' => self.newline(),

            ';' => self.skip_line_comment(),

            '(' => self.add_token(TokenKind::OpenParen),
            ')' => self.add_token(TokenKind::CloseParen),

            '\'' => self.add_token(TokenKind::Quote),
            '`' => self.add_token(TokenKind::Backquote),
            ',' => {
                if self.match_char('@') {
                    self.add_token(TokenKind::UnquoteSplice);
                } else {
                    self.add_token(TokenKind::Unquote);
                }
            }

            '"' => self.scan_string()?,

            c if c.is_ascii_digit() || c == '.' => self.scan_number(),

            _ => self.scan_symbol(),
        }

        Ok(())
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn scan_string(&mut self) -> Result<()> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            match c {
                '\\' if !self.is_at_end() => {
                    let escaped = self.advance();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            if other == '\n' {
                                self.newline();
                            }
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                '\n' => {
                    self.newline();
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        if self.is_at_end() {
            return Err(Error::Read {
                line: self.start_line,
                message: "Unmatched quote".to_string(),
            });
        }

        self.advance(); // Closing "

        self.add_token(TokenKind::String(value));
        Ok(())
    }

    /// Digits and dots, greedily. Whatever does not parse becomes NaN.
    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == '.' {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        self.add_token(TokenKind::Number(value));
    }

    fn scan_symbol(&mut self) {
        while !self.is_at_end() && !is_delimiter(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        let token_kind = match text.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            "nil" => TokenKind::Nil,
            _ => TokenKind::Symbol(text),
        };

        self.add_token(token_kind);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens
            .push(Token::new(kind, lexeme, self.start_line, self.start_column));
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '(' | ')')
}

/// Tokenize a whole source text
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    SExprScanner::new(source).scan_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_sexpr() {
        let tokens = tokenize("(= 1 1)").unwrap();

        assert_eq!(tokens.len(), 5); // no end-of-file token
        assert_eq!(tokens[0].kind, TokenKind::OpenParen);
        assert_eq!(tokens[1].kind, TokenKind::Symbol("=".to_string()));
        assert_eq!(tokens[2].kind, TokenKind::Number(1.0));
        assert_eq!(tokens[3].lexeme, "1");
        assert_eq!(tokens[4].kind, TokenKind::CloseParen);
    }

    #[test]
    fn test_quote_markers_are_separate_tokens() {
        assert_eq!(tokenize("'(= 1 1)").unwrap().len(), 6);
        assert_eq!(tokenize("(= '1 1)").unwrap().len(), 6);
        assert_eq!(tokenize("(= `1 1)").unwrap().len(), 6);
        assert_eq!(tokenize("(= `1 ,1)").unwrap().len(), 7);
        assert_eq!(tokenize("(= `1 ,@1)").unwrap().len(), 7);
        assert_eq!(
            kinds("`,@x"),
            vec![
                TokenKind::Backquote,
                TokenKind::UnquoteSplice,
                TokenKind::Symbol("x".into())
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("true false nil str->list empty?"),
            vec![
                TokenKind::Boolean(true),
                TokenKind::Boolean(false),
                TokenKind::Nil,
                TokenKind::Symbol("str->list".into()),
                TokenKind::Symbol("empty?".into()),
            ]
        );
    }

    #[test]
    fn test_numbers_are_permissive() {
        assert_eq!(kinds("3.45"), vec![TokenKind::Number(3.45)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5)]);
        match &kinds("1.2.3")[0] {
            TokenKind::Number(n) => assert!(n.is_nan()),
            other => panic!("expected number, got {:?}", other),
        }
        // A digit run ends at the first non-digit, non-dot character
        assert_eq!(
            kinds("12abc"),
            vec![TokenKind::Number(12.0), TokenKind::Symbol("abc".into())]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#""a b" "say \"hi\"\n""#),
            vec![
                TokenKind::String("a b".into()),
                TokenKind::String("say \"hi\"\n".into())
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("(print \"hello)").unwrap_err();
        assert!(err.to_string().contains("Unmatched quote"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_comment_and_lines() {
        let tokens = tokenize("; This is a comment\n(+ 1 2)\r\n  foo").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::OpenParen);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].kind, TokenKind::Symbol("+".into()));
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Symbol("foo".into()));
        assert_eq!(last.line, 3);
        assert_eq!(last.column, 3);
    }
}
