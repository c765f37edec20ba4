use crate::error::{Error, Result};

/// Token of a `native` expression
#[derive(Debug, Clone, PartialEq)]
pub enum NativeToken {
    /// Numeric literal
    Number(f64),
    /// String literal, either quote style
    Str(String),
    /// Identifier or keyword
    Ident(String),
    /// Operator or delimiter
    Punct(&'static str),
}

/// Longest operators first so `===` wins over `==` and `=`
const PUNCTUATION: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "<", ">", "+", "-", "*", "/", "%", "!",
    "?", ":", "(", ")", "[", "]", ".", ",",
];

/// Scanner for the expression text given to `native`
pub struct NativeScanner {
    source: Vec<char>,
    current: usize,
}

impl NativeScanner {
    /// Creates a scanner over an expression text
    pub fn new(source: &str) -> Self {
        NativeScanner {
            source: source.chars().collect(),
            current: 0,
        }
    }

    /// Scans all tokens
    pub fn scan_tokens(&mut self) -> Result<Vec<NativeToken>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let c = self.peek();
            if c.is_whitespace() || c == ';' {
                self.current += 1;
            } else if c.is_ascii_digit() || (c == '.' && self.peek_next().is_ascii_digit()) {
                tokens.push(self.scan_number());
            } else if c == '"' || c == '\'' {
                tokens.push(self.scan_string(c)?);
            } else if c.is_alphabetic() || c == '_' || c == '$' {
                tokens.push(self.scan_identifier());
            } else {
                tokens.push(self.scan_punct()?);
            }
        }

        Ok(tokens)
    }

    fn scan_number(&mut self) -> NativeToken {
        let start = self.current;
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.current += 1;
            while self.peek().is_ascii_digit() {
                self.current += 1;
            }
        }
        let text: String = self.source[start..self.current].iter().collect();
        NativeToken::Number(text.parse().unwrap_or(f64::NAN))
    }

    fn scan_string(&mut self, quote: char) -> Result<NativeToken> {
        self.current += 1; // Opening quote
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(Error::Native("unterminated string literal".to_string()));
            }
            let c = self.source[self.current];
            self.current += 1;
            if c == quote {
                break;
            }
            if c == '\\' && !self.is_at_end() {
                let escaped = self.source[self.current];
                self.current += 1;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            } else {
                value.push(c);
            }
        }

        Ok(NativeToken::Str(value))
    }

    fn scan_identifier(&mut self) -> NativeToken {
        let start = self.current;
        while self.peek().is_alphanumeric() || self.peek() == '_' || self.peek() == '$' {
            self.current += 1;
        }
        NativeToken::Ident(self.source[start..self.current].iter().collect())
    }

    fn scan_punct(&mut self) -> Result<NativeToken> {
        for punct in PUNCTUATION {
            let len = punct.chars().count();
            if self.current + len <= self.source.len()
                && self.source[self.current..self.current + len]
                    .iter()
                    .copied()
                    .eq(punct.chars())
            {
                self.current += len;
                return Ok(NativeToken::Punct(*punct));
            }
        }
        Err(Error::Native(format!(
            "unexpected character '{}'",
            self.peek()
        )))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_ternary() {
        let tokens = NativeScanner::new("s? s.length: 0").scan_tokens().unwrap();
        assert_eq!(
            tokens,
            vec![
                NativeToken::Ident("s".into()),
                NativeToken::Punct("?"),
                NativeToken::Ident("s".into()),
                NativeToken::Punct("."),
                NativeToken::Ident("length".into()),
                NativeToken::Punct(":"),
                NativeToken::Number(0.0),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let tokens = NativeScanner::new("a !== b").scan_tokens().unwrap();
        assert_eq!(tokens[1], NativeToken::Punct("!=="));
    }

    #[test]
    fn test_strings() {
        let tokens = NativeScanner::new(r#"'it\'s' + "x""#).scan_tokens().unwrap();
        assert_eq!(tokens[0], NativeToken::Str("it's".into()));
        assert_eq!(tokens[2], NativeToken::Str("x".into()));
    }

    #[test]
    fn test_unknown_character() {
        assert!(NativeScanner::new("a # b").scan_tokens().is_err());
    }
}
