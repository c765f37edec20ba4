//! Error types for the jlisp interpreter

use thiserror::Error;

/// jlisp interpreter errors
///
/// Errors carry plain text only, never [`Term`](crate::Term) values, so a
/// program run on a worker thread can hand its failure back to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Read errors
    /// Malformed token stream
    ///
    /// **Triggered by:** A string literal that never finds its closing quote
    /// **Example:** `(print "hello)`
    #[error("Read error at line {line}: {message}")]
    Read {
        /// Line where the offending token started
        line: usize,
        /// Error description
        message: String,
    },

    // Expansion errors
    /// A macro was called with the wrong number or kind of arguments
    ///
    /// **Triggered by:** `(if x)`, `(lambda ("a" b) ...)`, `(defmacro 1 (x) x)`
    #[error("Macro expansion error: {0}")]
    Expansion(String),

    /// `unquote-splice` is reserved but not supported
    #[error("[unquote-splice] is not implemented")]
    UnquoteSpliceNotImplemented,

    // Evaluation errors
    /// Reference to an unbound symbol (or one bound to nil)
    ///
    /// **Triggered by:** Using a variable before defining it
    /// **Example:** `(+ 1 ff)`
    #[error("Interpreter error: symbol '{name}' not found (line {line})")]
    SymbolNotFound {
        /// Symbol name
        name: String,
        /// Source line, 0 when unknown
        line: usize,
    },

    /// The head of an evaluated list was not a function
    ///
    /// **Example:** `(car (2 3 4 5))`
    #[error("Interpreter error in line {line}. Item is not a function ({found})")]
    NotAFunction {
        /// Source line, 0 when unknown
        line: usize,
        /// Kind of the value found in head position
        found: String,
    },

    /// A native function rejected its arguments
    #[error("[{function}] {reason}")]
    InvalidArguments {
        /// Function name
        function: String,
        /// Why the arguments were rejected
        reason: String,
    },

    /// Raised by the `throw` form; the text is the printed thrown value
    #[error("{0}")]
    Thrown(String),

    /// Failure inside the `native` expression evaluator
    #[error("[native] {0}")]
    Native(String),

    /// `break` evaluated outside of any `while` loop
    #[error("[break] used outside of a while loop")]
    InvalidBreak,

    /// Expansion or evaluation nested deeper than the configured limit
    #[error("Maximum recursion depth of {limit} exceeded")]
    RecursionLimit {
        /// Configured limit
        limit: usize,
    },

    /// Console read or write failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Aborts the whole run, `try` does not intercept it
    Fatal,
    /// Raised during evaluation, `try` can recover from it
    Recoverable,
}

impl Error {
    /// Create a runtime error with a message
    pub fn runtime(msg: impl Into<String>) -> Self {
        Error::RuntimeError(msg.into())
    }

    /// Create an expansion error with a message
    pub fn expansion(msg: impl Into<String>) -> Self {
        Error::Expansion(msg.into())
    }

    /// Create an argument error for the named function
    pub fn invalid_args(function: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArguments {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::Read { .. } => ErrorSeverity::Fatal,
            Error::Expansion(_) => ErrorSeverity::Fatal,
            Error::UnquoteSpliceNotImplemented => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    /// Whether `try` may intercept this error
    pub fn is_recoverable(&self) -> bool {
        self.classify() == ErrorSeverity::Recoverable
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for jlisp operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrown_message_is_verbatim() {
        let err = Error::Thrown("\"My error message\"".to_string());
        assert_eq!(err.to_string(), "\"My error message\"");
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            Error::Read {
                line: 1,
                message: "Unmatched quote".into()
            }
            .classify(),
            ErrorSeverity::Fatal
        );
        assert!(!Error::expansion("[if] bad").is_recoverable());
        assert!(Error::SymbolNotFound {
            name: "ff".into(),
            line: 1
        }
        .is_recoverable());
        assert!(Error::RecursionLimit { limit: 10 }.is_recoverable());
    }

    #[test]
    fn test_not_a_function_message() {
        let err = Error::NotAFunction {
            line: 3,
            found: "NUMBER".into(),
        };
        assert!(err.to_string().contains("Item is not a function"));
    }
}
