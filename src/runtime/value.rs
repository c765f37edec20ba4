use std::fmt;
use std::rc::Rc;

use super::environment::Env;
use crate::error::Result;

/// Signature shared by native primitives, closures and the functions
/// synthesized by macro expansion
pub type NativeCall = dyn Fn(&[Term], &Env) -> Result<Term>;

/// A symbol occurrence, optionally tagged with its source line
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Symbol name
    pub name: String,
    /// Line the symbol was read from
    pub line: Option<usize>,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A callable term
///
/// Closures keep their parameters, body and captured scope inside `call`;
/// only printing and documentation metadata is visible from outside.
pub struct Function {
    call: Box<NativeCall>,
    /// Name shown when the function is printed
    pub id: Option<String>,
    /// Documentation string returned by `doc`
    pub description: Option<String>,
    /// Source line of the defining form
    pub line: Option<usize>,
}

impl Function {
    /// Wrap a native callable with no metadata
    pub fn new(call: impl Fn(&[Term], &Env) -> Result<Term> + 'static) -> Self {
        Function {
            call: Box::new(call),
            id: None,
            description: None,
            line: None,
        }
    }

    /// Attach a printable id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach an optional documentation string
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Attach the source line of the defining form
    pub fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Invoke the function with already evaluated arguments
    pub fn call(&self, args: &[Term], env: &Env) -> Result<Term> {
        (self.call)(args, env)
    }

    /// Label used in traces
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("(native)")
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("line", &self.line)
            .finish()
    }
}

/// The single value type of the language; code and data share it
#[derive(Debug, Clone)]
pub enum Term {
    /// Floating point number
    Number(f64),
    /// Text
    String(String),
    /// Name resolved through the environment
    Symbol(Symbol),
    /// `true` or `false`
    Boolean(bool),
    /// Empty result and "nothing here" marker
    Nil,
    /// Ordered sequence, shared between clones
    List(Rc<Vec<Term>>),
    /// Native primitive, closure or expansion helper
    Function(Rc<Function>),
}

impl Term {
    /// Creates a number term
    pub fn number(n: f64) -> Self {
        Term::Number(n)
    }

    /// Creates a string term
    pub fn string(s: impl Into<String>) -> Self {
        Term::String(s.into())
    }

    /// Creates a symbol without line information
    pub fn symbol(name: impl Into<String>) -> Self {
        Term::Symbol(Symbol {
            name: name.into(),
            line: None,
        })
    }

    /// Creates a symbol read from the given line
    pub fn symbol_at(name: impl Into<String>, line: usize) -> Self {
        Term::Symbol(Symbol {
            name: name.into(),
            line: Some(line),
        })
    }

    /// Creates a list term
    pub fn list(items: Vec<Term>) -> Self {
        Term::List(Rc::new(items))
    }

    /// Wraps a function
    pub fn function(f: Function) -> Self {
        Term::Function(Rc::new(f))
    }

    /// Type tag used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Number(_) => "NUMBER",
            Term::String(_) => "STRING",
            Term::Symbol(_) => "SYMBOL",
            Term::Boolean(_) => "BOOLEAN",
            Term::Nil => "NIL",
            Term::List(_) => "LIST",
            Term::Function(_) => "FUNCTION",
        }
    }

    /// Control flow only ever branches on the `true` variant itself
    pub fn is_true(&self) -> bool {
        matches!(self, Term::Boolean(true))
    }

    /// Checks if the term is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Nil)
    }

    /// List elements, if this is a list
    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Symbol name, if this is a symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Term::Symbol(sym) => Some(sym.name.as_str()),
            _ => None,
        }
    }

    /// Best known source line for error messages
    pub fn line(&self) -> Option<usize> {
        match self {
            Term::Symbol(sym) => sym.line,
            Term::Function(f) => f.line,
            Term::List(items) => items.iter().find_map(|t| t.line()),
            _ => None,
        }
    }

    /// Printed form, except that strings lose their quotes
    pub fn to_display_string(&self) -> String {
        match self {
            Term::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Number(a), Term::Number(b)) => a == b,
            (Term::String(a), Term::String(b)) => a == b,
            (Term::Symbol(a), Term::Symbol(b)) => a == b,
            (Term::Boolean(a), Term::Boolean(b)) => a == b,
            (Term::Nil, Term::Nil) => true,
            (Term::List(a), Term::List(b)) => a == b,
            // Two functions are never interchangeable
            _ => false,
        }
    }
}

/// Decimal text of a number, matching the language's printed format
///
/// Magnitudes of at least 1e21, or below 1e-6, switch to exponent form
/// with an explicit sign on the exponent (`1e+23`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Number(n) => write!(f, "{}", format_number(*n)),
            Term::String(s) => write!(f, "\"{}\"", s),
            Term::Symbol(sym) => write!(f, "{}", sym.name),
            Term::Boolean(b) => write!(f, "{}", b),
            Term::Nil => write!(f, "nil"),
            Term::Function(func) => match &func.id {
                Some(id) => write!(f, "#<Function '{}'>", id),
                None => write!(f, "#<Function (native)>"),
            },
            Term::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printed_forms() {
        assert_eq!(Term::Boolean(true).to_string(), "true");
        assert_eq!(Term::Boolean(false).to_string(), "false");
        assert_eq!(Term::string("AB").to_string(), "\"AB\"");
        assert_eq!(Term::Nil.to_string(), "nil");
        assert_eq!(Term::symbol("foo").to_string(), "foo");
        assert_eq!(
            Term::list(vec![Term::number(1.0), Term::number(2.0), Term::number(3.0)]).to_string(),
            "(1 2 3)"
        );
        assert_eq!(Term::list(vec![]).to_string(), "()");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(3.45), "3.45");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(1.0 / 0.0), "Infinity");
        assert_eq!(format_number(-1.0 / 0.0), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_number_exponent_form() {
        assert_eq!(format_number(1e23), "1e+23");
        assert_eq!(format_number(1.5e22), "1.5e+22");
        assert_eq!(format_number(-2e21), "-2e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.25e-9), "1.25e-9");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_function_printing() {
        let named = Term::function(Function::new(|_, _| Ok(Term::Nil)).with_id("sum"));
        let anonymous = Term::function(Function::new(|_, _| Ok(Term::Nil)));
        assert_eq!(named.to_string(), "#<Function 'sum'>");
        assert_eq!(anonymous.to_string(), "#<Function (native)>");
    }

    #[test]
    fn test_functions_never_equal() {
        let f = Term::function(Function::new(|_, _| Ok(Term::Nil)));
        assert_ne!(f, f.clone());
        assert_eq!(
            Term::list(vec![Term::symbol("a"), Term::Nil]),
            Term::list(vec![Term::symbol_at("a", 3), Term::Nil])
        );
    }

    #[test]
    fn test_only_true_is_true() {
        assert!(Term::Boolean(true).is_true());
        assert!(!Term::number(1.0).is_true());
        assert!(!Term::string("true").is_true());
    }
}
