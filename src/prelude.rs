//! Bootstrap program loaded ahead of every `run`
//!
//! Macros are loaded first so the function definitions can use them.

/// Derived macros: `def`, `fn` and `defun`
pub const LISP_MACROS: &str = r#"
    (defmacro def define)
    (defmacro fn lambda)

    (defmacro defun (name vars body)
        (list (quote define) name
            (list (quote lambda)
                vars
                body)))
"#;

/// Derived functions built on the native primitives
pub const LISP_FUNCTIONS: &str = r#"
    (defn not (a)
        (if a false true))

    (defn or (a b)
        (if a true (if b true false)))

    (defn and (a b)
        (if a (if b true false) false))

    (defn <= (a b)
        (or (< a b) (= a b)))

    (defn > (a b)
        (not (<= a b)))

    (defn >= (a b)
        (or (> a b) (= a b)))

    (defn != (a b)
        (not (= a b)))

    (defn strlen (s)
        (len (str->list s)))
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_prelude_parses() {
        assert_eq!(parse(LISP_MACROS).unwrap().len(), 3);
        assert_eq!(parse(LISP_FUNCTIONS).unwrap().len(), 8);
    }
}
