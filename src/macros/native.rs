//! `native`: the host-expression escape hatch

use std::collections::HashMap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::macros::{form, macro_error};
use crate::native::{HostValue, NativeExpr};
use crate::runtime::{Env, Function, Macro, Symbol, Term};

/// `(native "expr" var...)`
///
/// The expression text is compiled when the form is expanded. At call time
/// each declared variable is bound, by name, to the host value of its
/// current binding, and the result is converted back into a term.
pub struct NativeMacro;

impl Macro for NativeMacro {
    fn name(&self) -> &str {
        "native"
    }

    fn expand(&self, args: &[Term], _env: &Env) -> Result<Term> {
        let (source, vars) = match args.split_first() {
            Some((Term::String(source), vars)) => (source, vars),
            _ => {
                return Err(macro_error(
                    "native",
                    "macro takes a string argument as the first argument",
                ))
            }
        };

        let vars: Vec<Symbol> = vars
            .iter()
            .map(|var| match var {
                Term::Symbol(sym) => Ok(sym.clone()),
                _ => Err(macro_error(
                    "native",
                    "macro takes 0 or more variables as the arguments following the first one",
                )),
            })
            .collect::<Result<_>>()?;

        let expr =
            NativeExpr::compile(source).map_err(|err| Error::expansion(err.to_string()))?;

        let call = Function::new(move |_, env| {
            trace!(source = expr.source(), vars = vars.len(), "evaluating native expression");
            let mut bindings = HashMap::with_capacity(vars.len());
            for var in &vars {
                bindings.insert(var.name.clone(), unpack(&Term::Symbol(var.clone()), env)?);
            }
            pack(expr.evaluate(&bindings)?)
        })
        .with_id("<native>");
        Ok(form(call, Vec::new()))
    }
}

/// Host value of a term; symbols stand for their current binding
fn unpack(term: &Term, env: &Env) -> Result<HostValue> {
    match term {
        Term::Number(n) => Ok(HostValue::Number(*n)),
        Term::String(s) => Ok(HostValue::Str(s.clone())),
        Term::Boolean(b) => Ok(HostValue::Bool(*b)),
        Term::Nil | Term::Function(_) => Ok(HostValue::Null),
        Term::List(items) => Ok(HostValue::Array(
            items
                .iter()
                .map(|item| unpack(item, env))
                .collect::<Result<Vec<_>>>()?,
        )),
        Term::Symbol(sym) => {
            let _guard = env.context().enter()?;
            match env.lookup(&sym.name) {
                Some(value) => unpack(&value, env),
                None => Err(Error::SymbolNotFound {
                    name: sym.name.clone(),
                    line: sym.line.unwrap_or(0),
                }),
            }
        }
    }
}

/// Term for a host result
fn pack(value: HostValue) -> Result<Term> {
    match value {
        HostValue::Bool(b) => Ok(Term::Boolean(b)),
        HostValue::Str(s) => Ok(Term::String(s)),
        HostValue::Number(n) => Ok(Term::Number(n)),
        HostValue::Array(items) => Ok(Term::list(
            items.into_iter().map(pack).collect::<Result<Vec<_>>>()?,
        )),
        HostValue::Null | HostValue::Undefined => Err(Error::Native(
            "code returned an invalid value".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::test_support::{env, eval_str};

    #[test]
    fn test_constant_expression() {
        let env = env();
        assert_eq!(eval_str("(native \"1 + 1\")", &env).unwrap(), Term::number(2.0));
    }

    #[test]
    fn test_bound_variables() {
        let env = env();
        assert_eq!(
            eval_str("(define a 1) (native \"a + 1\" a)", &env).unwrap(),
            Term::number(2.0)
        );
        assert_eq!(
            eval_str("(defn strleen (s) (native \"s? s.length: 0\" s)) (strleen \"abc\")", &env)
                .unwrap(),
            Term::number(3.0)
        );
    }

    #[test]
    fn test_lists_cross_the_boundary() {
        let env = env();
        let result = eval_str("(define xs (list 1 2 3)) (native \"[xs[2], xs.length]\" xs)", &env);
        assert_eq!(result.unwrap().to_string(), "(3 3)");
    }

    #[test]
    fn test_invalid_result() {
        let env = env();
        let err = eval_str("(native \"null\")", &env).unwrap_err();
        assert_eq!(err.to_string(), "[native] code returned an invalid value");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_expansion_checks() {
        let env = env();
        assert!(matches!(
            eval_str("(native 1)", &env).unwrap_err(),
            Error::Expansion(_)
        ));
        assert!(matches!(
            eval_str("(native \"a\" 1)", &env).unwrap_err(),
            Error::Expansion(_)
        ));
        assert!(matches!(
            eval_str("(native \"1 +\")", &env).unwrap_err(),
            Error::Expansion(_)
        ));
    }

    #[test]
    fn test_unbound_variable() {
        let env = env();
        let err = eval_str("(native \"zz\" zz)", &env).unwrap_err();
        assert!(matches!(err, Error::SymbolNotFound { .. }));
    }

    #[test]
    fn test_pack_and_unpack() {
        let env = env();
        assert_eq!(
            unpack(&Term::list(vec![Term::Nil, Term::Boolean(true)]), &env).unwrap(),
            HostValue::Array(vec![HostValue::Null, HostValue::Bool(true)])
        );
        assert!(pack(HostValue::Undefined).is_err());
    }
}
