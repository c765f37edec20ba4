//! Arithmetic and comparison builtins

use crate::builtins::{check_arity, Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Env, Term};

/// Register arithmetic and comparison builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(PlusBuiltin);
    registry.register(MinusBuiltin);
    registry.register(StarBuiltin);
    registry.register(SlashBuiltin);
    registry.register(LessThanBuiltin);
    registry.register(EqualsBuiltin);
}

fn numbers(name: &str, args: &[Term]) -> Result<Vec<f64>> {
    args.iter()
        .map(|arg| match arg {
            Term::Number(n) => Ok(*n),
            _ => Err(Error::invalid_args(
                name,
                "function takes only number arguments",
            )),
        })
        .collect()
}

fn two_numbers(name: &str, args: &[Term]) -> Result<(f64, f64)> {
    check_arity(name, args, 2, Some(2), "function takes 2 number arguments")?;
    let n = numbers(name, args)?;
    Ok((n[0], n[1]))
}

/// + - Sum of two or more numbers
pub struct PlusBuiltin;

impl Builtin for PlusBuiltin {
    fn name(&self) -> &str {
        "+"
    }

    fn description(&self) -> &str {
        "Sum of two or more numbers"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        check_arity("+", args, 2, None, "function takes 2 or more number arguments")?;
        Ok(Term::number(numbers("+", args)?.iter().sum()))
    }
}

/// - - Difference of two numbers
pub struct MinusBuiltin;

impl Builtin for MinusBuiltin {
    fn name(&self) -> &str {
        "-"
    }

    fn description(&self) -> &str {
        "Difference of two numbers"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        let (a, b) = two_numbers("-", args)?;
        Ok(Term::number(a - b))
    }
}

/// * - Product of two or more numbers
pub struct StarBuiltin;

impl Builtin for StarBuiltin {
    fn name(&self) -> &str {
        "*"
    }

    fn description(&self) -> &str {
        "Product of two or more numbers"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        check_arity("*", args, 2, None, "function takes 2 or more number arguments")?;
        Ok(Term::number(numbers("*", args)?.iter().product()))
    }
}

/// / - Quotient of two numbers (IEEE division)
pub struct SlashBuiltin;

impl Builtin for SlashBuiltin {
    fn name(&self) -> &str {
        "/"
    }

    fn description(&self) -> &str {
        "Quotient of two numbers"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        let (a, b) = two_numbers("/", args)?;
        Ok(Term::number(a / b))
    }
}

/// < - Numeric less-than
pub struct LessThanBuiltin;

impl Builtin for LessThanBuiltin {
    fn name(&self) -> &str {
        "<"
    }

    fn description(&self) -> &str {
        "True when the first number is smaller than the second"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        let (a, b) = two_numbers("<", args)?;
        Ok(Term::Boolean(a < b))
    }
}

/// = - Equality of printed representations
///
/// `(= 1 "1")` is false because the string prints with quotes.
pub struct EqualsBuiltin;

impl Builtin for EqualsBuiltin {
    fn name(&self) -> &str {
        "="
    }

    fn description(&self) -> &str {
        "True when both arguments print the same"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        check_arity("=", args, 2, Some(2), "function takes 2 arguments")?;
        Ok(Term::Boolean(args[0].to_string() == args[1].to_string()))
    }
}
