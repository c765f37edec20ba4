//! List builtins

use crate::builtins::{check_arity, list_arg, Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Env, Term};

/// Register list builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(CarBuiltin);
    registry.register(CdrBuiltin);
    registry.register(ConsBuiltin);
    registry.register(ListBuiltin);
    registry.register(MapBuiltin);
    registry.register(ReduceBuiltin);
}

fn apply(name: &str, function: &Term, args: &[Term], env: &Env) -> Result<Term> {
    match function {
        Term::Function(f) => f.call(args, env),
        other => Err(Error::invalid_args(
            name,
            format!("expected a function, found {}", other.type_name()),
        )),
    }
}

/// car - First element of a list (nil for the empty list)
pub struct CarBuiltin;

impl Builtin for CarBuiltin {
    fn name(&self) -> &str {
        "car"
    }

    fn description(&self) -> &str {
        "First element of a list"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        const REASON: &str = "function takes 1 list argument";
        check_arity("car", args, 1, Some(1), REASON)?;
        let items = list_arg("car", &args[0], REASON)?;
        Ok(items.first().cloned().unwrap_or(Term::Nil))
    }
}

/// cdr - Everything but the first element
pub struct CdrBuiltin;

impl Builtin for CdrBuiltin {
    fn name(&self) -> &str {
        "cdr"
    }

    fn description(&self) -> &str {
        "List without its first element"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        const REASON: &str = "function takes 1 list argument";
        check_arity("cdr", args, 1, Some(1), REASON)?;
        let items = list_arg("cdr", &args[0], REASON)?;
        Ok(Term::list(items.iter().skip(1).cloned().collect()))
    }
}

/// cons - Prepend an element to a list
pub struct ConsBuiltin;

impl Builtin for ConsBuiltin {
    fn name(&self) -> &str {
        "cons"
    }

    fn description(&self) -> &str {
        "Prepend an element to a list"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        const REASON: &str = "function takes 2 arguments, of which the second must be a list";
        check_arity("cons", args, 2, Some(2), REASON)?;
        let tail = list_arg("cons", &args[1], REASON)?;

        let mut items = Vec::with_capacity(tail.len() + 1);
        items.push(args[0].clone());
        items.extend(tail.iter().cloned());
        Ok(Term::list(items))
    }
}

/// list - Collect the arguments into a list
pub struct ListBuiltin;

impl Builtin for ListBuiltin {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List of the given arguments"
    }

    fn call(&self, args: &[Term], _env: &Env) -> Result<Term> {
        Ok(Term::list(args.to_vec()))
    }
}

/// map - Apply a function to every element of a list
pub struct MapBuiltin;

impl Builtin for MapBuiltin {
    fn name(&self) -> &str {
        "map"
    }

    fn description(&self) -> &str {
        "(map f list): list of f applied to each element"
    }

    fn call(&self, args: &[Term], env: &Env) -> Result<Term> {
        const REASON: &str = "function takes a function and a list";
        check_arity("map", args, 2, Some(2), REASON)?;
        let items = list_arg("map", &args[1], REASON)?;

        let mapped = items
            .iter()
            .map(|item| apply("map", &args[0], std::slice::from_ref(item), env))
            .collect::<Result<Vec<_>>>()?;
        Ok(Term::list(mapped))
    }
}

/// reduce - Left fold over a list
///
/// `(reduce f init list)` starts from `init`; `(reduce f list)` starts from
/// the first element and rejects an empty list.
pub struct ReduceBuiltin;

impl Builtin for ReduceBuiltin {
    fn name(&self) -> &str {
        "reduce"
    }

    fn description(&self) -> &str {
        "(reduce f init? list): fold the list from the left with f"
    }

    fn call(&self, args: &[Term], env: &Env) -> Result<Term> {
        const REASON: &str = "function takes a function, an optional initial value and a list";
        check_arity("reduce", args, 2, Some(3), REASON)?;
        let function = &args[0];
        let items = list_arg("reduce", &args[args.len() - 1], REASON)?;

        let (mut acc, rest) = if args.len() == 3 {
            (args[1].clone(), items)
        } else {
            match items.split_first() {
                Some((first, rest)) => (first.clone(), rest),
                None => {
                    return Err(Error::invalid_args(
                        "reduce",
                        "empty list and no initial value",
                    ))
                }
            }
        };

        for item in rest {
            acc = apply("reduce", function, &[acc, item.clone()], env)?;
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::test_support::env;

    fn nums(xs: &[f64]) -> Term {
        Term::list(xs.iter().map(|x| Term::number(*x)).collect())
    }

    #[test]
    fn test_car_cdr() {
        let env = env();
        let xs = nums(&[1.0, 2.0, 3.0]);
        assert_eq!(CarBuiltin.call(&[xs.clone()], &env).unwrap(), Term::number(1.0));
        assert_eq!(CdrBuiltin.call(&[xs], &env).unwrap(), nums(&[2.0, 3.0]));
        assert_eq!(CarBuiltin.call(&[nums(&[])], &env).unwrap(), Term::Nil);
        assert_eq!(CdrBuiltin.call(&[nums(&[])], &env).unwrap(), nums(&[]));
    }

    #[test]
    fn test_strict_arity() {
        let env = env();
        let err = CarBuiltin.call(&[Term::number(1.0)], &env).unwrap_err();
        assert_eq!(err.to_string(), "[car] function takes 1 list argument");
        assert!(CdrBuiltin.call(&[nums(&[1.0]), nums(&[2.0])], &env).is_err());
        assert!(ConsBuiltin.call(&[Term::number(1.0), Term::number(2.0)], &env).is_err());
    }

    #[test]
    fn test_cons_prepends() {
        let env = env();
        let result = ConsBuiltin
            .call(&[Term::number(45.0), nums(&[2.0, 3.0])], &env)
            .unwrap();
        assert_eq!(result, nums(&[45.0, 2.0, 3.0]));
    }

    #[test]
    fn test_map_and_reduce() {
        let env = env();
        let plus = env.lookup("+").unwrap();
        let xs = nums(&[1.0, 2.0, 3.0]);

        assert_eq!(
            ReduceBuiltin.call(&[plus.clone(), xs.clone()], &env).unwrap(),
            Term::number(6.0)
        );
        assert_eq!(
            ReduceBuiltin
                .call(&[plus.clone(), Term::number(10.0), xs.clone()], &env)
                .unwrap(),
            Term::number(16.0)
        );
        assert!(ReduceBuiltin.call(&[plus.clone(), nums(&[])], &env).is_err());

        let car = env.lookup("car").unwrap();
        let nested = Term::list(vec![nums(&[1.0, 9.0]), nums(&[2.0, 9.0])]);
        assert_eq!(MapBuiltin.call(&[car, nested], &env).unwrap(), nums(&[1.0, 2.0]));
        assert!(MapBuiltin.call(&[Term::number(1.0), xs], &env).is_err());
    }
}
