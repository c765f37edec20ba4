//! `lambda`: closures over the scope they are evaluated in

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::macros::{form, macro_error};
use crate::runtime::{eval_item, expand, Env, Environment, Function, Macro, Term};

const USAGE: &str = "macro takes 2, 3 or 4 arguments: (id?, description?, variables, body)";
const BAD_PARAMS: &str = "Function macro error: function parameters must be variable names";

/// Everything a closure needs besides its captured scope
struct LambdaSpec {
    id: String,
    description: Option<String>,
    required: Vec<String>,
    rest: Option<String>,
    body: Term,
}

impl LambdaSpec {
    /// Bind call arguments in a fresh child of `captured` and run the body
    fn apply(&self, args: &[Term], captured: &Env) -> Result<Term> {
        if args.len() < self.required.len() {
            return Err(Error::invalid_args(
                "lambda",
                format!(
                    "Insufficient number of arguments to the function: {} received, at least {} expected",
                    args.len(),
                    self.required.len()
                ),
            ));
        }

        let scope = Environment::child(captured);
        for (name, value) in self.required.iter().zip(args) {
            scope.define(name, value.clone());
        }
        if let Some(rest) = &self.rest {
            scope.define(rest, Term::list(args[self.required.len()..].to_vec()));
        }
        eval_item(&self.body, &scope)
    }
}

/// `(lambda "id"? "description"? (params) body...)`
///
/// Expands to a one-element form; evaluating it captures the current scope
/// and yields the closure. A `&` in the parameter list binds the remaining
/// arguments, as a list, to the single name after it. Several body forms run
/// as an implicit `begin`.
pub struct LambdaMacro;

impl Macro for LambdaMacro {
    fn name(&self) -> &str {
        "lambda"
    }

    fn expand(&self, args: &[Term], env: &Env) -> Result<Term> {
        if args.len() < 2 {
            return Err(macro_error("lambda", USAGE));
        }

        let mut next = 0;
        let id = match &args[next] {
            Term::String(s) => {
                next += 1;
                Some(s.clone())
            }
            _ => None,
        };
        let description = match (&id, args.get(next)) {
            (Some(_), Some(Term::String(s))) => {
                next += 1;
                Some(s.clone())
            }
            _ => None,
        };

        let params = args
            .get(next)
            .and_then(Term::as_list)
            .ok_or_else(|| macro_error("lambda", BAD_PARAMS))?;
        let (required, rest) = parse_params(params)?;

        let body = match &args[next + 1..] {
            [] => return Err(macro_error("lambda", USAGE)),
            [single] => single.clone(),
            several => {
                let mut items = vec![Term::symbol("begin")];
                items.extend(several.iter().cloned());
                Term::list(items)
            }
        };
        let body = expand(&body, env)?;

        let id = id.unwrap_or_else(|| {
            format!("(anonymous lambda #{})", env.context().next_lambda_number())
        });
        let line = body.line();
        let spec = Rc::new(LambdaSpec {
            id,
            description,
            required,
            rest,
            body,
        });

        let capture = Function::new(move |_, env| {
            let id = spec.id.clone();
            let description = spec.description.clone();
            let spec = Rc::clone(&spec);
            let captured = Rc::clone(env);
            let closure = Function::new(move |args, _| spec.apply(args, &captured))
                .with_id(id)
                .with_description(description)
                .at_line(line);
            Ok(Term::function(closure))
        });
        Ok(form(capture, Vec::new()))
    }
}

/// Split a parameter list into required names and the optional rest name
fn parse_params(params: &[Term]) -> Result<(Vec<String>, Option<String>)> {
    let mut names = Vec::with_capacity(params.len());
    for param in params {
        match param.as_symbol() {
            Some(name) => names.push(name.to_string()),
            None => return Err(macro_error("lambda", BAD_PARAMS)),
        }
    }

    match names.iter().position(|n| n == "&") {
        None => Ok((names, None)),
        Some(at) if at + 2 == names.len() && names[at + 1] != "&" => {
            let rest = names.pop();
            names.truncate(at);
            Ok((names, rest))
        }
        Some(_) => Err(macro_error(
            "lambda",
            "'&' must be followed by exactly one parameter name",
        )),
    }
}
