use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};

const HELP_MSG: &str = "\
jlisp - run a jlisp program

USAGE:
    jlisp <path>

The program is loaded after the prelude and run to completion. Output comes
from the program's own print calls.

ENVIRONMENT:
    JLISP_MAX_DEPTH     maximum nesting of expansion and evaluation
    JLISP_STACK_SIZE    stack size, in bytes, of the interpreter thread

OPTIONS:
    -h, --help    Print this message";

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|x| x == "--help" || x == "-h") {
        println!("{HELP_MSG}");
        return Ok(());
    }

    let path = match args.first() {
        Some(path) => path,
        None => bail!("missing program path\n\n{HELP_MSG}"),
    };

    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    if text.trim().is_empty() {
        bail!("{} is empty", path);
    }

    jlisp::run(&text).with_context(|| format!("failed to run {}", path))?;
    Ok(())
}
