//! Console collaborator used by `print` and `read`

use std::io::{BufRead, Write};

use crate::error::Result;

/// Line-based input and output for a running program
pub trait Console {
    /// Show `prompt` and read one line of input, without its line terminator
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Write one line of output
    fn write_line(&mut self, text: &str) -> Result<()>;
}

/// Console backed by the process's stdin and stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        Ok(())
    }
}
