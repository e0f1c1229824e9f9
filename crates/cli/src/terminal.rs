//! Line based terminal over any reader and writer

use s3menu_core::{Error, Result, Terminal};
use std::io::{BufRead, Write};

/// Plain line console.
///
/// The binary wires it to locked stdin/stdout; tests use an in-memory
/// cursor and buffer.
pub struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Everything written so far
    #[cfg(test)]
    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<I: BufRead, O: Write> Terminal for Console<I, O> {
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }
}
