use crate::builtin::{self, BuiltinCommand, Exit, Flow, Help};
use crate::command::{Executor, Shape};
use crate::config::Config;
use crate::external::ForkExecutor;
use crate::parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::{debug, trace, warn};

/// The read loop of the shell.
///
/// Each line is handled on its own: `exit` stops the loop, a lone `help`
/// prints the banner, and everything else is parsed into an
/// [`crate::command::ExecRequest`] and handed to the [`Executor`].
///
/// Example
/// ```no_run
/// use seashell::{Config, Interpreter};
/// let mut sh = Interpreter::new(Config::default());
/// sh.execute_line("echo hello world").unwrap();
/// ```
pub struct Interpreter<E = ForkExecutor> {
    config: Config,
    executor: E,
}

impl Interpreter<ForkExecutor> {
    /// Create an interpreter that runs commands as child processes.
    pub fn new(config: Config) -> Self {
        let executor = ForkExecutor::new(config.reap_policy);
        Self::with_executor(config, executor)
    }
}

impl Default for Interpreter<ForkExecutor> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<E: Executor> Interpreter<E> {
    /// Create an interpreter with a custom executor.
    pub fn with_executor(config: Config, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Hook run once before the first prompt.
    pub fn initialize(&mut self) {
        trace!(config = ?self.config, "shell starting");
    }

    /// Hook run once after the loop ends.
    pub fn cleanup(&mut self) {
        trace!("shell stopping");
    }

    /// Handle one line, writing builtin output to standard output.
    pub fn execute_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        self.execute_line_with_redefined_output(line, &mut std::io::stdout())
    }

    /// Handle one line, writing builtin output to `out`.
    ///
    /// Returns an error only when the shell itself cannot go on (a process or
    /// pipe could not be created). Failures of the commands are never reported
    /// here.
    pub fn execute_line_with_redefined_output(
        &mut self,
        line: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<Flow> {
        let line = strip_newline(line);
        if Exit::matches(line) {
            return Exit {}.execute(out);
        }

        let request = match parser::parse_line(line, self.config.parse_mode) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{}", e);
                return Ok(Flow::Continue);
            }
        };

        if let Shape::Plain(argv) = &request.shape {
            if let Some(help) = builtin::try_create::<Help>(argv) {
                return help.execute(out);
            }
        }

        self.executor.execute(request)?;
        Ok(Flow::Continue)
    }

    /// Read-Eval-Print Loop on the terminal.
    ///
    /// Ends on `exit` or at the end of input. Interrupts and read errors are
    /// reported and the loop goes on; the end of input is reported too.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        self.initialize();

        loop {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    let line = truncate_line(&line, self.config.max_line_length);
                    if !line.trim().is_empty() {
                        if let Err(e) = rl.add_history_entry(line) {
                            warn!(error = %e, "failed to record history");
                        }
                    }
                    if self.execute_line(line)? == Flow::Exit {
                        break;
                    }
                }
                Err(err) => {
                    if report_read_error(&err, &mut std::io::stdout())? == Flow::Exit {
                        break;
                    }
                }
            }
        }

        self.cleanup();
        Ok(())
    }
}

/// Diagnostic printed when no line could be read.
pub const READ_FAILURE: &str = "Something went wrong. Try again, I guess.";

/// Report a failed read and decide whether the loop goes on.
///
/// Only the end of input stops the loop: a closed input never yields another line.
pub fn report_read_error(err: &ReadlineError, out: &mut dyn Write) -> std::io::Result<Flow> {
    match err {
        ReadlineError::Interrupted => {
            writeln!(out, "Interrupted")?;
            Ok(Flow::Continue)
        }
        ReadlineError::Eof => {
            debug!("end of input");
            writeln!(out, "{}", READ_FAILURE)?;
            Ok(Flow::Exit)
        }
        err => {
            debug!(error = %err, "readline failed");
            writeln!(out, "{}", READ_FAILURE)?;
            Ok(Flow::Continue)
        }
    }
}

/// Cut `line` to the bytes a buffer of `capacity` (terminator included) can hold.
///
/// The cut never splits a character, so slightly fewer bytes may be kept.
pub fn truncate_line(line: &str, capacity: usize) -> &str {
    let limit = capacity.saturating_sub(1);
    if line.len() <= limit {
        return line;
    }
    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

/// Drop everything from the first newline on.
pub fn strip_newline(line: &str) -> &str {
    match line.find('\n') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
