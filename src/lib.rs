//! A small interactive command shell.
//!
//! Each line is run as one or two child processes: a plain command, a pair
//! connected by a single `|`, or a command whose standard output (`>`) or
//! standard input (`<`) is redirected to a file. A trailing `&` runs the line
//! without waiting for it.
//!
//! The main entry point is [`Interpreter`]. Parsing lives in [`parser`] and
//! process creation behind the [`command::Executor`] trait, implemented for
//! real processes by [`ForkExecutor`].

mod builtin;
pub mod command;
pub mod config;
pub mod error;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reaper;

pub use builtin::{Flow, HELP_BANNER};
pub use config::{Config, Options};
pub use external::ForkExecutor;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{
    Interpreter, READ_FAILURE, report_read_error, strip_newline, truncate_line,
};
