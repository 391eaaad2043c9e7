//! Runtime settings of the interpreter.

use crate::parser::ParseMode;
use crate::reaper::ReapPolicy;
use argh::FromArgs;

/// Prompt printed before each line is read.
pub const DEFAULT_PROMPT: &str = "Shell By SeaShore$ ";

/// Capacity of the line buffer, terminator included. Longer input is cut to
/// `MAX_LINE_LENGTH - 1` bytes.
pub const MAX_LINE_LENGTH: usize = 100;

#[derive(FromArgs, Debug)]
/// A simple command shell with single pipe and redirection support.
pub struct Options {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each command line
    pub prompt: String,

    #[argh(switch)]
    /// reject lines with an empty command or file name around '|', '<' or '>'
    pub strict: bool,

    #[argh(switch)]
    /// collect every finished background command before each new one
    pub reap_all: bool,

    #[argh(switch, short = 'v')]
    /// log debug events to stderr (RUST_LOG takes precedence)
    pub verbose: bool,
}

/// Settings consumed by [`crate::Interpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub parse_mode: ParseMode,
    pub reap_policy: ReapPolicy,
    pub max_line_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            parse_mode: ParseMode::Permissive,
            reap_policy: ReapPolicy::One,
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

impl From<&Options> for Config {
    fn from(options: &Options) -> Self {
        Self {
            prompt: options.prompt.clone(),
            parse_mode: if options.strict {
                ParseMode::Strict
            } else {
                ParseMode::Permissive
            },
            reap_policy: if options.reap_all {
                ReapPolicy::Sweep
            } else {
                ReapPolicy::One
            },
            ..Self::default()
        }
    }
}

impl Options {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}
