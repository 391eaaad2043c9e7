use anyhow::Result;
use std::ffi::CString;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Ordered argument vector of a single command.
///
/// The first element, if present, is the program name. An empty vector is a
/// valid value: handing it to the executor results in a not-found failure
/// inside the child rather than in the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argv(Vec<String>);

impl Argv {
    /// Program name, or an empty string when the vector has no words.
    pub fn program(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into the NUL-terminated strings expected by `execvp`.
    ///
    /// Fails if a word contains an interior NUL byte.
    pub fn to_cstrings(&self) -> Result<(CString, Vec<CString>)> {
        let program = CString::new(self.program())?;
        let args = self
            .0
            .iter()
            .map(|word| CString::new(word.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((program, args))
    }
}

impl<S: Into<String>> FromIterator<S> for Argv {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The way a line is turned into processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A single command with inherited standard streams.
    Plain(Argv),
    /// `left | right`: the standard output of `left` feeds the standard input of `right`.
    Pipe { left: Argv, right: Argv },
    /// `command > target`: standard output goes to a truncated or created file.
    RedirectOut { command: Argv, target: Argv },
    /// `command < target`: standard input is read from an existing file.
    RedirectIn { command: Argv, target: Argv },
}

impl Shape {
    /// Short name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Plain(_) => "plain",
            Shape::Pipe { .. } => "pipe",
            Shape::RedirectOut { .. } => "redirect-out",
            Shape::RedirectIn { .. } => "redirect-in",
        }
    }
}

/// Transient description of one line's worth of work for the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub shape: Shape,
    pub background: bool,
}

impl ExecRequest {
    pub fn foreground(shape: Shape) -> Self {
        Self {
            shape,
            background: false,
        }
    }

    /// File name used by the redirect shapes: the first word on the right-hand side.
    ///
    /// Extra words after the file name are ignored.
    pub fn redirect_target(target: &Argv) -> &str {
        target.program()
    }
}

/// Something that can turn an [`ExecRequest`] into running processes.
///
/// Implementations only return an error for failures that must terminate the
/// shell itself (the process or pipe could not be created). Everything that
/// goes wrong inside a child stays inside that child.
pub trait Executor {
    fn execute(&mut self, request: ExecRequest) -> Result<()>;
}
