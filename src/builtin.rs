use crate::command::Argv;
use anyhow::Result;
use argh::FromArgs;
use std::io::Write;

/// The fixed feature banner printed by `help`.
pub const HELP_BANNER: &str = "\n\
******************************************\n\
\n\
A Simple Command Shell\n\
\n\
Type \"help\" to see the list of features of this shell.\n\
\n\
List of commands supported\n\
\t- ls\n\
\t- exit\n\
\t- all other commands executable through execvp()\n\
\t- Single pipe and redirection are also supported!\n\
\n\
Have Fun!!!\n\
\n\
******************************************\n";

/// What the read loop should do after a built-in ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Commands handled by the shell itself, without creating a process.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) so they get the
/// same argument handling as the shell's own command line.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "help".
    fn name() -> &'static str;

    /// Runs the command, writing any output to `stdout`.
    fn execute(self, stdout: &mut dyn Write) -> Result<Flow>;
}

/// Build `T` if `argv` consists of exactly its name.
///
/// A builtin followed by other words is not a builtin: the whole line falls
/// through to normal execution.
pub(crate) fn try_create<T: BuiltinCommand>(argv: &Argv) -> Option<T> {
    match argv.words() {
        [name] if name == T::name() => T::from_args(&[T::name()], &[]).ok(),
        _ => None,
    }
}

#[derive(FromArgs)]
/// Display the list of features of this shell.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, stdout: &mut dyn Write) -> Result<Flow> {
        stdout.write_all(HELP_BANNER.as_bytes())?;
        stdout.flush()?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Exit {}

impl Exit {
    /// `exit` is only recognized when it is the whole line, with no spaces around it.
    pub fn matches(line: &str) -> bool {
        line == Self::name()
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write) -> Result<Flow> {
        Ok(Flow::Exit)
    }
}
