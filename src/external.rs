//! Process creation for the four execution shapes.
//!
//! Everything that can go wrong after `fork` is handled inside the child: it
//! prints a diagnostic to standard error and exits with status 1. The only
//! errors returned to the caller are failures to create a process or a pipe,
//! which the shell treats as fatal.

use crate::command::{Argv, ExecRequest, Executor, ExitCode, Shape};
use crate::reaper::{ReapPolicy, reap};
use anyhow::{Context, Result};
use nix::fcntl::{OFlag, open};
use nix::libc;
use nix::sys::stat::Mode;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, dup2, execvp, fork, pipe};
use std::convert::Infallible;
use std::ffi::CString;
use std::io::Write;
use std::os::unix::io::RawFd;
use tracing::{debug, warn};

/// Status used by a child that could not become the requested program.
const CHILD_FAILURE: i32 = 1;

/// Which standard stream a redirect replaces.
#[derive(Debug, Clone, Copy)]
enum Stream {
    Input,
    Output,
}

impl Stream {
    fn fd(self) -> RawFd {
        match self {
            Stream::Input => libc::STDIN_FILENO,
            Stream::Output => libc::STDOUT_FILENO,
        }
    }

    fn open_flags(self) -> OFlag {
        match self {
            Stream::Input => OFlag::O_RDONLY,
            Stream::Output => OFlag::O_RDWR | OFlag::O_CREAT | OFlag::O_TRUNC,
        }
    }

    fn dup_error(self) -> &'static str {
        match self {
            Stream::Input => "Trouble dup2-ing to stdin",
            Stream::Output => "Trouble dup2-ing to stdout",
        }
    }
}

/// Program image ready for `execvp`, built before forking so the child only
/// has to make system calls.
struct Program {
    file: CString,
    args: Vec<CString>,
}

impl Program {
    fn prepare(argv: &Argv) -> Option<Self> {
        match argv.to_cstrings() {
            Ok((file, args)) => Some(Self { file, args }),
            Err(e) => {
                eprintln!("{}: {}", argv.program(), e);
                None
            }
        }
    }

    /// Replace the current process image; only returns by exiting the child.
    fn exec(&self, context: &str) -> ! {
        let err = match execvp(&self.file, &self.args) {
            Err(e) => e,
            Ok(never) => match never {},
        };
        child_fail(context, err)
    }
}

/// Report an error from inside a child and terminate it.
fn child_fail(context: &str, err: nix::Error) -> ! {
    let message = format!("{}: {}\n", context, err.desc());
    let _ = nix::unistd::write(libc::STDERR_FILENO, message.as_bytes());
    // SAFETY: `_exit` skips atexit handlers and stdio flushing, which belong
    // to the parent shell's image.
    unsafe { libc::_exit(CHILD_FAILURE) }
}

/// Executor that runs commands as real child processes.
#[derive(Debug, Default)]
pub struct ForkExecutor {
    policy: ReapPolicy,
}

impl ForkExecutor {
    pub fn new(policy: ReapPolicy) -> Self {
        Self { policy }
    }

    /// Fork, running `child` in the new process.
    ///
    /// Standard output is flushed first so buffered shell output is not
    /// written twice.
    fn spawn(&self, child: impl FnOnce() -> Infallible) -> Result<Pid> {
        let _ = std::io::stdout().flush();
        // SAFETY: the shell is single-threaded and the child only performs
        // system calls before replacing its image or exiting.
        match unsafe { fork() }.context("Trouble forking")? {
            ForkResult::Parent { child } => {
                debug!(pid = %child, "forked child");
                Ok(child)
            }
            ForkResult::Child => match child() {},
        }
    }

    fn run_plain(&self, argv: &Argv) -> Result<Vec<Pid>> {
        let Some(program) = Program::prepare(argv) else {
            return Ok(Vec::new());
        };
        let pid = self.spawn(|| program.exec("exec failed"))?;
        Ok(vec![pid])
    }

    fn run_pipe(&self, left: &Argv, right: &Argv) -> Result<Vec<Pid>> {
        let (Some(first), Some(second)) = (Program::prepare(left), Program::prepare(right)) else {
            return Ok(Vec::new());
        };

        let (read_end, write_end) = pipe().context("Trouble creating pipe")?;

        let writer = self.spawn(|| {
            if let Err(e) = dup2(write_end, libc::STDOUT_FILENO) {
                child_fail("Trouble redirecting stdout", e);
            }
            let _ = close(read_end);
            let _ = close(write_end);
            first.exec("execvp in first command failed")
        });
        let writer = match writer {
            Ok(pid) => pid,
            Err(e) => {
                close_pipe(read_end, write_end);
                return Err(e);
            }
        };

        let reader = self.spawn(|| {
            let _ = close(write_end);
            if let Err(e) = dup2(read_end, libc::STDIN_FILENO) {
                child_fail("Trouble redirecting stdin", e);
            }
            let _ = close(read_end);
            second.exec("execvp in second command failed")
        });

        close_pipe(read_end, write_end);
        Ok(vec![writer, reader?])
    }

    fn run_redirect(&self, command: &Argv, target: &Argv, stream: Stream) -> Result<Vec<Pid>> {
        let Some(program) = Program::prepare(command) else {
            return Ok(Vec::new());
        };
        let path = ExecRequest::redirect_target(target).to_owned();

        let pid = self.spawn(|| {
            let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
            let fd = match open(path.as_str(), stream.open_flags(), mode) {
                Ok(fd) => fd,
                Err(e) => child_fail("Trouble opening file", e),
            };
            if let Err(e) = dup2(fd, stream.fd()) {
                let _ = close(fd);
                child_fail(stream.dup_error(), e);
            }
            let _ = close(fd);
            program.exec("exec failed")
        })?;
        Ok(vec![pid])
    }
}

fn close_pipe(read_end: RawFd, write_end: RawFd) {
    for fd in [read_end, write_end] {
        if let Err(e) = close(fd) {
            warn!(fd, error = %e, "failed to close pipe end");
        }
    }
}

/// Block until `pid` exits and translate its status into a shell exit code.
fn wait_for(pid: Pid) -> Option<ExitCode> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Some(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Some(128 + signal as i32),
            Ok(_) => continue,
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => {
                warn!(%pid, error = %e, "waitpid failed");
                return None;
            }
        }
    }
}

impl Executor for ForkExecutor {
    fn execute(&mut self, request: ExecRequest) -> Result<()> {
        reap(self.policy);

        debug!(shape = request.shape.kind(), background = request.background, "executing");
        let children = match &request.shape {
            Shape::Plain(argv) => self.run_plain(argv)?,
            Shape::Pipe { left, right } => self.run_pipe(left, right)?,
            Shape::RedirectOut { command, target } => {
                self.run_redirect(command, target, Stream::Output)?
            }
            Shape::RedirectIn { command, target } => {
                self.run_redirect(command, target, Stream::Input)?
            }
        };

        if !request.background {
            for pid in children {
                let code = wait_for(pid);
                debug!(%pid, ?code, "child finished");
            }
        }
        Ok(())
    }
}
