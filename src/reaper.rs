//! Collection of finished background children.
//!
//! Background children are never waited for when they are started. Instead,
//! the executor calls [`reap`] before creating each new process.

use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{debug, trace};

/// How many finished children to collect before each new command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReapPolicy {
    /// At most one zombie per command. Zombies can pile up when many
    /// background commands finish between two foreground ones.
    #[default]
    One,
    /// Every child that has already finished.
    Sweep,
}

/// Collect finished children without blocking. Returns how many were collected.
pub fn reap(policy: ReapPolicy) -> usize {
    let mut collected = 0;
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
            Ok(status) => {
                debug!(?status, "reaped background child");
                collected += 1;
            }
            Err(e) => {
                trace!(error = %e, "waitpid failed while reaping");
                break;
            }
        }
        if policy == ReapPolicy::One {
            break;
        }
    }
    collected
}
