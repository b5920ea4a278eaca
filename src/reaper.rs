//! Drains the subtree, non-blockingly.
//!
//! Uses `nix::sys::wait::{waitpid, WaitStatus}` rather than raw
//! `libc::WIFEXITED`/`WEXITSTATUS` macros — the safe wrapper is a better fit
//! here since nothing downstream needs the raw `libc::c_int` status for an
//! `ExitStatus::from_raw` conversion.

use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::log::{log_debug, log_info};
use crate::state::RuntimeState;

/// Whether the subtree is known to be empty, or merely quiet for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapOutcome {
    /// `waitpid` reported "no children exist" — nothing left to drain.
    SubtreeEmpty,
    /// At least one descendant exists but none are ready to be reaped.
    MoreChildren,
}

/// Sentinel `exit_code` for "child's wait status was neither a normal exit
/// nor a signal death".
pub const UNKNOWN_WAIT_OUTCOME: i32 = -1;

/// Repeatedly collect terminated descendants until none are left ready.
///
/// If the primary child is among them, clears `state.child_pid` and
/// assigns `state.exit_code` exactly once.
pub fn reap(state: &mut RuntimeState) -> ReapOutcome {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => return ReapOutcome::MoreChildren,
            Err(nix::errno::Errno::ECHILD) => return ReapOutcome::SubtreeEmpty,
            Err(e) => {
                log_debug!("waitpid failed, treating subtree as drained: {e}");
                return ReapOutcome::SubtreeEmpty;
            }
            Ok(status) => handle_one(state, status),
        }
    }
}

fn handle_one(state: &mut RuntimeState, status: WaitStatus) {
    let Some(pid) = status.pid() else {
        // WaitStatus::StillAlive (handled by the caller) is the only
        // variant without a pid; unreachable in practice but not relied on.
        return;
    };
    let raw_pid = pid.as_raw();

    if Some(raw_pid) != state.child_pid {
        log_debug!("reaped orphan pid={raw_pid}");
        return;
    }

    state.child_pid = None;
    state.exit_code = match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, sig, _) => 0x80 | (sig as i32),
        _ => UNKNOWN_WAIT_OUTCOME,
    };
    log_info!(
        "Primary child (pid={raw_pid}) finished, exit code {}",
        state.exit_code
    );
}
