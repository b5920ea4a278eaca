//! Turns one dequeued signal into an effect on runtime state.

use crate::config::Config;
use crate::log::{log_debug, log_info};
use crate::reaper::reap;
use crate::state::RuntimeState;

/// Route one dequeued signal. Returns whether the shutdown sequencer should
/// re-evaluate its steps ("meaningful").
pub fn route(signum: libc::c_int, state: &mut RuntimeState, config: &Config) -> bool {
    match signum {
        libc::SIGCHLD => {
            reap(state);
            true
        }
        libc::SIGTERM => {
            log_info!("Received SIGTERM");
            forward(signum, state, config);
            state.exit_signal_received = true;
            true
        }
        libc::SIGINT => {
            if config.command.is_some() {
                forward(signum, state, config);
                false
            } else if config.exit_on_sigint {
                state.exit_signal_received = true;
                true
            } else {
                false
            }
        }
        other => {
            forward(other, state, config);
            false
        }
    }
}

/// Forward `signum` to the child, or its whole process group if configured.
/// Failures (the child already gone) are swallowed.
fn forward(signum: libc::c_int, state: &RuntimeState, config: &Config) {
    let Some(pid) = state.child_pid else {
        return;
    };
    // SAFETY: pid/group id are plain integers; kill()/killpg-by-negation
    // tolerate a vanished target by returning ESRCH, which we ignore.
    let target = if config.create_subproc_group { -pid } else { pid };
    log_debug!("Forwarding signal={signum} to pid={target}");
    unsafe {
        libc::kill(target, signum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: Option<Vec<&str>>, group: bool, exit_on_sigint: bool) -> Config {
        Config {
            wait_for_children: true,
            broadcast_sigterm_before_wait: true,
            create_subproc_group: group,
            forward_realtime_signals: false,
            exit_on_sigint,
            check_pid_1: true,
            verbosity: 0,
            command: command.map(|v| v.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn sigterm_latches_and_is_meaningful_regardless_of_command() {
        let mut state = RuntimeState::new(None);
        let meaningful = route(libc::SIGTERM, &mut state, &config(None, false, true));
        assert!(meaningful);
        assert!(state.exit_signal_received);
    }

    #[test]
    fn sigint_without_command_latches_when_exit_on_sigint() {
        let mut state = RuntimeState::new(None);
        let meaningful = route(libc::SIGINT, &mut state, &config(None, false, true));
        assert!(meaningful);
        assert!(state.exit_signal_received);
    }

    #[test]
    fn sigint_without_command_is_ignored_when_disabled() {
        let mut state = RuntimeState::new(None);
        let meaningful = route(libc::SIGINT, &mut state, &config(None, false, false));
        assert!(!meaningful);
        assert!(!state.exit_signal_received);
    }

    #[test]
    fn sigint_with_command_never_latches_here() {
        let mut state = RuntimeState::new(Some(1));
        let meaningful = route(libc::SIGINT, &mut state, &config(Some(vec!["sleep"]), false, true));
        assert!(!meaningful);
        assert!(!state.exit_signal_received);
    }

    #[test]
    fn other_signal_in_mask_is_never_meaningful() {
        let mut state = RuntimeState::new(None);
        let meaningful = route(libc::SIGHUP, &mut state, &config(None, false, true));
        assert!(!meaningful);
    }
}
