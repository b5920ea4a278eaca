//! A fixed, ordered list of shutdown predicates.
//!
//! Represented as a typed array of step functions: each step is
//! `fn(&mut RuntimeState, &Config, bool) -> bool`, called with `first_try`
//! true only on its first evaluation, used solely for a one-shot log line.

use crate::config::Config;
use crate::log::log_info;
use crate::reaper::{ReapOutcome, reap};
use crate::state::RuntimeState;

type Step = fn(&mut RuntimeState, &Config, bool) -> bool;

const STEPS: [Step; 4] = [
    child_finished,
    exit_signal_observed,
    broadcast_terminate,
    subtree_drained,
];

fn child_finished(state: &mut RuntimeState, config: &Config, first_try: bool) -> bool {
    if config.command.is_none() {
        return true;
    }
    if first_try {
        log_info!("Waiting for subprocess (pid={:?}) to finish...", state.child_pid);
    }
    state.child_pid.is_none()
}

fn exit_signal_observed(state: &mut RuntimeState, config: &Config, first_try: bool) -> bool {
    if config.command.is_some() {
        return true;
    }
    if first_try {
        log_info!(
            "Waiting for SIGTERM{} to exit...",
            if config.exit_on_sigint { "/SIGINT" } else { "" }
        );
    }
    state.exit_signal_received
}

fn broadcast_terminate(_state: &mut RuntimeState, config: &Config, _first_try: bool) -> bool {
    if config.wait_for_children && config.broadcast_sigterm_before_wait {
        log_info!("Broadcasting SIGTERM before waiting for children");
        // SAFETY: kill(-1, ...) targets every process the caller may
        // signal; failures (no permitted targets) are not actionable.
        unsafe {
            libc::kill(-1, libc::SIGTERM);
        }
    }
    true
}

fn subtree_drained(state: &mut RuntimeState, config: &Config, first_try: bool) -> bool {
    if !config.wait_for_children {
        return true;
    }
    if first_try {
        log_info!("Waiting for child processes to finish...");
    }
    reap(state) == ReapOutcome::SubtreeEmpty
}

/// Advance `state.step_cursor` as far as it will go. Returns true once every
/// step has returned true (the process should now exit with `exit_code`).
pub fn advance(state: &mut RuntimeState, config: &Config) -> bool {
    while let Some(&step) = STEPS.get(state.step_cursor) {
        let done = step(state, config, state.first_try);
        state.first_try = false;
        if !done {
            return false;
        }
        state.step_cursor += 1;
        state.first_try = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(has_command: bool, wait: bool, broadcast: bool) -> Config {
        Config {
            wait_for_children: wait,
            broadcast_sigterm_before_wait: broadcast,
            create_subproc_group: false,
            forward_realtime_signals: false,
            exit_on_sigint: true,
            check_pid_1: true,
            verbosity: 0,
            command: has_command.then(|| vec!["true".to_string()]),
        }
    }

    #[test]
    fn no_command_blocks_on_exit_signal_then_completes() {
        let mut state = RuntimeState::new(None);
        let config = config(false, false, false);
        assert!(!advance(&mut state, &config));
        assert_eq!(state.step_cursor, 1);

        state.exit_signal_received = true;
        assert!(advance(&mut state, &config));
        assert_eq!(state.step_cursor, STEPS.len());
    }

    #[test]
    fn with_command_blocks_until_child_reaped() {
        let mut state = RuntimeState::new(Some(123));
        let config = config(true, false, false);
        assert!(!advance(&mut state, &config));
        assert_eq!(state.step_cursor, 0);

        state.child_pid = None;
        assert!(advance(&mut state, &config));
    }

    #[test]
    fn no_wait_skips_drain_step() {
        let mut state = RuntimeState::new(None);
        state.exit_signal_received = true;
        let config = config(false, false, false);
        assert!(advance(&mut state, &config));
    }
}
