//! The process-wide runtime record.
//!
//! Everything here is owned by `main`'s event loop and threaded through the
//! reaper, router, and sequencer by `&mut` reference — there is exactly one
//! thread of control, so no synchronization is needed.

/// Runtime state mutated by the reaper, router, and sequencer.
pub struct RuntimeState {
    /// Pid of the primary child, or `None` once it has been reaped (or if
    /// no command was configured at all).
    pub child_pid: Option<libc::pid_t>,
    /// Status this process will itself exit with. Assigned at most once,
    /// when the primary child is reaped.
    pub exit_code: i32,
    /// Latched true the first time a termination-class signal is observed.
    /// Never cleared.
    pub exit_signal_received: bool,
    /// Index of the next shutdown step to evaluate.
    pub step_cursor: usize,
    /// True only the first time the step at `step_cursor` is evaluated.
    pub first_try: bool,
}

impl RuntimeState {
    pub fn new(child_pid: Option<libc::pid_t>) -> Self {
        Self {
            child_pid,
            exit_code: 0,
            exit_signal_received: false,
            step_cursor: 0,
            first_try: true,
        }
    }
}
