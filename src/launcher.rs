//! Builds the primary child: correct process-group, terminal, and
//! signal-mask state, then the program image is replaced.
//!
//! Built on raw `libc::fork`/`libc::execvp` rather than
//! `std::process::Command`'s `pre_exec`: `Command::spawn` reports *any*
//! failure inside its pre-exec closure, or the exec itself, back to the
//! parent as a `Result::Err` via an internal pipe, which would collapse two
//! outcomes that must stay distinct — a failed `fork()` (fatal, no child
//! exists at all) versus a failed group-setup or exec call once the child
//! already exists (non-fatal: the child simply exits with code 1 and is
//! reaped normally by the caller's event loop). Keeping the exec and
//! group-setup calls entirely inside the forked child, with failures there
//! handled by `_exit(1)` instead of an early return, preserves that split.

use std::ffi::CString;

use nix::unistd::{Pid, tcsetpgrp};

use crate::error::SetupError;
use crate::log::{log_error, log_info};

/// Spawn the primary child, returning its pid.
///
/// `argv` is the configured command (`argv[0]` resolved via `PATH`, the
/// rest passed verbatim). `orig_sigmask` is the mask captured by the gate
/// before it installed its own block; the child must run with that mask
/// restored, not the gate's blocked mask.
pub fn spawn(
    argv: &[String],
    create_group: bool,
    orig_sigmask: libc::sigset_t,
) -> Result<libc::pid_t, SetupError> {
    log_info!("Spawning subprocess...");

    let c_args = argv
        .iter()
        .map(|s| to_cstring(s))
        .collect::<Result<Vec<_>, _>>()?;
    let (c_program, _) = c_args
        .split_first()
        .ok_or_else(|| SetupError::Config("command is empty".into()))?;
    let mut c_argv: Vec<*const libc::c_char> = c_args.iter().map(|s| s.as_ptr()).collect();
    c_argv.push(std::ptr::null());

    // SAFETY: fork() is called here before any threads exist (this runs
    // once, before the event loop starts), so it is safe.
    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(SetupError::Fork(std::io::Error::last_os_error()));
    }
    if pid == 0 {
        run_child(create_group, orig_sigmask, c_program, &c_argv);
    }

    Ok(pid)
}

fn to_cstring(s: &str) -> Result<CString, SetupError> {
    CString::new(s).map_err(|_| SetupError::Config(format!("argument contains a NUL byte: {s:?}")))
}

/// Runs in the forked child: group creation, terminal foreground
/// reassignment, signal-mask restore, then exec. Never returns — any
/// failure along the way exits the child with code 1 rather than
/// propagating back to the parent, so the parent observes it as a normal
/// termination via the reaper instead of a setup error.
fn run_child(
    create_group: bool,
    orig_sigmask: libc::sigset_t,
    program: &CString,
    argv: &[*const libc::c_char],
) -> ! {
    if let Err(e) = child_setup(create_group, orig_sigmask) {
        log_error!("child setup failed: {e}");
        // SAFETY: _exit bypasses atexit/stdio flushing in the forked child.
        unsafe { libc::_exit(1) };
    }

    // SAFETY: program/argv are valid, NUL-terminated C strings with a
    // null-terminated pointer array, built in the parent before fork();
    // execvp only returns on failure.
    unsafe {
        libc::execvp(program.as_ptr(), argv.as_ptr());
    }
    log_error!("exec failed: {}", std::io::Error::last_os_error());
    // SAFETY: see above.
    unsafe { libc::_exit(1) };
}

/// Group creation, terminal reassignment, and mask restore — run in the
/// forked child, between `fork` and `exec`.
fn child_setup(create_group: bool, orig_sigmask: libc::sigset_t) -> std::io::Result<()> {
    if create_group {
        nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
            .map_err(std::io::Error::from)?;

        let pgrp = nix::unistd::getpgrp();
        match tcsetpgrp(std::io::stdin(), pgrp) {
            Ok(()) => {}
            // No controlling terminal: benign, containers typically lack one.
            Err(nix::errno::Errno::ENOTTY) => {}
            Err(e) => return Err(std::io::Error::from(e)),
        }
    }

    // Restore the mask the gate captured, only now that the possible
    // tcsetpgrp() call above has had SIGTTOU blocked available to it.
    // SAFETY: orig_sigmask was captured by a prior successful sigprocmask
    // call; SIG_SETMASK replaces the child's mask wholesale.
    let rc = unsafe { libc::sigprocmask(libc::SIG_SETMASK, &orig_sigmask, std::ptr::null_mut()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orig_mask() -> libc::sigset_t {
        // SAFETY: a zeroed, empty mask is a valid sigset_t to pass as the
        // "restore to this" mask in these tests (no signals were blocked).
        unsafe {
            let mut set: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut set);
            set
        }
    }

    #[test]
    fn spawn_true_exits_zero() {
        let argv = vec!["true".to_string()];
        let pid = spawn(&argv, false, orig_mask()).expect("spawn true");

        let status = nix::sys::wait::waitpid(Pid::from_raw(pid), None).expect("waitpid");
        assert_eq!(status, nix::sys::wait::WaitStatus::Exited(Pid::from_raw(pid), 0));
    }

    #[test]
    fn spawn_nonexistent_program_fails_in_child_not_parent() {
        let argv = vec!["/nonexistent/not-a-real-binary".to_string()];
        // spawn() itself succeeds (fork succeeded); the exec failure only
        // surfaces once the child is reaped, as a normal exit with code 1 —
        // it never becomes a `Result::Err` out of `spawn()` itself.
        let pid = spawn(&argv, false, orig_mask()).expect("spawn records a pid even if exec later fails");

        let status = nix::sys::wait::waitpid(Pid::from_raw(pid), None).expect("waitpid");
        assert_eq!(status, nix::sys::wait::WaitStatus::Exited(Pid::from_raw(pid), 1));
    }
}
