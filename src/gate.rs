//! Makes signal delivery synchronous.
//!
//! Blocks, at the process level, every signal the event loop cares about, so
//! it can be fetched one at a time via [`wait_for_signal`] instead of
//! arriving asynchronously in a handler. Uses raw `libc` sigset operations —
//! the same primitives `guest-init::pid1` uses for its own (handler-based)
//! signal setup — rather than `nix`'s `SigSet`, because the realtime range
//! (`SIGRTMIN..=SIGRTMAX`) has no representation in `nix::sys::signal::Signal`.

use crate::config::Config;
use crate::error::SetupError;

const STANDARD_SIGNALS: [libc::c_int; 7] = [
    libc::SIGHUP,
    libc::SIGINT,
    libc::SIGQUIT,
    libc::SIGUSR1,
    libc::SIGUSR2,
    libc::SIGTERM,
    libc::SIGCHLD,
];

fn empty_sigset() -> libc::sigset_t {
    // SAFETY: `set` is a plain-old-data buffer; sigemptyset initializes it.
    unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        set
    }
}

/// Build the set of signals the event loop dequeues: the standard set plus,
/// if enabled, the realtime range.
pub fn used_sigmask(config: &Config) -> libc::sigset_t {
    let mut set = empty_sigset();
    // SAFETY: `set` was just initialized by sigemptyset; signal numbers are
    // constants or within the kernel-reported realtime range.
    unsafe {
        for &sig in &STANDARD_SIGNALS {
            libc::sigaddset(&mut set, sig);
        }
        if config.forward_realtime_signals {
            for sig in libc::SIGRTMIN()..=libc::SIGRTMAX() {
                libc::sigaddset(&mut set, sig);
            }
        }
    }
    set
}

/// Install the gate: block `used_sigmask` at the process level, returning
/// the mask that was in effect before (`orig_sigmask`, captured for the
/// child to be started with) alongside the mask that was installed.
///
/// Additionally, and unconditionally, blocks `SIGTTOU` so that a child
/// placed in its own process group can claim the controlling terminal's
/// foreground group before exec. This second block is intentionally *not*
/// reflected in the returned `orig_sigmask`.
pub fn install(config: &Config) -> Result<(libc::sigset_t, libc::sigset_t), SetupError> {
    let used = used_sigmask(config);
    let mut orig = empty_sigset();

    // SAFETY: `used`/`orig` are valid sigset_t values; SIG_BLOCK only adds bits.
    let rc = unsafe { libc::sigprocmask(libc::SIG_BLOCK, &used, &mut orig) };
    if rc != 0 {
        return Err(SetupError::SigProcMask(std::io::Error::last_os_error()));
    }

    let mut ttou_only = empty_sigset();
    // SAFETY: ttou_only was just initialized.
    unsafe {
        libc::sigaddset(&mut ttou_only, libc::SIGTTOU);
    }
    // SAFETY: ttou_only is a valid sigset_t; passing NULL for oldset is fine,
    // we don't need to observe it.
    let rc = unsafe { libc::sigprocmask(libc::SIG_BLOCK, &ttou_only, std::ptr::null_mut()) };
    if rc != 0 {
        return Err(SetupError::SigProcMask(std::io::Error::last_os_error()));
    }

    Ok((used, orig))
}

/// Synchronously dequeue the next pending signal from `mask`. Blocks until
/// one arrives; never invoked from a handler context.
pub fn wait_for_signal(mask: &libc::sigset_t) -> Result<libc::c_int, SetupError> {
    let mut signum: libc::c_int = 0;
    // SAFETY: mask is a valid, previously-blocked sigset_t; signum is
    // written to on success (return value 0).
    let rc = unsafe { libc::sigwait(mask, &mut signum) };
    if rc != 0 {
        return Err(SetupError::SigWait(std::io::Error::from_raw_os_error(rc)));
    }
    Ok(signum)
}
