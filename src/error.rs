//! Errors that abort startup before the event loop runs.
//!
//! Transient kernel errors during routing (a forward-send racing a child
//! that already vanished, a `tcsetpgrp` without a controlling terminal) are
//! deliberately absent here: those are swallowed at the point they occur and
//! never become a `Result`. Likewise, a failed group-setup call or exec once
//! the child already exists exits the child with code 1 rather than
//! appearing here — only a failed `fork()` itself (no child at all) is
//! represented below.

/// Fatal errors from configuration and process setup.
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("{0}")]
    Config(String),

    #[error("not running as pid 1 (use -D to skip this check)")]
    NotPid1,

    #[error("sigprocmask: {0}")]
    SigProcMask(#[source] std::io::Error),

    #[error("sigwait: {0}")]
    SigWait(#[source] std::io::Error),

    #[error("fork: {0}")]
    Fork(#[source] std::io::Error),
}
