//! A minimal PID 1 for containers.
//!
//! Spawns a user-specified command as a child, forwards signals to it,
//! reaps every process that terminates under its subtree — including
//! orphans it never spawned directly but the kernel re-parented onto it —
//! and exits with a well-defined status only once the subtree has fully
//! quiesced. Signal handling and zombie reaping follow the same patterns as
//! [tini](https://github.com/krallin/tini) and its relative
//! `pasztorpisti/docker-container-init`, which this program's state
//! machine is a direct port of.
//!
//! Startup sequence:
//! 1. Parse arguments into an immutable [`config::Config`].
//! 2. Check we are PID 1, unless `-D` was given.
//! 3. Install the signal gate (block `used_sigmask`, capture `orig_sigmask`).
//! 4. If a command was configured, fork+exec it (the signal gate's captured
//!    mask is restored in the child before exec).
//! 5. Run the event loop: alternately advance the shutdown sequencer and,
//!    if it isn't done, synchronously dequeue and route the next signal.
//! 6. Exit with `state.exit_code`.

mod config;
mod error;
mod gate;
mod launcher;
mod log;
mod reaper;
mod router;
mod sequencer;
mod state;

use error::SetupError;
use log::{log_error, log_info};
use state::RuntimeState;

fn check_pid_1(config: &config::Config) -> Result<(), SetupError> {
    if config.check_pid_1 && std::process::id() != 1 {
        return Err(SetupError::NotPid1);
    }
    Ok(())
}

fn run() -> Result<i32, SetupError> {
    let config = config::parse();
    log::set_verbosity(config.verbosity);

    check_pid_1(&config)?;

    let (used_sigmask, orig_sigmask) = gate::install(&config)?;

    let child_pid = match &config.command {
        Some(argv) => Some(launcher::spawn(argv, config.create_subproc_group, orig_sigmask)?),
        None => None,
    };

    let mut state = RuntimeState::new(child_pid);

    loop {
        if sequencer::advance(&mut state, &config) {
            break;
        }
        // Fetch signals until one is meaningful; the sequencer is only
        // re-entered after that.
        loop {
            let signum = gate::wait_for_signal(&used_sigmask)?;
            if router::route(signum, &mut state, &config) {
                break;
            }
        }
    }

    log_info!("Finished.");
    Ok(state.exit_code)
}

fn main() {
    match run() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            log_error!("{e}");
            std::process::exit(1);
        }
    }
}
