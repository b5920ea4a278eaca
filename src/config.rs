//! Command-line surface.
//!
//! Short flags match the original program byte for byte; long aliases are
//! added because every other CLI in this codebase exposes both,
//! and `clap` gives them for free. `-h`/malformed input both exit 1, not the
//! usual `0`/`2` clap defaults — this program treats "didn't run the
//! command as intended" as a single configuration-error outcome.

use clap::{CommandFactory, Parser};

/// Immutable configuration produced once, before the event loop starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub wait_for_children: bool,
    pub broadcast_sigterm_before_wait: bool,
    pub create_subproc_group: bool,
    pub forward_realtime_signals: bool,
    pub exit_on_sigint: bool,
    pub check_pid_1: bool,
    pub verbosity: u8,
    pub command: Option<Vec<String>>,
}

#[derive(Parser, Debug)]
#[command(
    name = "container-init",
    version,
    disable_help_flag = true,
    about = "A minimal PID 1 for containers: spawns a command, reaps zombies, forwards signals."
)]
struct Cli {
    /// Don't wait for all children (including inherited/orphaned ones) before exit.
    #[arg(short = 'W', long = "no-wait")]
    no_wait: bool,

    /// Don't broadcast SIGTERM before waiting for all children. Ignored when -W is used.
    #[arg(short = 'B', long = "no-broadcast-sigterm")]
    no_broadcast_sigterm: bool,

    /// Don't exit on SIGINT; exit only on SIGTERM. Ignored when a command is given.
    #[arg(short = 'I', long = "no-exit-on-sigint")]
    no_exit_on_sigint: bool,

    /// Run the command in its own process group and forward signals to the whole group.
    #[arg(short = 'g', long = "group")]
    create_subproc_group: bool,

    /// Forward realtime signals (SIGRTMIN..SIGRTMAX) to the command as well.
    #[arg(short = 'r', long = "realtime-signals")]
    forward_realtime_signals: bool,

    /// Don't check whether this process is running as pid 1.
    #[arg(short = 'D', long = "no-pid1-check")]
    no_check_pid_1: bool,

    /// Increase verbosity. Stackable: -v for info, -vv for debug.
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print this help message.
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Command to run, and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Parse `argv`, printing usage and exiting 1 on `-h` or any parse error.
///
/// Never returns on failure, matching the original `print_help_exit`, which
/// also never returns. An unknown flag or other malformed input prints the
/// same full help text `-h` does (not clap's default abbreviated usage
/// line), matching the original's behavior of routing every parse failure
/// through the same help-then-exit path as `-h`.
pub fn parse() -> Config {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap's own DisplayHelp/DisplayVersion exit with 0; this program
            // always exits 1 on anything other than a clean run.
            let _ = e.print();
            let mut cmd = <Cli as clap::CommandFactory>::command();
            let _ = cmd.print_long_help();
            println!();
            std::process::exit(1);
        }
    };

    if cli.help {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        let _ = cmd.print_long_help();
        println!();
        std::process::exit(1);
    }

    Config {
        wait_for_children: !cli.no_wait,
        broadcast_sigterm_before_wait: !cli.no_broadcast_sigterm,
        create_subproc_group: cli.create_subproc_group,
        forward_realtime_signals: cli.forward_realtime_signals,
        exit_on_sigint: !cli.no_exit_on_sigint,
        check_pid_1: !cli.no_check_pid_1,
        verbosity: cli.verbose,
        command: if cli.command.is_empty() {
            None
        } else {
            Some(cli.command)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("container-init").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_have_no_command() {
        let cli = parse_args(&[]);
        assert!(cli.command.is_empty());
    }

    #[test]
    fn disable_flags_are_off_by_default() {
        let cli = parse_args(&[]);
        assert!(!cli.no_wait);
        assert!(!cli.no_broadcast_sigterm);
        assert!(!cli.no_exit_on_sigint);
        assert!(!cli.create_subproc_group);
        assert!(!cli.forward_realtime_signals);
        assert!(!cli.no_check_pid_1);
    }

    #[test]
    fn verbosity_is_stackable() {
        assert_eq!(parse_args(&["-v"]).verbose, 1);
        assert_eq!(parse_args(&["-vv"]).verbose, 2);
        assert_eq!(parse_args(&["-vvvv"]).verbose, 4);
    }

    #[test]
    fn trailing_command_captures_hyphen_args() {
        let cli = parse_args(&["-g", "--", "sleep", "--", "100"]);
        assert!(cli.create_subproc_group);
        assert_eq!(cli.command, vec!["sleep", "--", "100"]);
    }

    #[test]
    fn command_args_starting_with_hyphen_are_preserved() {
        let cli = parse_args(&["bash", "-c", "echo hi"]);
        assert_eq!(cli.command, vec!["bash", "-c", "echo hi"]);
    }
}
