use std::process;

use tfdeps::cli::{Args, Command};
use tfdeps::error::TfdepsError;

fn main() {
    // clap exits with 2 on usage errors; tfdeps reports every usage error as 1
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(err) => {
            let exit_code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(exit_code);
        }
    };

    setup_logging(args.verbose, args.quiet);

    let command = Command::from_args(args);
    process::exit(run_command(command));
}

/// Log to stderr. `RUST_LOG` overrides the level picked from the flags.
fn setup_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose {
            "debug"
        } else {
            "warn"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the command and map any fatal error to exit code 1
fn run_command(command: Command) -> i32 {
    match command.execute() {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    }
}

fn report_error(err: &TfdepsError) {
    eprintln!("Error: {}", err.user_message());
    if let Some(suggestion) = err.suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }
    tracing::debug!(severity = %err.severity(), "fatal error: {:?}", err);
}
