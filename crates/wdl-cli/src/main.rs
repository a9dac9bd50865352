mod cli;

use crate::cli::Cli;

fn main() {
    // Logging is initialized inside run_from_args: where logs go is itself
    // a CLI argument.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("wdl error: {:#}", err);
        std::process::exit(1);
    }
}
