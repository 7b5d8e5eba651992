use simchef_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Log to the state dir if we can, stderr otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("simchef error: {:#}", err);
        std::process::exit(1);
    }
}
