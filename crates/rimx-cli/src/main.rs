use rimx_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // File log under XDG state, stderr if that fails.
    logging::init();

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("rimx error: {:#}", err);
        std::process::exit(1);
    }
}
