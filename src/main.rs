use clap::Parser;
use momentum_trader::cli::{run, Cli};
use momentum_trader::logging::init_logging;

fn main() -> std::process::ExitCode {
    init_logging();
    run(Cli::parse())
}
