use clap::Parser;
use signalbt::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
