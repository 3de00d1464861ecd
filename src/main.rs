use clap::Parser;
use foliolab::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
