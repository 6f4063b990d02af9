use clap::Parser;
use tradelens::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
