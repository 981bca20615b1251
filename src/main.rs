mod cli;
mod config;
mod modules;
mod source;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::StdViewCli::parse();

    init_logging(cli.verbose);

    match cli::run(cli) {
        Ok(_) => ExitCode::from(0),
        Err(err) => {
            println!("{err}");
            ExitCode::from(1)
        }
    }
}
