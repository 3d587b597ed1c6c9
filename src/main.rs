//! Binary entry point for the `bzip3` command-line tool.

use clap::error::ErrorKind;
use clap::Parser;

use bzip3::cli::{run, Cli};

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("bzip3: {err:#}");
        std::process::exit(1);
    }
}
