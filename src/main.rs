// CLI binary entry point for spc2wav
//
// Parses the command line, runs one conversion and maps failures to exit
// status 1.

mod cli;

use clap::{error::ErrorKind as ClapErrorKind, CommandFactory, Parser};
use std::process;

use cli::{Config, Reporter};
use spc2wav::{ConvertError, ErrorKind};

fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    cli::output::init_logger(config.log_level());
    let reporter = Reporter::new(config.format.clone(), config.quiet);

    if let Err(err) = cli::command_convert(&config, &reporter) {
        reporter.print_error(&format!("{:#}", err));
        let kind = err.downcast_ref::<ConvertError>().map(|e| e.kind());
        if kind == Some(ErrorKind::Argument) {
            eprintln!("{}", Config::command().render_usage());
        }
        process::exit(1);
    }
}
