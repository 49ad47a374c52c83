mod cli;
mod driver;
mod editor;
mod logger;
mod report;

use std::process::ExitCode;

use crate::cli::Cli;
use crate::driver::Driver;

fn main() -> ExitCode {
    let cli = <Cli as clap::Parser>::parse();
    logger::init(cli.verbose);

    match Driver::from_config(cli) {
        Ok(driver) => driver.run(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
