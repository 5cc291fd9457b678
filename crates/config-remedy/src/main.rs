//! Binary entry point for the config-remedy CLI

use std::process::ExitCode;

fn main() -> ExitCode {
    match config_remedy::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
