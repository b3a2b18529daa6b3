//! Binary entrypoint for the `taskalign` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match taskalign::run(std::env::args()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(taskalign::EXIT_ERROR)
        }
    }
}
