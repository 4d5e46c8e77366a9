use signature_common::{error_message, Colorize};
use std::process::ExitCode;
use tracer_signature::cli;

pub fn main() -> ExitCode {
    match cli::process_command() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_message!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
