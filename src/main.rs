//! Binary entrypoint for the `issuelink` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Tokens may live in a local .env file.
    dotenvy::dotenv().ok();

    match issuelink::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
