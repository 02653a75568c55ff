//! Main application entry point.

use clap::Parser;
use jackpatch_app::CliArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();
    log::info!("Starting Jackpatch");

    match pollster::block_on(jackpatch_app::run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
