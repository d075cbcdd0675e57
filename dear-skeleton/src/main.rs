use std::process::ExitCode;

use dear_skeleton::{AppConfig, logging, run};
use tracing::{error, info};

fn main() -> ExitCode {
    logging::init_tracing();
    info!("Starting dear-skeleton");

    match run(AppConfig::default()) {
        Ok(()) => {
            info!("dear-skeleton finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("dear-skeleton failed: {e}");
            ExitCode::from(1)
        }
    }
}
