use std::process::ExitCode;

use filetrack::{TrackerError, ValidationError};

/// Validation failures exit with 2, anything else with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    let is_validation = err
        .downcast_ref::<TrackerError>()
        .is_some_and(TrackerError::is_validation)
        || err.downcast_ref::<ValidationError>().is_some();
    if is_validation {
        2
    } else {
        1
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match filetrack::app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == 2 {
                eprintln!("{err}");
            } else {
                log::error!("{err:#}");
                eprintln!("Error: {err:#}");
            }
            ExitCode::from(code)
        }
    }
}
