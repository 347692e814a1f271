//! Invoke command implementation
//!
//! Runs one ledger function against the configured store and prints its
//! payload to stdout.

use super::open_store;
use crate::core::{Ledger, Response};
use clap::Args;
use std::io::Write;

/// Arguments for the invoke command
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Function name (e.g. createPatientInformation, query, modifyDrugData)
    pub function: String,

    /// Positional string arguments passed to the function
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl InvokeArgs {
    /// Execute the invoke command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let ledger = Ledger::from_config(store, &config);
        let response = ledger.invoke(&self.function, self.args.clone()).await;
        Ok(report(&response)?)
    }
}

/// Writes a response to stdout/stderr and returns the exit code
fn report(response: &Response) -> std::io::Result<i32> {
    match response {
        Response::Success { payload } => {
            if !payload.is_empty() {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(payload)?;
                stdout.write_all(b"\n")?;
            }
            Ok(0)
        }
        Response::Error { kind, message } => {
            eprintln!("❌ {kind}: {message}");
            Ok(3)
        }
    }
}
