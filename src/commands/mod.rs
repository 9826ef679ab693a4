//! Command implementations

pub mod endpoint;
pub mod preview;
pub mod push;

use eyre::{Context, Result};
use std::fs;
use std::io::Read;

use policy_loki::report::{self, PolicyResult};

/// Read results from a file path, or stdin when `input` is `-`
pub fn read_results(input: &str) -> Result<Vec<PolicyResult>> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read results from stdin")?;
        buf
    } else {
        fs::read_to_string(input).context(format!("Failed to read results from {}", input))?
    };

    let results = report::parse_results(&content).context("Failed to parse results")?;
    log::debug!("Read {} results from {}", results.len(), input);
    Ok(results)
}
