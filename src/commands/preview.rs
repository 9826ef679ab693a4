//! Print payloads without sending them

use eyre::{Context, Result};

use super::read_results;
use policy_loki::config::Config;
use policy_loki::loki::Payload;

pub fn run(input: &str, config: &Config) -> Result<()> {
    let mut results = read_results(input)?;
    config.apply_priorities(&mut results);

    for result in &results {
        let payload = Payload::new(result);
        let json = serde_json::to_string(&payload).context("Failed to encode payload")?;
        println!("{}", json);
    }

    Ok(())
}
