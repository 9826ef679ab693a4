//! Push results to Loki

use colored::*;
use eyre::Result;
use std::time::Duration;

use super::read_results;
use policy_loki::config::Config;
use policy_loki::loki::Client;
use policy_loki::target;

/// Build a client from config, with `host` taking precedence
pub fn client(host: Option<&str>, config: &Config) -> Result<Client> {
    let host = host
        .or(config.loki.host.as_deref())
        .ok_or_else(|| eyre::eyre!("No Loki host configured; pass --host or set loki.host"))?;

    let client = match config.loki.timeout_secs {
        Some(secs) => Client::with_timeout(host, Duration::from_secs(secs)),
        None => Client::new(host),
    };

    Ok(client.with_minimum_priority(config.loki.minimum_priority))
}

pub fn run(input: &str, host: Option<&str>, quiet: bool, config: &Config) -> Result<()> {
    let client = client(host, config)?;

    let mut results = read_results(input)?;
    config.apply_priorities(&mut results);

    log::info!("Pushing {} results to {}", results.len(), client.endpoint());
    let sent = target::dispatch(&client, &results);
    let skipped = results.len() - sent;

    if !quiet {
        println!("{} Dispatched {} results to {}", "✓".green(), sent, client.endpoint().cyan());
        if skipped > 0 {
            println!("  {} below minimum priority", format!("{} skipped", skipped).yellow());
        }
    }

    Ok(())
}
