use eyre::Result;

use policy_loki::config::Config;

pub fn run(host: Option<&str>, config: &Config) -> Result<()> {
    let client = super::push::client(host, config)?;
    println!("{}", client.endpoint());
    Ok(())
}
