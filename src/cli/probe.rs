// src/cli/probe.rs
use crate::digitization::api::OcrApiClient;

use super::CliError;

pub async fn run(base_url: String) -> Result<(), CliError> {
    let client = OcrApiClient::new(&base_url)?;
    let status = client.probe().await?;
    println!("{} is reachable (HTTP {})", client.base_url(), status);
    Ok(())
}
