use std::process::ExitCode;

use sensorbridge_core::adapters::NetworkDetail;
use sensorbridge_core::{ImonnitAdapter, VendorId};
use serde::Serialize;

use crate::cli::ConfigArgs;
use crate::error::CliError;

use super::load_config;

#[derive(Debug, Serialize)]
struct AccountNetworks {
    server: String,
    networks: Vec<NetworkDetail>,
}

pub async fn run(args: &ConfigArgs) -> Result<ExitCode, CliError> {
    let config = load_config(args)?;

    let inputs = config
        .inputs
        .iter()
        .filter(|input| input.vendor == VendorId::Imonnit)
        .collect::<Vec<_>>();
    if inputs.is_empty() {
        return Err(CliError::Command(String::from(
            "configuration has no imonnit input",
        )));
    }

    let mut accounts = Vec::with_capacity(inputs.len());
    for input in inputs {
        let adapter = ImonnitAdapter::new(input.server(), input.token.as_str(), input.http_timeout)?;
        let networks = adapter.network_list().await?;
        accounts.push(AccountNetworks {
            server: adapter.server().to_owned(),
            networks: networks.result,
        });
    }

    println!("{}", serde_json::to_string_pretty(&accounts)?);
    Ok(ExitCode::SUCCESS)
}
