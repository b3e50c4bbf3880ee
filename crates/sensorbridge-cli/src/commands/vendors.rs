use std::process::ExitCode;

use sensorbridge_core::config::SAMPLE_CONFIG;
use sensorbridge_core::VendorId;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct VendorInfo {
    id: VendorId,
    description: &'static str,
    default_server: &'static str,
}

fn vendor_infos() -> Vec<VendorInfo> {
    VendorId::ALL
        .into_iter()
        .map(|id| VendorInfo {
            id,
            description: id.description(),
            default_server: id.default_server(),
        })
        .collect()
}

pub fn list() -> Result<ExitCode, CliError> {
    println!("{}", serde_json::to_string_pretty(&vendor_infos())?);
    Ok(ExitCode::SUCCESS)
}

pub fn sample_config() -> Result<ExitCode, CliError> {
    print!("{SAMPLE_CONFIG}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_vendor() {
        let value = serde_json::to_value(vendor_infos()).expect("serializable");

        assert_eq!(value[0]["id"], "hobolink");
        assert_eq!(value[1]["id"], "imonnit");
        assert_eq!(value[1]["default_server"], "https://www.imonnit.com/json");
    }
}
