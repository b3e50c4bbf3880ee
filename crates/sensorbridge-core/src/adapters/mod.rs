mod hobolink;
mod imonnit;

pub use hobolink::{ApiRequest, Authentication, HobolinkAdapter, Observation, Observations, Query};
pub use imonnit::{ImonnitAdapter, NetworkDetail, NetworkList, SensorDetail, SensorList};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::decode::decode_reading;
use crate::http_client::{HttpClient, HttpRequest};
use crate::vendor::VendorError;
use crate::{RawReading, ReadingGroup, VendorId};

/// Status every vendor endpoint answers with on success.
pub const EXPECTED_STATUS: u16 = 200;

/// Sends one request and decodes the JSON envelope. No retry.
///
/// `endpoint` is a log label; URLs may embed credentials and are not logged.
async fn execute_json<T: DeserializeOwned>(
    vendor: VendorId,
    endpoint: &str,
    http_client: &dyn HttpClient,
    request: HttpRequest,
) -> Result<T, VendorError> {
    debug!(vendor = %vendor, endpoint, "sending request");

    let response = http_client
        .execute(request)
        .await
        .map_err(|error| VendorError::transport(vendor, &error))?;

    if !response.is_success() {
        return Err(VendorError::status(vendor, response.status, EXPECTED_STATUS));
    }

    serde_json::from_str(&response.body)
        .map_err(|error| VendorError::decode(vendor, format!("{endpoint}: {error}")))
}

/// Reading groups for a raw reading, whichever shape the vendor delivered.
fn reading_groups(reading: &RawReading) -> Vec<ReadingGroup> {
    match reading {
        RawReading::Text(text) => decode_reading(text),
        RawReading::Numeric(readings) => vec![ReadingGroup::untagged(readings.clone())],
    }
}

fn join_url(server: &str, path: &str) -> String {
    format!("{}/{}", server.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodedReading, FieldValue};

    #[test]
    fn join_url_avoids_double_slashes() {
        assert_eq!(
            join_url("https://www.imonnit.com/json/", "/sensorlist/abc"),
            "https://www.imonnit.com/json/sensorlist/abc"
        );
    }

    #[test]
    fn numeric_readings_form_one_untagged_group() {
        let reading = RawReading::Numeric(vec![DecodedReading::new(
            "si_value",
            FieldValue::Measured(1.0),
            "°C",
        )]);

        let groups = reading_groups(&reading);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].unit_tag, None);
    }

    #[test]
    fn text_readings_go_through_the_decoder() {
        let groups = reading_groups(&RawReading::Text(String::from("1 kWh, Avg 1 A, Max 1 A, Min 1 A")));
        assert_eq!(groups.len(), 2);
    }
}
