use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::tags::TagExtractor;
use crate::vendor::{QueryMode, QueryTarget, VendorError, VendorSource};
use crate::{DeviceId, NormalizedObservation, RawObservation, RawReading, ValidationError, VendorId};

use super::{execute_json, join_url, reading_groups};

/// Response envelope of `sensorlist`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorList {
    #[serde(rename = "Method", default)]
    pub method: String,
    #[serde(rename = "Result")]
    pub result: Vec<SensorDetail>,
}

/// One sensor with its latest reading as display text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorDetail {
    #[serde(rename = "SensorID")]
    pub sensor_id: i64,
    #[serde(rename = "SensorName")]
    pub sensor_name: String,
    #[serde(rename = "CurrentReading")]
    pub current_reading: String,
    #[serde(rename = "Status", default)]
    pub status: Option<i64>,
    #[serde(rename = "BatteryLevel", default)]
    pub battery_level: Option<i64>,
    #[serde(rename = "SignalStrength", default)]
    pub signal_strength: Option<i64>,
    #[serde(rename = "LastCommunicateDate", alias = "LastCommunicationDate", default)]
    pub last_communication_date: Option<String>,
}

impl SensorDetail {
    fn into_raw(self) -> Result<RawObservation, ValidationError> {
        let device_id = DeviceId::parse(&self.sensor_id.to_string())?;
        let mut raw = RawObservation::new(
            device_id,
            self.sensor_name,
            RawReading::Text(self.current_reading),
        );

        let optional = [
            ("status", self.status.map(|value| value.to_string())),
            ("battery_level", self.battery_level.map(|value| value.to_string())),
            ("signal_strength", self.signal_strength.map(|value| value.to_string())),
            ("last_communication_date", self.last_communication_date),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                raw = raw.with_metadata(key, value);
            }
        }

        Ok(raw)
    }
}

/// Response envelope of `networklist`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkList {
    #[serde(rename = "Method", default)]
    pub method: String,
    #[serde(rename = "Result")]
    pub result: Vec<NetworkDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDetail {
    #[serde(rename = "NetworkID")]
    pub network_id: i64,
    #[serde(rename = "NetworkName", default)]
    pub network_name: String,
    #[serde(rename = "SendNotifications", default)]
    pub send_notifications: bool,
    #[serde(rename = "ExternalAccessUntil", default)]
    pub external_access_until: Option<String>,
}

/// Adapter for the iMonnit JSON API.
///
/// The account token is part of the URL path. Sensors are listed in one call
/// and filtered locally.
#[derive(Clone)]
pub struct ImonnitAdapter {
    http_client: Arc<dyn HttpClient>,
    server: String,
    token: String,
    timeout: Duration,
    extractor: TagExtractor,
}

impl ImonnitAdapter {
    /// Builds the adapter together with its HTTP client.
    pub fn new(server: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let http_client = Arc::new(ReqwestHttpClient::new(timeout)?);
        Ok(Self::with_http_client(http_client, server, token).with_timeout(timeout))
    }

    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        server: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            server: server.into(),
            token: token.into(),
            timeout: Duration::from_secs(5),
            extractor: TagExtractor::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extractor(mut self, extractor: TagExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Lists every sensor of the account.
    pub async fn sensor_list(&self) -> Result<SensorList, VendorError> {
        let request = self.request("sensorlist")?;
        execute_json(VendorId::Imonnit, "sensorlist", self.http_client.as_ref(), request).await
    }

    /// Lists the sensor networks of the account.
    pub async fn network_list(&self) -> Result<NetworkList, VendorError> {
        let request = self.request("networklist")?;
        execute_json(VendorId::Imonnit, "networklist", self.http_client.as_ref(), request).await
    }

    fn request(&self, endpoint: &str) -> Result<HttpRequest, VendorError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(VendorError::invalid_request(
                VendorId::Imonnit,
                "token required for the imonnit API",
            ));
        }

        let url = join_url(&self.server, &format!("{endpoint}/{}", urlencoding::encode(token)));
        Ok(HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout(self.timeout))
    }
}

impl VendorSource for ImonnitAdapter {
    fn id(&self) -> VendorId {
        VendorId::Imonnit
    }

    fn query_mode(&self) -> QueryMode {
        QueryMode::ListAll
    }

    fn fetch<'a>(
        &'a self,
        target: QueryTarget,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawObservation>, VendorError>> + Send + 'a>> {
        Box::pin(async move {
            let sensors = self.sensor_list().await?;

            let raw = sensors
                .result
                .into_iter()
                .filter_map(|sensor| sensor.into_raw().ok())
                .filter(|raw| match &target {
                    QueryTarget::All => true,
                    QueryTarget::Device(device) => &raw.device_id == device,
                })
                .collect();

            Ok(raw)
        })
    }

    fn normalize(&self, observation: &RawObservation) -> NormalizedObservation {
        NormalizedObservation {
            tags: self.extractor.extract(&observation.name).to_tags(),
            groups: reading_groups(&observation.reading),
        }
    }
}
