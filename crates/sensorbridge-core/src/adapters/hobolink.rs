use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::vendor::{QueryMode, QueryTarget, VendorError, VendorSource};
use crate::{
    DecodedReading, DeviceId, FieldValue, NormalizedObservation, RawObservation, RawReading,
    TagSet, UtcDateTime, VendorId,
};

use super::{execute_json, reading_groups};

/// Width of the query window ending at the time of the request.
const QUERY_WINDOW: time::Duration = time::Duration::hours(1);

/// Observation metadata keys promoted to tags when non-empty.
const TAG_KEYS: [&str; 7] = [
    "logger_sn",
    "sensor_sn",
    "channel",
    "data_type",
    "si_unit",
    "us_unit",
    "scaled_unit",
];

/// Body of a HOBOlink data query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    pub authentication: Authentication,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
    pub user: String,
    pub password: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub start_date_time: UtcDateTime,
    pub end_date_time: UtcDateTime,
    pub loggers: Vec<String>,
}

/// Response envelope of a HOBOlink data query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observations {
    #[serde(rename = "observationList")]
    pub observation_list: Vec<Observation>,
    #[serde(default)]
    pub message: String,
}

/// One logged value of one sensor channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    pub logger_sn: String,
    #[serde(default, alias = "sensor_sn", deserialize_with = "string_or_null")]
    pub serial_sn: String,
    #[serde(default)]
    pub channel_num: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub data_type: String,
    #[serde(default)]
    pub si_value: Option<f64>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub si_unit: String,
    #[serde(default)]
    pub us_value: Option<f64>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub us_unit: String,
    #[serde(default)]
    pub scaled_value: Option<f64>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub scaled_unit: String,
}

impl Observation {
    fn channel_key(&self) -> (&str, &str, Option<i64>, &str) {
        (&self.logger_sn, &self.serial_sn, self.channel_num, &self.data_type)
    }

    fn logged_at(&self) -> Option<UtcDateTime> {
        self.timestamp.as_deref().and_then(|value| UtcDateTime::parse(value).ok())
    }

    fn into_raw(self) -> Result<RawObservation, Self> {
        let Ok(device_id) = DeviceId::parse(&self.logger_sn) else {
            return Err(self);
        };

        let readings = vec![
            reading("si_value", self.si_value, &self.si_unit),
            reading("us_value", self.us_value, &self.us_unit),
            reading("scaled_value", self.scaled_value, &self.scaled_unit),
        ];

        let mut raw = RawObservation::new(device_id, self.serial_sn.clone(), RawReading::Numeric(readings))
            .with_metadata("logger_sn", self.logger_sn)
            .with_metadata("sensor_sn", self.serial_sn)
            .with_metadata("data_type", self.data_type)
            .with_metadata("si_unit", self.si_unit)
            .with_metadata("us_unit", self.us_unit)
            .with_metadata("scaled_unit", self.scaled_unit);
        if let Some(channel) = self.channel_num {
            raw = raw.with_metadata("channel", channel.to_string());
        }
        if let Some(timestamp) = self.timestamp {
            raw = raw.with_metadata("timestamp", timestamp);
        }

        Ok(raw)
    }
}

/// Keeps the newest observation of every logger channel. Points are stamped
/// with the collection time, so older values of the same channel would only
/// overwrite each other downstream. Entries without a parseable timestamp
/// rank oldest; among equals the later entry wins.
fn latest_per_channel(observations: Vec<Observation>) -> Vec<Observation> {
    let mut newest: HashMap<_, usize> = HashMap::new();
    for (index, observation) in observations.iter().enumerate() {
        newest
            .entry(observation.channel_key())
            .and_modify(|kept| {
                if observation.logged_at() >= observations[*kept].logged_at() {
                    *kept = index;
                }
            })
            .or_insert(index);
    }

    let mut keep = vec![false; observations.len()];
    for index in newest.into_values() {
        keep[index] = true;
    }

    observations
        .into_iter()
        .zip(keep)
        .filter_map(|(observation, keep)| keep.then_some(observation))
        .collect()
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn reading(field: &str, value: Option<f64>, unit: &str) -> DecodedReading {
    let value = value.map(FieldValue::from).unwrap_or(FieldValue::Unavailable);
    DecodedReading::new(field, value, unit)
}

/// Adapter for the HOBOlink REST data endpoint.
///
/// One POST per logger serial number; the credentials travel in the body.
#[derive(Clone)]
pub struct HobolinkAdapter {
    http_client: Arc<dyn HttpClient>,
    server: String,
    authentication: Authentication,
    timeout: Duration,
}

impl HobolinkAdapter {
    /// Builds the adapter together with its HTTP client.
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let http_client = Arc::new(ReqwestHttpClient::new(timeout)?);
        Ok(Self::with_http_client(http_client, server, user, password, token).with_timeout(timeout))
    }

    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            server: server.into(),
            authentication: Authentication {
                user: user.into(),
                password: password.into(),
                token: token.into(),
            },
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Request body for `target`, covering the hour before `now`.
    pub fn request_body(&self, target: &QueryTarget, now: UtcDateTime) -> ApiRequest {
        let loggers = match target {
            QueryTarget::All => Vec::new(),
            QueryTarget::Device(device) => vec![device.as_str().to_owned()],
        };

        ApiRequest {
            action: String::new(),
            authentication: self.authentication.clone(),
            query: Query {
                start_date_time: now.saturating_sub(QUERY_WINDOW),
                end_date_time: now,
                loggers,
            },
        }
    }

    /// Performs one data query.
    pub async fn query(&self, target: &QueryTarget) -> Result<Observations, VendorError> {
        let body = serde_json::to_string(&self.request_body(target, UtcDateTime::now()))
            .map_err(|error| VendorError::invalid_request(VendorId::Hobolink, error.to_string()))?;

        let request = HttpRequest::post(self.server.as_str())
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json")
            .with_body(body)
            .with_timeout(self.timeout);

        let observations: Observations =
            execute_json(VendorId::Hobolink, "data", self.http_client.as_ref(), request).await?;

        if !observations.message.is_empty() {
            debug!(query = %target, message = %observations.message, "hobolink response message");
        }

        Ok(observations)
    }
}

impl VendorSource for HobolinkAdapter {
    fn id(&self) -> VendorId {
        VendorId::Hobolink
    }

    fn query_mode(&self) -> QueryMode {
        QueryMode::PerDevice
    }

    fn fetch<'a>(
        &'a self,
        target: QueryTarget,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawObservation>, VendorError>> + Send + 'a>> {
        Box::pin(async move {
            let observations = self.query(&target).await?;
            let logged = observations.observation_list.len();
            let latest = latest_per_channel(observations.observation_list);
            if latest.len() < logged {
                debug!(query = %target, logged, kept = latest.len(), "kept newest observation per channel");
            }

            let raw = latest
                .into_iter()
                .filter_map(|observation| match observation.into_raw() {
                    Ok(raw) => Some(raw),
                    Err(skipped) => {
                        warn!(query = %target, sensor_sn = %skipped.serial_sn, "skipping observation without logger serial");
                        None
                    }
                })
                .collect();

            Ok(raw)
        })
    }

    fn normalize(&self, observation: &RawObservation) -> NormalizedObservation {
        let tags: TagSet = TAG_KEYS
            .iter()
            .filter_map(|key| {
                observation
                    .metadata(key)
                    .filter(|value| !value.is_empty())
                    .map(|value| ((*key).to_owned(), value.to_owned()))
            })
            .collect();

        NormalizedObservation {
            tags,
            groups: reading_groups(&observation.reading),
        }
    }
}
