//! Anonymous usage telemetry over the Segment HTTP tracking API

pub mod machine_id;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::application::{EventProperties, Telemetry};
use crate::core::config::CliConfig;
use crate::core::error::{Error, Result};

const TRACK_PATH: &str = "v1/track";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackPayload<'a> {
    event: &'a str,
    anonymous_id: &'a str,
    properties: &'a EventProperties,
    timestamp: DateTime<Utc>,
    context: TrackContext,
}

#[derive(Debug, Serialize)]
struct TrackContext {
    library: Library,
}

#[derive(Debug, Serialize)]
struct Library {
    name: &'static str,
    version: &'static str,
}

impl Default for TrackContext {
    fn default() -> Self {
        Self {
            library: Library {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Sends each event immediately; delivery failures are logged and dropped
#[derive(Clone)]
pub struct SegmentTelemetry {
    client: Client,
    track_url: Url,
    write_key: String,
    anonymous_id: String,
}

impl SegmentTelemetry {
    pub fn new(
        endpoint: &Url,
        write_key: impl Into<String>,
        anonymous_id: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        let track_url = endpoint
            .join(TRACK_PATH)
            .map_err(|e| Error::config(format!("invalid telemetry endpoint {endpoint}: {e}")))?;

        Ok(Self {
            client,
            track_url,
            write_key: write_key.into(),
            anonymous_id: anonymous_id.into(),
        })
    }

    pub fn track_url(&self) -> &Url {
        &self.track_url
    }
}

#[async_trait]
impl Telemetry for SegmentTelemetry {
    async fn event(&self, name: &str, properties: EventProperties) {
        let payload = TrackPayload {
            event: name,
            anonymous_id: &self.anonymous_id,
            properties: &properties,
            timestamp: Utc::now(),
            context: TrackContext::default(),
        };

        let response = self
            .client
            .post(self.track_url.clone())
            .basic_auth(&self.write_key, Some(""))
            .json(&payload)
            .send()
            .await;
        match response {
            Ok(response) if response.status().is_success() => {
                debug!(event = name, "Telemetry event sent");
            }
            Ok(response) => {
                debug!(event = name, status = %response.status(), "Telemetry event rejected");
            }
            Err(e) => debug!(event = name, error = %e, "Telemetry event not sent"),
        }
    }

    fn event_in_background(&self, name: &str, properties: EventProperties) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(event = name, "No async runtime, telemetry event dropped");
            return;
        };
        let telemetry = self.clone();
        let name = name.to_string();
        runtime.spawn(async move { telemetry.event(&name, properties).await });
    }
}

/// Used when telemetry is disabled
#[derive(Debug, Default)]
pub struct NoopTelemetry;

#[async_trait]
impl Telemetry for NoopTelemetry {
    async fn event(&self, name: &str, _properties: EventProperties) {
        debug!(event = name, "Telemetry disabled, event dropped");
    }

    fn event_in_background(&self, name: &str, _properties: EventProperties) {
        debug!(event = name, "Telemetry disabled, event dropped");
    }
}

/// Telemetry as configured; falls back to [`NoopTelemetry`] rather than failing
pub fn from_config(config: &CliConfig) -> Arc<dyn Telemetry> {
    if !config.telemetry_enabled {
        return Arc::new(NoopTelemetry);
    }
    match SegmentTelemetry::new(
        &config.telemetry_endpoint,
        config.telemetry_write_key.clone(),
        machine_id::anonymous_id(),
    ) {
        Ok(telemetry) => Arc::new(telemetry),
        Err(e) => {
            debug!(error = %e, "Telemetry unavailable");
            Arc::new(NoopTelemetry)
        }
    }
}
