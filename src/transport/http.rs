use super::HeartbeatTransport;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::infrastructure::sentinel_url;
use crate::types::constants::sentinel_paths;
use crate::types::{HeartbeatError, Result};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Issues a cache-busting GET and checks the status
async fn get_no_cache(client: &reqwest::Client, url: &Url) -> Result<reqwest::Response> {
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(HeartbeatError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

/// GETs the dumb-request sentinel path and ignores the body.
pub struct HttpPollTransport {
    client: reqwest::Client,
    url: Url,
}

impl HttpPollTransport {
    /// Poll `<origin>/flaskwebgui-dumb-request-for-middleware-keeping-the-server-online`
    pub fn new(origin: &str) -> Result<Self> {
        Self::with_path(origin, sentinel_paths::DUMB_REQUEST)
    }

    /// Poll an arbitrary sentinel path under `origin`
    pub fn with_path(origin: &str, sentinel_path: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: sentinel_url(origin, sentinel_path)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HeartbeatTransport for HttpPollTransport {
    fn name(&self) -> &'static str {
        "http-poll"
    }

    async fn beat(&self) -> Result<()> {
        get_no_cache(&self.client, &self.url).await?;
        tracing::debug!("Polled {}", self.url);
        Ok(())
    }
}

/// GETs the keep-alive route, parses the JSON reply and hands it to a sink.
pub struct HttpJsonTransport {
    client: reqwest::Client,
    url: Url,
    sink: Arc<dyn DiagnosticSink>,
}

impl HttpJsonTransport {
    /// Poll `<origin>/flaskwebgui-keep-server-alive`, logging replies via `tracing`
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: sentinel_url(origin, sentinel_paths::KEEP_ALIVE)?,
            sink: Arc::new(TracingSink),
        })
    }

    /// Route parsed replies to a different sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HeartbeatTransport for HttpJsonTransport {
    fn name(&self) -> &'static str {
        "http-json"
    }

    async fn beat(&self) -> Result<()> {
        let response = get_no_cache(&self.client, &self.url).await?;
        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        self.sink.on_response(self.name(), &body);
        Ok(())
    }
}
