//! HTTP prober with shared rate limiting

use crate::core::context::Config;
use crate::core::rate_limit::RateLimiter;
use crate::http::response::{HttpResponse, ProbeResult};
use crate::payload::group::ParamSet;
use crate::payload::injector::inject_query_params;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use url::Url;

/// Issues a single GET probe and reports the outcome as a value.
///
/// Implementations must not fail: transport problems become
/// [`ProbeResult::Timeout`] or [`ProbeResult::NetworkError`].
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &Url, params: &ParamSet) -> ProbeResult;
}

pub struct HttpProber {
    client: Client,
    limiter: RateLimiter,
}

impl HttpProber {
    pub fn new(config: &Config, limiter: RateLimiter) -> crate::error::Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(if config.follow_redirects {
                Policy::limited(10)
            } else {
                Policy::none()
            })
            .build()?;

        Ok(Self { client, limiter })
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &Url, params: &ParamSet) -> ProbeResult {
        // ---- RATE LIMIT ENFORCEMENT ----
        self.limiter.wait().await;

        let target = inject_query_params(url, params);
        tracing::debug!("Sending request to {} ({} params)", url, params.len());

        let response = match self.client.get(target).send().await {
            Ok(r) => r,
            Err(e) => return transport_failure(url, e),
        };

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return transport_failure(url, e),
        };

        tracing::debug!("Received response with status code {} ({} bytes)", status, body.len());
        ProbeResult::Success(HttpResponse::from_bytes(status, &body, location))
    }
}

fn transport_failure(url: &Url, err: reqwest::Error) -> ProbeResult {
    if err.is_timeout() {
        tracing::debug!("Request to {} timed out", url);
        ProbeResult::Timeout
    } else {
        tracing::debug!("Error occurred while requesting {}: {}", url, err);
        ProbeResult::NetworkError(err.to_string())
    }
}
