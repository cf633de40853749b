//! Simulated targets for unit tests.

use crate::http::client::Probe;
use crate::http::response::{HttpResponse, ProbeResult};
use crate::payload::group::ParamSet;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// A target whose response is a pure function of the applied parameters.
pub struct MockTarget<F> {
    respond: F,
    hits: AtomicUsize,
}

impl<F> MockTarget<F>
where
    F: Fn(&ParamSet) -> ProbeResult + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            hits: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<F> Probe for MockTarget<F>
where
    F: Fn(&ParamSet) -> ProbeResult + Send + Sync,
{
    async fn probe(&self, _url: &Url, params: &ParamSet) -> ProbeResult {
        self.hits.fetch_add(1, Ordering::Relaxed);
        (self.respond)(params)
    }
}

pub fn ok(body: impl Into<String>) -> ProbeResult {
    ProbeResult::Success(HttpResponse::new(200, body))
}

/// Static page that echoes the value of each parameter in `honored`.
pub fn reflecting(honored: &'static [&'static str]) -> impl Fn(&ParamSet) -> ProbeResult + Send + Sync {
    move |params: &ParamSet| {
        let mut body = String::from("<html>\n<h1>Catalog</h1>\n");
        for name in honored {
            if let Some(value) = params.get(name) {
                body.push_str(&format!("<p>{}</p>\n", value));
            }
        }
        body.push_str("</html>");
        ok(body)
    }
}
