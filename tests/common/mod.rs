//! Simulated targets shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use paramsift::http::client::Probe;
use paramsift::http::response::{HttpResponse, ProbeResult};
use paramsift::payload::group::ParamSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use url::Url;

/// A site whose response is computed from the requested URL and parameters.
pub struct SimulatedSite<F> {
    respond: F,
    hits: AtomicUsize,
}

impl<F> SimulatedSite<F>
where
    F: Fn(&Url, &ParamSet) -> ProbeResult + Send + Sync,
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
impl<F> Probe for SimulatedSite<F>
where
    F: Fn(&Url, &ParamSet) -> ProbeResult + Send + Sync,
{
    async fn probe(&self, url: &Url, params: &ParamSet) -> ProbeResult {
        self.hits.fetch_add(1, Ordering::Relaxed);
        (self.respond)(url, params)
    }
}

pub fn page(body: impl Into<String>) -> ProbeResult {
    ProbeResult::Success(HttpResponse::new(200, body))
}

pub fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Product page that echoes the value of every honored parameter.
pub fn echo_page(params: &ParamSet, honored: &[&str]) -> ProbeResult {
    let mut body = String::from("<html>\n<h1>Products</h1>\n<ul><li>Lamp</li></ul>\n");
    for name in honored {
        if let Some(value) = params.get(name) {
            body.push_str(&format!("<div>Showing {}</div>\n", value));
        }
    }
    body.push_str("</html>");
    page(body)
}

static SEED: AtomicU64 = AtomicU64::new(0x2545_f491_4f6c_dd1d);

/// `len` pseudo-random ASCII letters, different on every call.
pub fn random_letters(len: usize) -> String {
    let mut state = SEED.fetch_add(0x9e37_79b9_7f4a_7c15, Ordering::Relaxed);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (b'a' + (state % 26) as u8) as char
        })
        .collect()
}
