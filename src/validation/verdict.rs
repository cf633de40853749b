//! Independent confirmation of narrowed-down suspects

use crate::http::client::Probe;
use crate::payload::group::ParamSet;
use crate::validation::baseline::NoiseSignature;
use crate::validation::diff::diverges;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Case-insensitive keywords that suggest the application reacted to input.
pub const ERROR_KEYWORDS: &[&str] = &["error", "invalid", "required", "missing"];

/// Byte-length difference the content-length check accepts as a change.
pub const LENGTH_DELTA_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    ResponseDiff,
    ErrorSignal,
    Reflection,
    ContentLength,
}

impl Check {
    pub const ALL: [Check; 4] = [
        Check::ResponseDiff,
        Check::ErrorSignal,
        Check::Reflection,
        Check::ContentLength,
    ];
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Check::ResponseDiff => "response difference",
            Check::ErrorSignal => "error message",
            Check::Reflection => "reflection",
            Check::ContentLength => "content length",
        };
        f.write_str(s)
    }
}

/// A suspect that survived validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedParameter {
    pub name: String,
    pub value: String,
    pub confirmed_by: Check,
}

pub struct Validator<'a> {
    prober: &'a dyn Probe,
    signature: &'a NoiseSignature,
    checks: Vec<Check>,
}

impl<'a> Validator<'a> {
    pub fn new(prober: &'a dyn Probe, signature: &'a NoiseSignature) -> Self {
        Self::with_checks(prober, signature, Check::ALL.to_vec())
    }

    /// Run only `checks`, in the given order.
    pub fn with_checks(prober: &'a dyn Probe, signature: &'a NoiseSignature, checks: Vec<Check>) -> Self {
        Self {
            prober,
            signature,
            checks,
        }
    }

    /// First check that confirms the parameter, if any.
    pub async fn validate(&self, url: &Url, name: &str, value: &str) -> Option<Check> {
        tracing::debug!("Validating parameter: {}", name);

        for check in &self.checks {
            if self.run(*check, url, name, value).await {
                tracing::debug!("{} confirmed by {}", name, check);
                return Some(*check);
            }
        }

        tracing::debug!("{} rejected as a false positive", name);
        None
    }

    async fn run(&self, check: Check, url: &Url, name: &str, value: &str) -> bool {
        let applied = ParamSet::single(name, value);

        match check {
            Check::ResponseDiff => {
                let baseline = self.prober.probe(url, &ParamSet::new()).await;
                let result = self.prober.probe(url, &applied).await;
                match baseline.response() {
                    Some(base) => diverges(&result, &self.signature.rebased(base), &applied).is_some(),
                    None => false,
                }
            }
            Check::ErrorSignal => {
                let result = self.prober.probe(url, &applied).await;
                result.response().is_some_and(|resp| {
                    let body = resp.body.to_lowercase();
                    ERROR_KEYWORDS.iter().any(|k| body.contains(k))
                })
            }
            Check::Reflection => {
                let marker = reflection_marker(url, name);
                let result = self.prober.probe(url, &ParamSet::single(name, &marker)).await;
                result.response().is_some_and(|resp| resp.body.contains(&marker))
            }
            Check::ContentLength => {
                let baseline = self.prober.probe(url, &ParamSet::new()).await;
                let result = self.prober.probe(url, &applied).await;
                match (baseline.response(), result.response()) {
                    (Some(a), Some(b)) => a.body_len.abs_diff(b.body_len) > LENGTH_DELTA_THRESHOLD,
                    _ => false,
                }
            }
        }
    }
}

static MARKER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique marker value for the reflection check.
pub fn reflection_marker(url: &Url, name: &str) -> String {
    let seq = MARKER_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    hasher.update(name.as_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(seq.to_le_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("psft{}", &digest[..16])
}
