use crate::http::response::ProbeResult;
use crate::payload::group::ParamSet;
use crate::validation::baseline::{content_lines, location_path, NoiseSignature};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Bytes a body may differ beyond the learned noise floor before it counts.
pub const LENGTH_MARGIN: usize = 3;

/// Names shorter than this are too likely to occur in any page.
const MIN_REFLECTED_NAME_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divergence {
    StatusCode,
    Redirect,
    BodyLength,
    MissingContent,
    ValueReflection,
    NameReflection,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Divergence::StatusCode => "http code",
            Divergence::Redirect => "redirection",
            Divergence::BodyLength => "body length",
            Divergence::MissingContent => "missing content",
            Divergence::ValueReflection => "param value reflection",
            Divergence::NameReflection => "param name reflection",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub reason: Divergence,
    /// Applied parameters most likely responsible.
    pub matched: ParamSet,
}

/// Decide whether `result` differs from the target's no-op behaviour.
///
/// Failed probes are never evidence. Signals are checked in a fixed order and
/// the first one that fires wins.
pub fn diverges(
    result: &ProbeResult,
    signature: &NoiseSignature,
    applied: &ParamSet,
) -> Option<DiffResult> {
    let resp = result.response()?;
    let whole_batch = |reason| {
        Some(DiffResult {
            reason,
            matched: applied.clone(),
        })
    };

    if signature.status.is_some_and(|s| s != resp.status) {
        return whole_batch(Divergence::StatusCode);
    }

    if let Some(expected) = &signature.redirect {
        if location_path(resp.location.as_deref()) != *expected {
            return whole_batch(Divergence::Redirect);
        }
    }

    if resp.body_len.abs_diff(signature.body_len) > signature.length_tolerance + LENGTH_MARGIN {
        return whole_batch(Divergence::BodyLength);
    }

    if !signature.stable_lines.is_empty() {
        let lines: HashSet<&str> = content_lines(&resp.body).into_iter().collect();
        if signature
            .stable_lines
            .iter()
            .any(|l| !lines.contains(l.as_str()))
        {
            return whole_batch(Divergence::MissingContent);
        }
    }

    let visible = without_volatile_lines(&resp.body, signature);

    if !signature.value_reflected {
        let reflected: ParamSet = applied
            .iter()
            .filter(|(_, value)| !value.is_empty() && visible.contains(value))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if !reflected.is_empty() {
            return Some(DiffResult {
                reason: Divergence::ValueReflection,
                matched: reflected,
            });
        }
    }

    if !signature.key_reflected {
        let reflected: ParamSet = applied
            .iter()
            .filter(|(name, _)| name.len() >= MIN_REFLECTED_NAME_LEN)
            .filter(|(name, _)| !signature.baseline_body.contains(name))
            .filter(|(name, _)| name_is_reflected(&visible, name))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if !reflected.is_empty() {
            return Some(DiffResult {
                reason: Divergence::NameReflection,
                matched: reflected,
            });
        }
    }

    None
}

/// Body with the per-load noise lines seen between the reference probes removed.
fn without_volatile_lines<'b>(body: &'b str, signature: &NoiseSignature) -> Cow<'b, str> {
    if signature.volatile_lines.is_empty() {
        return Cow::Borrowed(body);
    }

    let volatile: HashSet<&str> = signature.volatile_lines.iter().map(String::as_str).collect();
    Cow::Owned(
        body.lines()
            .filter(|l| !volatile.contains(l.trim()))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn name_is_reflected(body: &str, name: &str) -> bool {
    if !body.contains(name) {
        return false;
    }
    match Regex::new(&format!(r#"['"\s]{}['"\s]"#, regex::escape(name))) {
        Ok(re) => re.is_match(body),
        Err(_) => false,
    }
}
