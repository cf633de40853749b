//! Divide-and-conquer narrowing of suspicious parameter groups

use crate::http::client::Probe;
use crate::payload::group::ParamSet;
use crate::validation::baseline::NoiseSignature;
use crate::validation::diff::diverges;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Result of one narrowing round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    /// Halves of diverging groups, to be tested next round.
    pub groups: Vec<ParamSet>,
    /// Single parameters isolated this round.
    pub suspects: ParamSet,
}

/// Probe every group once with all of its parameters applied.
///
/// Diverging groups are split in half for the next round; a divergence
/// attributable to a single parameter makes it a suspect. The kill flag is
/// checked before each group.
pub async fn narrow(
    prober: &dyn Probe,
    url: &Url,
    signature: &NoiseSignature,
    groups: &[ParamSet],
    kill: &AtomicBool,
) -> Round {
    let mut round = Round::default();

    for (i, group) in groups.iter().enumerate() {
        if kill.load(Ordering::Relaxed) {
            tracing::warn!("Narrowing interrupted for {}", url);
            break;
        }

        tracing::debug!("Narrowing down group {}/{}", i + 1, groups.len());
        let result = prober.probe(url, group).await;

        let Some(diff) = diverges(&result, signature, group) else {
            continue;
        };

        tracing::debug!(
            "Group {} diverged ({}), {} of {} params implicated",
            i + 1,
            diff.reason,
            diff.matched.len(),
            group.len()
        );

        if diff.matched.len() == 1 {
            for (name, value) in diff.matched.iter() {
                round.suspects.insert(name, value);
            }
        } else {
            round.groups.extend(diff.matched.split_half());
        }
    }

    round
}

/// Repeat [`narrow`] until no groups remain, the state stops changing, or
/// `max_rounds` rounds have run. Returns every suspect found.
pub async fn isolate(
    prober: &dyn Probe,
    url: &Url,
    signature: &NoiseSignature,
    initial: Vec<ParamSet>,
    max_rounds: usize,
    kill: &AtomicBool,
) -> ParamSet {
    let mut groups = initial;
    let mut suspects = ParamSet::new();
    let mut previous: Option<Round> = None;

    for round_no in 1..=max_rounds.max(1) {
        if groups.is_empty() {
            break;
        }

        tracing::debug!("Round {}: narrowing down {} parameter groups", round_no, groups.len());
        let round = narrow(prober, url, signature, &groups, kill).await;

        for (name, value) in round.suspects.iter() {
            suspects.insert(name, value);
        }

        let state = Round {
            groups: round.groups,
            suspects: suspects.clone(),
        };
        if previous.as_ref() == Some(&state) {
            tracing::debug!("Narrowing converged after {} rounds", round_no);
            break;
        }

        groups = state.groups.clone();
        previous = Some(state);

        if kill.load(Ordering::Relaxed) {
            break;
        }
        if round_no == max_rounds && !groups.is_empty() {
            tracing::warn!(
                "Narrowing for {} hit the {} round cap with {} groups left",
                url,
                max_rounds,
                groups.len()
            );
        }
    }

    suspects
}
