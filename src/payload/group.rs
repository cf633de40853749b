//! Candidate groups and probe values

/// Ordered mapping of parameter name to probe value.
///
/// Order matters: it decides how groups are split and the order parameters
/// appear in the probe's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParamSet {
    pairs: Vec<(String, String)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single parameter set, used by the validator.
    pub fn single(name: &str, value: &str) -> Self {
        Self {
            pairs: vec![(name.to_string(), value.to_string())],
        }
    }

    /// Insert or replace a parameter, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Split into `groups` owned, disjoint sets (see [`partition`]).
    pub fn partition(&self, groups: usize) -> Vec<ParamSet> {
        partition(&self.pairs, groups)
            .into_iter()
            .map(|pairs| ParamSet { pairs })
            .collect()
    }

    /// Halve by key order.
    pub fn split_half(&self) -> Vec<ParamSet> {
        self.partition(2)
    }
}

impl FromIterator<(String, String)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = ParamSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Split `items` into at most `groups` contiguous chunks whose sizes differ by
/// at most one. Chunks are never empty; a `groups` of 0 is treated as 1.
pub fn partition<T: Clone>(items: &[T], groups: usize) -> Vec<Vec<T>> {
    let groups = groups.max(1).min(items.len());
    if groups == 0 {
        return Vec::new();
    }

    let base = items.len() / groups;
    let remainder = items.len() % groups;
    let mut out = Vec::with_capacity(groups);
    let mut start = 0;

    for i in 0..groups {
        let size = base + usize::from(i < remainder);
        out.push(items[start..start + size].to_vec());
        start += size;
    }

    out
}

/// Minimum number of index digits in a probe value.
const MIN_VALUE_DIGITS: usize = 5;

/// Probe value for the candidate at `index`, zero-padded to `digits`.
///
/// All values of one run share the same width, so no value can occur inside
/// another and a verbatim match in a page names exactly one candidate.
pub fn probe_value(index: usize, digits: usize) -> String {
    format!("7{:0width$}", index, width = digits)
}

/// Index digits needed for `count` candidates.
pub fn value_digits(count: usize) -> usize {
    count
        .saturating_sub(1)
        .checked_ilog10()
        .map_or(1, |d| d as usize + 1)
        .max(MIN_VALUE_DIGITS)
}

/// Assign every candidate its probe value. Candidates must be unique.
pub fn populate(candidates: &[String]) -> ParamSet {
    let digits = value_digits(candidates.len());
    ParamSet {
        pairs: candidates
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), probe_value(i, digits)))
            .collect(),
    }
}
