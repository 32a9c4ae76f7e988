//! Region membership filtering.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::CandidateIndex;
use crate::models::{Candidate, Region};

/// Unique labels of reachable candidates, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterResult {
    labels: BTreeSet<String>,
}

impl FilterResult {
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FilterResult {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for FilterResult {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

/// Both sides of a filter run, in input order
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub inside: Vec<&'a Candidate>,
    pub outside: Vec<&'a Candidate>,
    /// Candidates without a usable location
    pub skipped: usize,
}

impl Partition<'_> {
    pub fn labels(&self) -> FilterResult {
        self.inside.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Split candidates into those inside (or on the boundary of) `region` and
/// those outside. Unlocated candidates land in neither list.
pub fn partition<'a>(region: &Region, candidates: &'a [Candidate]) -> Partition<'a> {
    let index = CandidateIndex::build(candidates);

    let mut member = vec![false; candidates.len()];
    for i in index.within_envelope(region) {
        if let Some(point) = candidates[i].location {
            member[i] = region.contains(point);
        }
    }

    let mut result = Partition::default();
    for (candidate, inside) in candidates.iter().zip(member) {
        if candidate.location.is_none() {
            result.skipped += 1;
        } else if inside {
            result.inside.push(candidate);
        } else {
            result.outside.push(candidate);
        }
    }

    debug!(
        "Partitioned {} candidates: {} inside, {} outside, {} skipped",
        candidates.len(),
        result.inside.len(),
        result.outside.len(),
        result.skipped
    );

    result
}

/// Unique labels of the candidates inside `region`
pub fn filter_labels(region: &Region, candidates: &[Candidate]) -> FilterResult {
    partition(region, candidates).labels()
}
