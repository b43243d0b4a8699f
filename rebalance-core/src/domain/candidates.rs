//! Ranked candidate list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::Security;

/// Ordered best-to-worst sequence of securities from the upstream ranking.
///
/// Construction drops repeated entries, keeping the first (best-ranked)
/// occurrence, so the list is always duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Security>", into = "Vec<Security>")]
pub struct CandidateList {
    ranked: Vec<Security>,
}

impl CandidateList {
    pub fn new<I, S>(ranked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Security>,
    {
        let mut seen = HashSet::new();
        let ranked = ranked
            .into_iter()
            .map(Into::into)
            .filter(|s: &Security| seen.insert(s.clone()))
            .collect();
        Self { ranked }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Security> {
        self.ranked.iter()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

impl From<Vec<Security>> for CandidateList {
    fn from(ranked: Vec<Security>) -> Self {
        Self::new(ranked)
    }
}

impl From<CandidateList> for Vec<Security> {
    fn from(list: CandidateList) -> Self {
        list.ranked
    }
}
