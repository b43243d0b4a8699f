//! Candidate merger: existing holdings + ranked candidates → bounded working set.
//!
//! Existing holdings always keep their slot and their relative order; the
//! merger never evicts anything (exits are the lock-in evaluator's job).
//! Remaining capacity is filled from the candidate list in rank order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{CandidateList, PortfolioSnapshot, Security};

/// Why a security is in today's working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionReason {
    /// Already held going into the day.
    Existing,
    /// Newly admitted from the candidate list.
    Admitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSetEntry {
    pub security: Security,
    pub reason: InclusionReason,
}

/// Ordered set of securities under consideration for one trading day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSet {
    entries: Vec<WorkingSetEntry>,
}

impl WorkingSet {
    pub fn entries(&self) -> &[WorkingSetEntry] {
        &self.entries
    }

    pub fn securities(&self) -> impl Iterator<Item = &Security> {
        self.entries.iter().map(|e| &e.security)
    }

    pub fn to_securities(&self) -> Vec<Security> {
        self.securities().cloned().collect()
    }

    pub fn contains(&self, security: &Security) -> bool {
        self.entries.iter().any(|e| &e.security == security)
    }

    pub fn reason(&self, security: &Security) -> Option<InclusionReason> {
        self.entries.iter().find(|e| &e.security == security).map(|e| e.reason)
    }

    pub fn admitted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.reason == InclusionReason::Admitted).count()
    }

    pub fn existing_count(&self) -> usize {
        self.entries.iter().filter(|e| e.reason == InclusionReason::Existing).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge existing holdings with ranked candidates under `max_open_positions`.
///
/// `existing` must already be restricted to nonzero holdings and be in the
/// prior working-set order; use [`merge_snapshot`] to derive it from a
/// portfolio snapshot. Repeated securities in `existing` keep their first slot.
pub fn merge(
    existing: &[Security],
    candidates: &CandidateList,
    max_open_positions: usize,
) -> WorkingSet {
    let mut seen: HashSet<&Security> = HashSet::with_capacity(existing.len() + candidates.len());
    let mut entries = Vec::with_capacity(max_open_positions.max(existing.len()));

    for security in existing {
        if seen.insert(security) {
            entries.push(WorkingSetEntry {
                security: security.clone(),
                reason: InclusionReason::Existing,
            });
        }
    }

    for candidate in candidates.iter() {
        if entries.len() >= max_open_positions {
            break;
        }
        if seen.insert(candidate) {
            entries.push(WorkingSetEntry {
                security: candidate.clone(),
                reason: InclusionReason::Admitted,
            });
        }
    }

    WorkingSet { entries }
}

/// [`merge`] seeded with the snapshot's nonzero holdings in snapshot order.
pub fn merge_snapshot(
    snapshot: &PortfolioSnapshot,
    candidates: &CandidateList,
    max_open_positions: usize,
) -> WorkingSet {
    merge(&snapshot.held_securities(), candidates, max_open_positions)
}
