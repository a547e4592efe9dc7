//! Removal of redundant candidate calls
//!
//! Candidate calls from all evidence sweeps are collected in one working interval index. Conflicts
//! are resolved in two steps:
//!
//! 1. Candidates from breakpoint pairs and evidence links are added only if they are duplications
//!    which do not overlap any deletion already in the index. Deletions enter the index only by
//!    re-testing existing deletion calls.
//! 2. After all candidates are added, each group of overlapping calls sharing supporting evidence
//!    is reduced to its single highest scoring call.
//!

use std::collections::HashSet;

use crate::interval_index::{EntryIndex, IntervalIndex};
use crate::sv_call::{LargeSVCall, LargeSVType};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CandidateStatus {
    Added,
    NotDuplication,
    OverlapsDeletion,
}

/// Add `call` to the working index if it is a duplication which does not overlap an existing
/// deletion
///
pub fn add_duplication_candidate(
    call_index: &mut IntervalIndex<LargeSVCall>,
    call: LargeSVCall,
) -> CandidateStatus {
    if call.sv_type != LargeSVType::TandemDuplication {
        return CandidateStatus::NotDuplication;
    }
    let has_overlapping_deletion = call_index
        .overlapping_values(&call.segment)
        .any(|x| x.sv_type == LargeSVType::Deletion);
    if has_overlapping_deletion {
        return CandidateStatus::OverlapsDeletion;
    }
    call_index.insert(call.segment, call);
    CandidateStatus::Added
}

/// Find the calls to remove from the working index so that no two overlapping calls sharing
/// evidence remain in any call's neighborhood
///
/// For each call in index order, the conflicting set is every overlapping call sharing at least one
/// supporting evidence link with it, excluding calls already marked for removal. If the set has at
/// least two members, all members scoring below the set's maximum are removed, and of the members
/// at the maximum only the first in index order is kept.
///
/// Each neighborhood is resolved once, without transitive propagation to the neighborhoods of the
/// removed calls.
///
pub fn get_conflicted_calls(
    call_index: &IntervalIndex<LargeSVCall>,
    counter_evidence_pseudocount: f64,
) -> HashSet<EntryIndex> {
    let mut calls_to_remove = HashSet::new();

    for (_, segment, call) in call_index.iter() {
        let conflicting_calls = call_index
            .overlappers(segment)
            .into_iter()
            .filter(|x| !calls_to_remove.contains(x) && call_index.value(*x).shares_evidence(call))
            .collect::<Vec<_>>();
        if conflicting_calls.len() < 2 {
            continue;
        }

        let scores = conflicting_calls
            .iter()
            .map(|&x| call_index.value(x).score(counter_evidence_pseudocount))
            .collect::<Vec<_>>();
        let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut found_max = false;
        for (&entry_index, &score) in conflicting_calls.iter().zip(scores.iter()) {
            if !found_max && score == max_score {
                found_max = true;
            } else {
                calls_to_remove.insert(entry_index);
            }
        }
    }

    calls_to_remove
}
