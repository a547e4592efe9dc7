//! Selection and clustering of resolved calls ahead of copy number modeling
//!

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::interval_index::{EntryIndex, IntervalIndex};
use crate::sv_call::{CallChannel, LargeSVCall, LargeSVType};

/// Keep only calls from the primary channels
///
/// An empty channel list keeps all calls.
///
/// Returns the kept calls and the number of calls dropped.
///
pub fn filter_calls_by_channel(
    calls: Vec<LargeSVCall>,
    primary_channels: &[CallChannel],
) -> (Vec<LargeSVCall>, usize) {
    if primary_channels.is_empty() {
        return (calls, 0);
    }
    let (kept, dropped): (Vec<_>, Vec<_>) = calls
        .into_iter()
        .partition(|x| primary_channels.contains(&x.channel));
    (kept, dropped.len())
}

/// Calls split into the types modeled independently
#[derive(Default)]
pub struct CallsByType {
    pub deletions: Vec<LargeSVCall>,
    pub duplications: Vec<LargeSVCall>,

    /// Number of calls of any other type, which are dropped
    pub other_count: usize,
}

pub fn split_calls_by_type(calls: Vec<LargeSVCall>) -> CallsByType {
    let mut x = CallsByType::default();
    for call in calls {
        match call.sv_type {
            LargeSVType::Deletion => x.deletions.push(call),
            LargeSVType::TandemDuplication => x.duplications.push(call),
            _ => x.other_count += 1,
        }
    }
    x
}

/// Partition the index entries into connected components under segment overlap
///
/// Components are returned in the index order of their first member, and the members of each
/// component are listed in index order.
///
pub fn get_overlap_components<T>(index: &IntervalIndex<T>) -> Vec<Vec<EntryIndex>> {
    let mut visited = vec![false; index.len()];
    let mut components = Vec::new();

    for entry_index in index.ordered_indices() {
        if visited[entry_index] {
            continue;
        }

        let mut component = BTreeSet::from([entry_index]);
        let mut frontier = vec![entry_index];
        while let Some(member) = frontier.pop() {
            for overlapper in index.overlappers(index.segment(member)) {
                if component.insert(overlapper) {
                    frontier.push(overlapper);
                }
            }
        }

        for &member in component.iter() {
            if visited[member] {
                panic!(
                    "Overlap component member {member} was already assigned to a previous component"
                );
            }
            visited[member] = true;
        }

        components.push(
            component
                .into_iter()
                .sorted_by_key(|&x| (*index.segment(x), x))
                .collect(),
        );
    }
    components
}

/// Partition calls into clusters of transitively overlapping calls
///
/// Each call is found in exactly one cluster. Clusters are ordered by their first call, and the
/// calls in each cluster are in genome order.
///
pub fn get_call_clusters(calls: Vec<LargeSVCall>) -> Vec<Vec<LargeSVCall>> {
    let call_index = calls
        .into_iter()
        .map(|x| (x.segment, x))
        .collect::<IntervalIndex<_>>();
    let components = get_overlap_components(&call_index);

    let mut calls = call_index.into_values().into_iter().map(Some).collect::<Vec<_>>();
    components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .filter_map(|x| calls[x].take())
                .collect()
        })
        .collect()
}
