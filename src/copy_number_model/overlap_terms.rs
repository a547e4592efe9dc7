//! Decomposition of called copy ratio segments into call overlap terms
//!

use crate::genome_segment::IntRange;

/// A call's view of one copy ratio segment
#[derive(Clone, Copy, Debug)]
pub struct OverlapCall {
    pub model_id: usize,
    pub range: IntRange,

    /// Copy number sign of the call, -1 for losses and +1 for gains
    pub sign: f64,
}

/// One sub-interval of a copy ratio segment, with the set of calls covering all of it
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapTerm {
    /// (model_id, sign) for each call covering the sub-interval
    pub calls: Vec<(usize, f64)>,

    /// Sum over the covering calls of the sub-interval length as a fraction of the call length
    pub scaling: f64,
}

/// Split `segment_range` at every call breakpoint falling strictly inside it, and return one term
/// for each resulting sub-interval covered by at least one call
///
/// Sub-intervals are visited from left to right. A call covers a sub-interval `[a, b)` when
/// `start <= a` and `end >= b`.
///
pub fn get_segment_overlap_terms(
    segment_range: &IntRange,
    overlap_calls: &[OverlapCall],
) -> Vec<OverlapTerm> {
    let mut boundaries = vec![segment_range.start, segment_range.end];
    for call in overlap_calls {
        for pos in [call.range.start, call.range.end] {
            if pos > segment_range.start && pos < segment_range.end {
                boundaries.push(pos);
            }
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut terms = Vec::new();
    for w in boundaries.windows(2) {
        let (start, end) = (w[0], w[1]);
        let covering_calls = overlap_calls
            .iter()
            .filter(|x| x.range.start <= start && x.range.end >= end && !x.range.is_empty())
            .collect::<Vec<_>>();
        if covering_calls.is_empty() {
            continue;
        }
        let sub_size = (end - start) as f64;
        terms.push(OverlapTerm {
            calls: covering_calls.iter().map(|x| (x.model_id, x.sign)).collect(),
            scaling: covering_calls
                .iter()
                .map(|x| sub_size / x.range.size() as f64)
                .sum(),
        });
    }
    terms
}
