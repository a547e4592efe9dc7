use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceId;
use crate::genome_segment::GenomeSegment;

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum LargeSVType {
    #[strum(serialize = "DEL")]
    #[serde(rename = "DEL")]
    Deletion,
    #[strum(serialize = "DUP_TAND")]
    #[serde(rename = "DUP_TAND")]
    TandemDuplication,
    #[strum(serialize = "DISPERSED_DUP")]
    #[serde(rename = "DISPERSED_DUP")]
    DispersedDuplication,
}

/// Tag describing which family of evidence produced a call
///
/// Channels are set by the call factories, and used to select the calls passed on to copy number
/// modeling.
pub type CallChannel = u32;

/// A candidate large SV call
///
/// The segment, type and evidence of a call are fixed at creation. Any values estimated for the
/// call afterwards are kept in separate annotation structures.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LargeSVCall {
    pub segment: GenomeSegment,
    pub sv_type: LargeSVType,
    pub channel: CallChannel,

    /// Ids of all evidence links supporting this call
    pub supporting_evidence: BTreeSet<EvidenceId>,

    pub read_pair_evidence: u32,
    pub split_read_evidence: u32,

    /// Assembled contigs from the associated breakpoint pair which align near the call breakpoints
    pub assembly_evidence: u32,

    /// Evidence observations inconsistent with the call near its breakpoints
    pub counter_evidence: u32,
}

impl LargeSVCall {
    pub fn size(&self) -> i64 {
        self.segment.size()
    }

    pub fn supporting_observation_count(&self) -> u32 {
        self.read_pair_evidence + self.split_read_evidence + self.assembly_evidence
    }

    /// Ratio of supporting observations to counter-evidence
    ///
    /// # Arguments
    /// * `counter_evidence_pseudocount` - Added to the counter-evidence count, so that calls without any
    ///   counter-evidence are still ranked by their support
    ///
    pub fn score(&self, counter_evidence_pseudocount: f64) -> f64 {
        self.supporting_observation_count() as f64
            / (self.counter_evidence as f64 + counter_evidence_pseudocount)
    }

    /// True if the two calls share at least one supporting evidence link
    pub fn shares_evidence(&self, other: &LargeSVCall) -> bool {
        // Scan the smaller set against the larger:
        let (a, b) = if self.supporting_evidence.len() <= other.supporting_evidence.len() {
            (&self.supporting_evidence, &other.supporting_evidence)
        } else {
            (&other.supporting_evidence, &self.supporting_evidence)
        };
        a.iter().any(|x| b.contains(x))
    }

    /// +1 for copy number gains and -1 for losses
    pub fn copy_number_sign(&self) -> f64 {
        match self.sv_type {
            LargeSVType::Deletion => -1.0,
            _ => 1.0,
        }
    }
}

/// Labels for the different ways a call can be supported by read depth
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, strum::Display)]
pub enum ReadDepthSupport {
    /// Copy ratio segment with the expected call and matching extent
    #[strum(serialize = "SEGMENTS")]
    #[serde(rename = "SEGMENTS")]
    Segments,

    /// HMM state path over the call's copy ratio bins
    #[strum(serialize = "HMM")]
    #[serde(rename = "HMM")]
    Hmm,

    /// Well-supported deletion lacking copy ratio bins over most of its length
    #[strum(serialize = "DEL_RESCUE")]
    #[serde(rename = "DEL_RESCUE")]
    DeletionRescue,
}

/// Annotations added to a call during copy number modeling
#[derive(Clone, Debug, PartialEq)]
pub struct CallAnnotation {
    /// Dense call index within its modeling cluster
    pub model_id: usize,

    /// Estimated copy number contribution of the call, in [0, max contribution]
    pub copy_number_contribution: f64,

    /// Set only when read depth support classification has been run on the call
    pub read_depth_support: Option<ReadDepthSupport>,
}

#[derive(Clone, Debug)]
pub struct ModeledCall {
    pub call: LargeSVCall,
    pub annotation: CallAnnotation,
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// Build a call supported by the given evidence ids, with `support` read pair observations
    pub fn get_test_call(
        chrom_index: usize,
        start: i64,
        end: i64,
        sv_type: LargeSVType,
        evidence: &[EvidenceId],
        support: u32,
    ) -> LargeSVCall {
        LargeSVCall {
            segment: GenomeSegment::from_pair(chrom_index, start, end),
            sv_type,
            channel: 0,
            supporting_evidence: evidence.iter().copied().collect(),
            read_pair_evidence: support,
            split_read_evidence: 0,
            assembly_evidence: 0,
            counter_evidence: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::get_test_call;
    use super::*;

    #[test]
    fn test_score() {
        let mut call = get_test_call(0, 100, 200, LargeSVType::Deletion, &[0], 4);
        call.split_read_evidence = 2;
        call.counter_evidence = 1;
        approx::assert_ulps_eq!(call.score(1.0), 3.0, max_ulps = 4);
        approx::assert_ulps_eq!(call.score(0.5), 4.0, max_ulps = 4);
    }

    #[test]
    fn test_shares_evidence() {
        let call1 = get_test_call(0, 100, 200, LargeSVType::Deletion, &[1, 2, 3], 1);
        let call2 = get_test_call(0, 100, 200, LargeSVType::Deletion, &[3, 4], 1);
        let call3 = get_test_call(0, 100, 200, LargeSVType::Deletion, &[5], 1);
        assert!(call1.shares_evidence(&call2));
        assert!(call2.shares_evidence(&call1));
        assert!(!call1.shares_evidence(&call3));
    }

    #[test]
    fn test_type_labels() {
        use std::str::FromStr;
        assert_eq!(LargeSVType::TandemDuplication.to_string(), "DUP_TAND");
        assert_eq!(LargeSVType::from_str("DEL").unwrap(), LargeSVType::Deletion);
        assert!(LargeSVType::from_str("INV").is_err());
        assert_eq!(ReadDepthSupport::DeletionRescue.to_string(), "DEL_RESCUE");
    }
}
