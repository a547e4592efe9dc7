//! Independent validation of calls against read depth
//!
//! A call is supported by read depth if any of the following hold:
//! 1. A called copy ratio segment in the expected direction closely matches the call extent
//! 2. For short calls, an HMM copy number parse of the call's copy ratio bins stays mostly in
//!    states consistent with the call type
//! 3. For long deletions with enough supporting evidence, most of the call has no copy ratio bins
//!
//! Calls with an endpoint or most of their length in a high coverage region are not evaluated.
//!

mod copy_number_hmm;

use log::info;
use thousands::Separable;

use self::copy_number_hmm::CopyNumberHmm;
use crate::caller_input::CallerInputError;
use crate::cli::CallerParameters;
use crate::contig_dictionary::ContigDictionary;
use crate::copy_ratio::{
    ContigCopyRatioBins, CopyRatioBin, CopyRatioSegment, SegmentCall, fraction_empty,
    get_copy_ratios_on_interval,
};
use crate::genome_segment::GenomeSegment;
use crate::int_range::has_reciprocal_overlap;
use crate::interval_index::IntervalIndex;
use crate::progress_reporter::ProgressObserver;
use crate::sv_call::{LargeSVCall, LargeSVType, ModeledCall, ReadDepthSupport};

const MAX_HIGH_COVERAGE_FRACTION: f64 = 0.5;
const MIN_SEGMENT_RECIPROCAL_OVERLAP: f64 = 0.5;
const MAX_SEGMENT_BREAKEND_DISTANCE: i64 = 10_000;

/// Calls smaller than this are tested with the copy number HMM
const MAX_HMM_CALL_SIZE: i64 = 10_000;

const MIN_RESCUE_EVIDENCE_COUNT: usize = 3;
const MIN_RESCUE_FRACTION_EMPTY: f64 = 0.8;

/// Standard deviation of the observed copy number in the HMM emission model
const HMM_EMISSION_SIGMA: f64 = 0.5;

/// Read depth evidence used to validate calls
pub struct ReadDepthEvidence<'a> {
    pub contig_dict: &'a ContigDictionary,
    pub high_coverage_mask: &'a IntervalIndex<()>,
    pub segment_index: &'a IntervalIndex<CopyRatioSegment>,
    pub contig_copy_ratio_bins: &'a ContigCopyRatioBins,
}

fn get_expected_segment_call(sv_type: LargeSVType) -> Option<SegmentCall> {
    match sv_type {
        LargeSVType::Deletion => Some(SegmentCall::Deletion),
        LargeSVType::TandemDuplication => Some(SegmentCall::Amplification),
        LargeSVType::DispersedDuplication => None,
    }
}

/// Copy number states consistent with each call type, or None if the type can't be tested
fn is_valid_hmm_state(sv_type: LargeSVType, state: usize, hmm_max_states: usize) -> Option<bool> {
    match sv_type {
        LargeSVType::Deletion => Some(state < 2),
        LargeSVType::TandemDuplication => Some(state >= 3 && state < hmm_max_states),
        LargeSVType::DispersedDuplication => None,
    }
}

fn is_masked(segment: &GenomeSegment, high_coverage_mask: &IntervalIndex<()>) -> bool {
    if high_coverage_mask.is_empty() {
        return false;
    }
    if high_coverage_mask.has_overlapper(&segment.start_point())
        || high_coverage_mask.has_overlapper(&segment.end_point())
    {
        return true;
    }
    let high_coverage_len = high_coverage_mask
        .overlappers(segment)
        .into_iter()
        .map(|x| high_coverage_mask.segment(x).overlap_len(segment))
        .sum::<i64>();
    high_coverage_len as f64 > MAX_HIGH_COVERAGE_FRACTION * segment.size() as f64
}

fn is_supported_by_segments(call: &LargeSVCall, segment_index: &IntervalIndex<CopyRatioSegment>) -> bool {
    let Some(expected_call) = get_expected_segment_call(call.sv_type) else {
        return false;
    };
    let call_range = &call.segment.range;
    segment_index
        .overlapping_values(&call.segment)
        .any(|x| {
            let range = &x.segment.range;
            x.call == expected_call
                && has_reciprocal_overlap(range, call_range, MIN_SEGMENT_RECIPROCAL_OVERLAP)
                && (range.start - call_range.start).abs() < MAX_SEGMENT_BREAKEND_DISTANCE
                && (range.end - call_range.end).abs() < MAX_SEGMENT_BREAKEND_DISTANCE
        })
}

/// Test whether the HMM state path over `bins` is mostly made of states consistent with `sv_type`
fn is_supported_by_hmm(sv_type: LargeSVType, bins: &[CopyRatioBin], params: &CallerParameters) -> bool {
    if bins.is_empty() {
        return false;
    }
    let copy_ratios = bins.iter().map(|x| x.copy_ratio()).collect::<Vec<_>>();
    let max_observed_state = copy_ratios
        .iter()
        .map(|&x| (2.0 * x) as usize)
        .max()
        .unwrap_or(0);
    let state_count = std::cmp::min(params.hmm_max_states, max_observed_state + 1);

    let hmm = CopyNumberHmm::new(state_count, params.hmm_transition_prob, HMM_EMISSION_SIGMA);
    let state_path = hmm.viterbi_parse(&copy_ratios);

    let mut valid_count = 0;
    for &state in state_path.iter() {
        match is_valid_hmm_state(sv_type, state, params.hmm_max_states) {
            Some(true) => valid_count += 1,
            Some(false) => {}
            None => return false,
        }
    }
    valid_count as f64 >= params.hmm_valid_states_min_fraction * state_path.len() as f64
}

/// Find the type of read depth support for one call, if any
pub fn get_call_read_depth_support(
    call: &LargeSVCall,
    copy_ratio_index: &IntervalIndex<f32>,
    evidence: &ReadDepthEvidence,
    params: &CallerParameters,
) -> Option<ReadDepthSupport> {
    if is_masked(&call.segment, evidence.high_coverage_mask) {
        return None;
    }

    if is_supported_by_segments(call, evidence.segment_index) {
        Some(ReadDepthSupport::Segments)
    } else if call.size() < MAX_HMM_CALL_SIZE {
        let bins = get_copy_ratios_on_interval(
            &call.segment,
            copy_ratio_index,
            params.copy_ratio_bin_trimming,
        );
        is_supported_by_hmm(call.sv_type, &bins, params).then_some(ReadDepthSupport::Hmm)
    } else if call.sv_type == LargeSVType::Deletion
        && call.supporting_evidence.len() >= MIN_RESCUE_EVIDENCE_COUNT
    {
        let bins = get_copy_ratios_on_interval(
            &call.segment,
            copy_ratio_index,
            params.copy_ratio_bin_trimming,
        );
        (fraction_empty(&call.segment, &bins) > MIN_RESCUE_FRACTION_EMPTY)
            .then_some(ReadDepthSupport::DeletionRescue)
    } else {
        None
    }
}

/// Set the read depth support of every call on one contig
///
/// Returns the number of supported calls on the contig
///
pub fn annotate_read_depth_support_on_contig(
    calls: &mut [ModeledCall],
    chrom_index: usize,
    evidence: &ReadDepthEvidence,
    params: &CallerParameters,
    progress: &mut dyn ProgressObserver,
) -> Result<usize, CallerInputError> {
    if chrom_index >= evidence.contig_dict.len() {
        return Err(CallerInputError::MissingContigIndex(chrom_index));
    }
    let copy_ratio_index = evidence
        .contig_copy_ratio_bins
        .get(chrom_index)
        .ok_or(CallerInputError::MissingContigIndex(chrom_index))?
        .iter()
        .map(|x| (x.segment, x.log2_ratio))
        .collect::<IntervalIndex<_>>();

    let mut supported_count = 0;
    for x in calls
        .iter_mut()
        .filter(|x| x.call.segment.chrom_index == chrom_index)
    {
        let support = get_call_read_depth_support(&x.call, &copy_ratio_index, evidence, params);
        if support.is_some() {
            supported_count += 1;
        }
        x.annotation.read_depth_support = support;
        progress.update(&format!(
            "{}:{}",
            x.call.segment.to_region_str(evidence.contig_dict),
            x.call.sv_type
        ));
    }
    Ok(supported_count)
}

/// Set the read depth support of every call, processing calls by contig in dictionary order
///
/// Returns the number of supported calls
///
pub fn annotate_read_depth_support(
    calls: &mut [ModeledCall],
    evidence: &ReadDepthEvidence,
    params: &CallerParameters,
    progress: &mut dyn ProgressObserver,
) -> Result<usize, CallerInputError> {
    info!("Evaluating calls for read depth support");
    progress.set_record_label("calls");

    let mut supported_count = 0;
    for chrom_index in 0..evidence.contig_dict.len() {
        supported_count +=
            annotate_read_depth_support_on_contig(calls, chrom_index, evidence, params, progress)?;
    }

    info!(
        "Found read depth support for {} of {} calls",
        supported_count.separate_with_commas(),
        calls.len().separate_with_commas()
    );
    Ok(supported_count)
}
