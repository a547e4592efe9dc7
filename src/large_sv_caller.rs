//! Large deletion and tandem duplication caller
//!
//! Calls are produced in three sweeps over the evidence:
//! 1. Existing deletion calls are re-tested
//! 2. Each intrachromosomal breakpoint pair is tested
//! 3. Each intrachromosomal evidence link is tested over the gap between its two ends
//!
//! Conflicting candidates are then resolved, and the copy number contribution of each surviving
//! call is estimated jointly with the other calls in its overlap cluster.
//!

use itertools::Itertools;
use log::{info, warn};
use thousands::Separable;

use crate::breakpoint::{BreakpointPair, get_intrachromosomal_breakpoint_pairs};
use crate::call_clustering::{filter_calls_by_channel, get_call_clusters, split_calls_by_type};
use crate::caller_input::{
    CallerInput, CallerInputError, ExistingSVCall, resolve_evidence_links,
};
use crate::candidate_generation::{
    CallFactory, EvidenceContext, get_default_call_factories, get_events_on_interval,
};
use crate::cli::CallerParameters;
use crate::conflict_resolution::{CandidateStatus, add_duplication_candidate, get_conflicted_calls};
use crate::contig_dictionary::ContigDictionary;
use crate::copy_number_model::{CopyNumberModelSettings, model_clusters_read_depth};
use crate::copy_ratio::{
    ContigCopyRatioBins, CopyRatioBin, CopyRatioSegment, MAX_COPY_RATIO_EVENT_SIZE,
    get_copy_ratio_segment_index, get_minimal_copy_ratio_bins, partition_copy_ratio_bins,
};
use crate::evidence::EvidenceLinkIndex;
use crate::genome_regions::get_high_coverage_mask;
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;
use crate::progress_reporter::ProgressObserver;
use crate::read_depth_support::{ReadDepthEvidence, annotate_read_depth_support};
use crate::run_stats::{CandidateStats, ModelStats};
use crate::sv_call::{LargeSVCall, LargeSVType, ModeledCall};

pub struct CallEventsResult {
    /// Modeled calls in genome order
    pub calls: Vec<ModeledCall>,

    /// Existing calls which were filtered out
    ///
    /// Existing calls are currently never filtered, so this is always empty.
    ///
    pub filtered_calls: Vec<ExistingSVCall>,

    pub candidate_stats: CandidateStats,
    pub model_stats: ModelStats,
}

pub struct LargeSVCaller {
    params: CallerParameters,
    contig_dict: ContigDictionary,
    breakpoint_pairs: Vec<BreakpointPair>,
    unpaired_breakpoint_count: usize,
    existing_calls: IntervalIndex<ExistingSVCall>,
    links: EvidenceLinkIndex,
    assembled_contigs: IntervalIndex<String>,
    high_coverage_mask: IntervalIndex<()>,
    segment_index: IntervalIndex<CopyRatioSegment>,
    contig_copy_ratio_bins: ContigCopyRatioBins,
    call_factories: Vec<Box<dyn CallFactory>>,
}

impl LargeSVCaller {
    /// Resolve and index all evidence in the caller input
    ///
    pub fn new(input: CallerInput, params: &CallerParameters) -> Result<Self, CallerInputError> {
        let contig_dict = ContigDictionary::from_contigs(&input.contigs);
        if contig_dict.is_empty() {
            warn!("Caller input contig dictionary is empty");
        }
        let copy_ratio_contig_dict = ContigDictionary::from_contigs(&input.copy_ratio_contigs);
        if !contig_dict.is_same_dictionary(&copy_ratio_contig_dict) {
            return Err(CallerInputError::IncompatibleDictionary);
        }

        let breakpoints = input
            .breakpoints
            .iter()
            .map(|x| x.resolve(&contig_dict))
            .collect::<Result<Vec<_>, _>>()?;
        let pairing_result = get_intrachromosomal_breakpoint_pairs(breakpoints);
        info!(
            "Found {} intrachromosomal breakpoint pairs",
            pairing_result.pairs.len().separate_with_commas()
        );

        let existing_calls = input
            .sv_calls
            .iter()
            .map(|x| x.resolve(&contig_dict).map(|x| (x.segment, x)))
            .collect::<Result<IntervalIndex<_>, _>>()?;

        let links = resolve_evidence_links(&contig_dict, &input.evidence_links)?;
        let links = EvidenceLinkIndex::new(links, &contig_dict, 0);
        info!(
            "Indexed {} intrachromosomal and {} interchromosomal evidence link intervals",
            links.intrachromosomal.len().separate_with_commas(),
            links.interchromosomal.len().separate_with_commas()
        );

        let mut assembled_contigs = IntervalIndex::new();
        for record in input.assembled_contigs.iter() {
            if let Some(x) = record.resolve(&contig_dict)? {
                assembled_contigs.insert(x.segment, x.name);
            }
        }

        let high_coverage_segments = input
            .high_coverage_intervals
            .iter()
            .map(|x| x.resolve(&contig_dict, "high coverage interval"))
            .collect::<Result<Vec<_>, _>>()?;
        let high_coverage_mask = get_high_coverage_mask(high_coverage_segments);

        let segments = input
            .copy_ratio_segments
            .iter()
            .map(|x| x.resolve(&contig_dict))
            .collect::<Result<Vec<_>, _>>()?;
        let segment_index = get_copy_ratio_segment_index(segments);

        let mut bins = input
            .copy_ratio_bins
            .iter()
            .map(|x| x.resolve(&contig_dict))
            .collect::<Result<Vec<_>, _>>()?;
        if params.minimal_copy_ratio_bins {
            bins = get_evidence_copy_ratio_bins(
                &contig_dict,
                &bins,
                &pairing_result.pairs,
                &links,
                params,
            );
        }
        info!(
            "Read {} copy ratio bins and {} copy ratio segments",
            bins.len().separate_with_commas(),
            segment_index.len().separate_with_commas()
        );
        let contig_copy_ratio_bins = partition_copy_ratio_bins(&contig_dict, bins);

        let call_factories = get_default_call_factories();
        info!(
            "Testing candidate calls of type: {}",
            call_factories.iter().map(|x| x.sv_type()).join(", ")
        );

        Ok(Self {
            params: params.clone(),
            contig_dict,
            breakpoint_pairs: pairing_result.pairs,
            unpaired_breakpoint_count: pairing_result.unpaired_count,
            existing_calls,
            links,
            assembled_contigs,
            high_coverage_mask,
            segment_index,
            contig_copy_ratio_bins,
            call_factories,
        })
    }

    pub fn contig_dict(&self) -> &ContigDictionary {
        &self.contig_dict
    }

    pub fn breakpoint_pairs(&self) -> &[BreakpointPair] {
        &self.breakpoint_pairs
    }

    /// Add regions to the high coverage mask, for instance from a BED file
    pub fn add_high_coverage_regions(&mut self, segments: impl IntoIterator<Item = GenomeSegment>) {
        for segment in segments {
            self.high_coverage_mask.insert(segment, ());
        }
    }

    fn evidence_context(&self) -> EvidenceContext<'_> {
        EvidenceContext {
            contig_dict: &self.contig_dict,
            links: &self.links,
            assembled_contigs: &self.assembled_contigs,
        }
    }

    /// Sweep 1, re-test existing deletion calls
    ///
    /// All candidates are accepted.
    ///
    fn add_existing_call_candidates(
        &self,
        call_index: &mut IntervalIndex<LargeSVCall>,
        stats: &mut CandidateStats,
        progress: &mut dyn ProgressObserver,
    ) {
        let context = self.evidence_context();
        progress.set_record_label("existing calls");
        for entry_index in self.existing_calls.ordered_indices() {
            let existing_call = self.existing_calls.value(entry_index);
            if existing_call.sv_type != Some(LargeSVType::Deletion)
                || existing_call.segment.size() < self.params.min_event_size
            {
                continue;
            }
            let segment = &existing_call.segment;
            for call in get_events_on_interval(
                &self.call_factories,
                &context,
                &segment.start_point(),
                &segment.end_point(),
                segment,
                None,
                self.params.breakpoint_padding,
                self.params.min_event_size,
            ) {
                stats.existing_call_candidate_count += 1;
                call_index.insert(call.segment, call);
            }
            progress.update(&segment.to_region_str(&self.contig_dict));
        }
    }

    /// Add only the duplication candidates which do not overlap a deletion
    ///
    /// Returns the number of candidates tested.
    ///
    fn add_duplication_candidates(
        call_index: &mut IntervalIndex<LargeSVCall>,
        calls: Vec<LargeSVCall>,
        stats: &mut CandidateStats,
    ) -> usize {
        let call_count = calls.len();
        for call in calls {
            match add_duplication_candidate(call_index, call) {
                CandidateStatus::Added => {}
                CandidateStatus::NotDuplication => stats.non_duplication_dropped_count += 1,
                CandidateStatus::OverlapsDeletion => stats.deletion_precedence_rejected_count += 1,
            }
        }
        call_count
    }

    /// Sweep 2, test each breakpoint pair
    ///
    /// Only duplications are added.
    ///
    fn add_breakpoint_pair_candidates(
        &self,
        call_index: &mut IntervalIndex<LargeSVCall>,
        stats: &mut CandidateStats,
        progress: &mut dyn ProgressObserver,
    ) {
        let context = self.evidence_context();
        progress.set_record_label("breakpoint pairs");
        for pair in self.breakpoint_pairs.iter() {
            let calls = get_events_on_interval(
                &self.call_factories,
                &context,
                &pair.left_point(),
                &pair.right_point(),
                &pair.segment,
                Some(pair),
                self.params.breakpoint_padding,
                self.params.min_event_size,
            );
            let candidate_count =
                Self::add_duplication_candidates(call_index, calls, stats);
            stats.breakpoint_pair_candidate_count += candidate_count;
            progress.update(&pair.segment.to_region_str(&self.contig_dict));
        }
    }

    /// Sweep 3, test the gap between the two ends of each intrachromosomal evidence link
    ///
    /// Only duplications are added.
    ///
    fn add_evidence_link_candidates(
        &self,
        call_index: &mut IntervalIndex<LargeSVCall>,
        stats: &mut CandidateStats,
        progress: &mut dyn ProgressObserver,
    ) {
        let context = self.evidence_context();
        progress.set_record_label("evidence links");
        for entry_index in self.links.intrachromosomal.ordered_indices() {
            let link = self.links.get_link(*self.links.intrachromosomal.value(entry_index));
            let (left, right) = (&link.left.segment, &link.right.segment);
            if left.range.end >= right.range.start {
                continue;
            }
            let call_segment =
                GenomeSegment::from_pair(left.chrom_index, left.range.end, right.range.start);
            let calls = get_events_on_interval(
                &self.call_factories,
                &context,
                left,
                right,
                &call_segment,
                None,
                self.params.evidence_target_link_padding,
                self.params.min_event_size,
            );
            let candidate_count =
                Self::add_duplication_candidates(call_index, calls, stats);
            stats.evidence_link_candidate_count += candidate_count;
            progress.update(&call_segment.to_region_str(&self.contig_dict));
        }
    }

    /// Run all candidate sweeps and resolve conflicts between the candidates
    ///
    /// Returns the surviving calls in index order.
    ///
    pub fn get_resolved_candidates(
        &self,
        progress: &mut dyn ProgressObserver,
    ) -> (Vec<LargeSVCall>, CandidateStats) {
        let mut stats = CandidateStats {
            paired_breakpoint_count: self.breakpoint_pairs.len(),
            unpaired_breakpoint_count: self.unpaired_breakpoint_count,
            ..Default::default()
        };

        let mut call_index = IntervalIndex::new();
        self.add_existing_call_candidates(&mut call_index, &mut stats, progress);
        self.add_breakpoint_pair_candidates(&mut call_index, &mut stats, progress);
        self.add_evidence_link_candidates(&mut call_index, &mut stats, progress);

        let calls_to_remove =
            get_conflicted_calls(&call_index, self.params.counter_evidence_pseudocount);
        stats.conflict_removed_count = calls_to_remove.len();

        info!(
            "Found {} candidate calls, {} rejected by deletion overlap, {} removed as conflicting",
            call_index.len().separate_with_commas(),
            stats.deletion_precedence_rejected_count.separate_with_commas(),
            stats.conflict_removed_count.separate_with_commas()
        );

        let ordered_indices = call_index.ordered_indices();
        let mut calls = call_index.into_values().into_iter().map(Some).collect::<Vec<_>>();
        let calls = ordered_indices
            .into_iter()
            .filter(|x| !calls_to_remove.contains(x))
            .filter_map(|x| calls[x].take())
            .collect();
        (calls, stats)
    }

    /// Estimate the copy number contribution of resolved calls
    ///
    /// Deletions and duplications are clustered and modeled separately. Calls from channels other
    /// than the primary channels are dropped.
    ///
    pub fn model_calls(
        &self,
        calls: Vec<LargeSVCall>,
        thread_count: usize,
    ) -> (Vec<ModeledCall>, ModelStats) {
        let mut stats = ModelStats::default();

        let (calls, channel_filtered_count) =
            filter_calls_by_channel(calls, &self.params.primary_channels);
        stats.channel_filtered_count = channel_filtered_count;

        let calls_by_type = split_calls_by_type(calls);
        stats.unmodeled_type_count = calls_by_type.other_count;

        let deletion_clusters = get_call_clusters(calls_by_type.deletions);
        let duplication_clusters = get_call_clusters(calls_by_type.duplications);
        stats.deletion_cluster_count = deletion_clusters.len();
        stats.duplication_cluster_count = duplication_clusters.len();

        let clusters = deletion_clusters
            .into_iter()
            .chain(duplication_clusters)
            .collect::<Vec<_>>();

        let settings = CopyNumberModelSettings::from(&self.params);
        let results =
            model_clusters_read_depth(clusters, &self.segment_index, &settings, thread_count);

        stats.optimizer_iteration_count = results.iter().map(|x| x.iterations).sum();
        let calls = results
            .into_iter()
            .flat_map(|x| x.calls)
            .sorted_by_key(|x| (x.call.segment, x.call.sv_type))
            .collect();
        (calls, stats)
    }

    /// Run the complete caller
    ///
    pub fn call_events(
        &self,
        thread_count: usize,
        progress: &mut dyn ProgressObserver,
    ) -> CallEventsResult {
        let (calls, candidate_stats) = self.get_resolved_candidates(progress);
        let (calls, model_stats) = self.model_calls(calls, thread_count);
        info!("Modeled {} calls", calls.len().separate_with_commas());

        CallEventsResult {
            calls,
            filtered_calls: Vec::new(),
            candidate_stats,
            model_stats,
        }
    }

    /// Annotate each call with its read depth support
    ///
    /// Returns the number of supported calls.
    ///
    pub fn test_read_depth(
        &self,
        calls: &mut [ModeledCall],
        progress: &mut dyn ProgressObserver,
    ) -> Result<usize, CallerInputError> {
        let evidence = ReadDepthEvidence {
            contig_dict: &self.contig_dict,
            high_coverage_mask: &self.high_coverage_mask,
            segment_index: &self.segment_index,
            contig_copy_ratio_bins: &self.contig_copy_ratio_bins,
        };
        annotate_read_depth_support(calls, &evidence, &self.params, progress)
    }
}

/// Restrict copy ratio bins to those near breakpoint pairs and intrachromosomal evidence links
fn get_evidence_copy_ratio_bins(
    contig_dict: &ContigDictionary,
    bins: &[CopyRatioBin],
    breakpoint_pairs: &[BreakpointPair],
    links: &EvidenceLinkIndex,
    params: &CallerParameters,
) -> Vec<CopyRatioBin> {
    let pair_padding = params.breakpoint_padding + params.hmm_padding;
    let link_padding = params.evidence_target_link_padding + params.hmm_padding;
    let evidence_segments = breakpoint_pairs
        .iter()
        .map(|x| (x.segment, pair_padding))
        .chain(
            links
                .links
                .iter()
                .filter_map(|x| x.outer_segment())
                .map(|x| (x, link_padding)),
        )
        .collect::<Vec<_>>();
    get_minimal_copy_ratio_bins(
        contig_dict,
        bins,
        &evidence_segments,
        params.min_event_size,
        MAX_COPY_RATIO_EVENT_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller_input::test_utils::get_empty_test_input;
    use crate::caller_input::{
        BreakpointInputRecord, CopyRatioBinInputRecord, CopyRatioSegmentInputRecord,
        EvidenceLinkInputRecord, IntervalInputRecord, SVCallInputRecord,
        StrandedIntervalInputRecord,
    };
    use crate::contig_dictionary::ContigInfo;
    use crate::copy_ratio::SegmentCall;
    use crate::evidence::Strand;
    use crate::progress_reporter::NullProgressObserver;
    use crate::sv_call::ReadDepthSupport;

    fn get_test_link(
        left: (i64, Strand),
        right: (i64, Strand),
        read_pair_count: u32,
    ) -> EvidenceLinkInputRecord {
        let get_interval = |(start, strand): (i64, Strand)| StrandedIntervalInputRecord {
            contig: "chr1".to_string(),
            start,
            end: start + 100,
            strand,
        };
        EvidenceLinkInputRecord {
            left: get_interval(left),
            right: get_interval(right),
            split_read_count: 0,
            read_pair_count,
        }
    }

    fn get_test_breakpoint(id: &str, mate_id: &str, pos: i64) -> BreakpointInputRecord {
        BreakpointInputRecord {
            id: id.to_string(),
            mate_id: Some(mate_id.to_string()),
            contig: "chr1".to_string(),
            pos,
            contig_names: Vec::new(),
        }
    }

    /// Test input on chr1 with:
    /// - an existing deletion call at [10kb,20kb) supported by both a breakpoint pair and an
    ///   evidence link
    /// - a duplication link inside the deletion
    /// - a separate duplication at [300.1kb,310kb)
    /// - an existing deletion call without support, and an existing duplication call
    /// - a one-copy segment and bins matching the deletion
    ///
    fn get_test_input() -> CallerInput {
        let mut input = get_empty_test_input();
        input.breakpoints = vec![
            get_test_breakpoint("bnd1", "bnd2", 10_000),
            get_test_breakpoint("bnd2", "bnd1", 20_000),
        ];
        input.evidence_links = vec![
            get_test_link((9_900, Strand::Forward), (20_000, Strand::Reverse), 10),
            get_test_link((300_000, Strand::Reverse), (310_000, Strand::Forward), 6),
            get_test_link((12_000, Strand::Reverse), (18_000, Strand::Forward), 4),
        ];
        input.sv_calls = vec![
            SVCallInputRecord {
                sv_type: "DEL".to_string(),
                contig: "chr1".to_string(),
                start: 10_000,
                end: 20_000,
            },
            SVCallInputRecord {
                sv_type: "DEL".to_string(),
                contig: "chr1".to_string(),
                start: 500_000,
                end: 505_000,
            },
            SVCallInputRecord {
                sv_type: "DUP_TAND".to_string(),
                contig: "chr1".to_string(),
                start: 600_000,
                end: 610_000,
            },
        ];
        input.copy_ratio_segments = vec![CopyRatioSegmentInputRecord {
            contig: "chr1".to_string(),
            start: 10_000,
            end: 20_000,
            mean_log2_ratio: -1.0,
            call: SegmentCall::Deletion,
        }];
        input.copy_ratio_bins = (10..20)
            .map(|x| CopyRatioBinInputRecord {
                contig: "chr1".to_string(),
                start: x * 1000,
                end: (x + 1) * 1000,
                log2_ratio: -1.0,
            })
            .collect();
        input
    }

    #[test]
    fn test_incompatible_dictionary() {
        let mut input = get_test_input();
        input.copy_ratio_contigs.pop();
        assert_eq!(
            LargeSVCaller::new(input, &CallerParameters::default()).err(),
            Some(CallerInputError::IncompatibleDictionary)
        );
    }

    #[test]
    fn test_unknown_contig() {
        let mut input = get_test_input();
        input.high_coverage_intervals = vec![IntervalInputRecord {
            contig: "chrM".to_string(),
            start: 0,
            end: 100,
        }];
        assert!(matches!(
            LargeSVCaller::new(input, &CallerParameters::default()),
            Err(CallerInputError::UnknownContig { .. })
        ));
    }

    #[test]
    fn test_resolved_candidates() {
        let caller = LargeSVCaller::new(get_test_input(), &CallerParameters::default()).unwrap();
        let (calls, stats) = caller.get_resolved_candidates(&mut NullProgressObserver);

        assert_eq!(
            stats,
            CandidateStats {
                paired_breakpoint_count: 1,
                unpaired_breakpoint_count: 0,
                existing_call_candidate_count: 1,
                breakpoint_pair_candidate_count: 1,
                evidence_link_candidate_count: 3,
                non_duplication_dropped_count: 2,
                deletion_precedence_rejected_count: 1,
                conflict_removed_count: 0,
            }
        );

        // The deletion is the re-tested existing call, which blocks the duplication link inside it

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].sv_type, LargeSVType::Deletion);
        assert_eq!(calls[0].segment, GenomeSegment::from_pair(0, 10_000, 20_000));
        assert_eq!(calls[0].read_pair_evidence, 10);
        assert_eq!(calls[1].sv_type, LargeSVType::TandemDuplication);
        assert_eq!(calls[1].segment, GenomeSegment::from_pair(0, 300_100, 310_000));
    }

    #[test]
    fn test_deletion_requires_existing_call() {
        let mut input = get_test_input();
        input.sv_calls.clear();
        let caller = LargeSVCaller::new(input, &CallerParameters::default()).unwrap();
        let (calls, stats) = caller.get_resolved_candidates(&mut NullProgressObserver);

        // Breakpoint pair and evidence link deletions are not called
        assert_eq!(stats.non_duplication_dropped_count, 2);
        assert_eq!(stats.deletion_precedence_rejected_count, 0);
        assert!(
            calls
                .iter()
                .all(|x| x.sv_type == LargeSVType::TandemDuplication)
        );
        assert_eq!(
            calls.iter().map(|x| x.segment).collect::<Vec<_>>(),
            vec![
                GenomeSegment::from_pair(0, 12_100, 18_000),
                GenomeSegment::from_pair(0, 300_100, 310_000),
            ]
        );
    }

    #[test]
    fn test_call_events() {
        let caller = LargeSVCaller::new(get_test_input(), &CallerParameters::default()).unwrap();
        let result = caller.call_events(2, &mut NullProgressObserver);

        assert!(result.filtered_calls.is_empty());
        assert_eq!(result.model_stats.deletion_cluster_count, 1);
        assert_eq!(result.model_stats.duplication_cluster_count, 1);
        assert_eq!(result.calls.len(), 2);

        // The deletion is explained by the one-copy segment, the duplication has no segment
        let deletion = &result.calls[0];
        assert_eq!(deletion.call.sv_type, LargeSVType::Deletion);
        assert!(deletion.annotation.copy_number_contribution > 0.0);
        assert_eq!(result.calls[1].annotation.copy_number_contribution, 0.0);
    }

    #[test]
    fn test_channel_filter() {
        let params = CallerParameters {
            primary_channels: vec![1],
            ..Default::default()
        };
        let caller = LargeSVCaller::new(get_test_input(), &params).unwrap();
        let result = caller.call_events(1, &mut NullProgressObserver);
        assert!(result.calls.is_empty());
        assert_eq!(result.model_stats.channel_filtered_count, 2);
    }

    #[test]
    fn test_read_depth_support() {
        let caller = LargeSVCaller::new(get_test_input(), &CallerParameters::default()).unwrap();
        let mut result = caller.call_events(1, &mut NullProgressObserver);
        let supported_count = caller
            .test_read_depth(&mut result.calls, &mut NullProgressObserver)
            .unwrap();
        assert_eq!(supported_count, 1);
        assert_eq!(
            result.calls[0].annotation.read_depth_support,
            Some(ReadDepthSupport::Segments)
        );
        assert_eq!(result.calls[1].annotation.read_depth_support, None);
    }

    #[test]
    fn test_high_coverage_regions() {
        let mut caller =
            LargeSVCaller::new(get_test_input(), &CallerParameters::default()).unwrap();
        caller.add_high_coverage_regions([GenomeSegment::from_pair(0, 9_000, 11_000)]);
        let mut result = caller.call_events(1, &mut NullProgressObserver);
        let supported_count = caller
            .test_read_depth(&mut result.calls, &mut NullProgressObserver)
            .unwrap();
        assert_eq!(supported_count, 0);
    }

    #[test]
    fn test_minimal_copy_ratio_bins() {
        let mut input = get_test_input();
        input.contigs.push(ContigInfo {
            label: "chr3".to_string(),
            length: 1_000_000,
        });
        input.copy_ratio_contigs = input.contigs.clone();
        input.copy_ratio_bins.push(CopyRatioBinInputRecord {
            contig: "chr3".to_string(),
            start: 0,
            end: 1000,
            log2_ratio: 0.0,
        });
        let params = CallerParameters {
            minimal_copy_ratio_bins: true,
            ..Default::default()
        };
        let caller = LargeSVCaller::new(input, &params).unwrap();
        assert_eq!(caller.contig_copy_ratio_bins[0].len(), 10);
        assert!(caller.contig_copy_ratio_bins[2].is_empty());
    }
}
