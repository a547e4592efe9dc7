//! Joint estimation of the copy number contribution of each call in a cluster
//!
//! Each call `i` in a cluster is given a latent copy number contribution `r[i]`. Called copy ratio
//! segments overlapping the cluster are split into sub-intervals at the call breakpoints, and the
//! copy number predicted over each sub-interval (baseline plus the signed contributions of all
//! calls covering it) is compared to the segment's observed copy number. Contributions are fit by
//! maximizing the resulting posterior subject to bounds and ploidy constraints.
//!

mod optimizer;
mod overlap_terms;

use std::sync::mpsc::channel;

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use thousands::Separable;

use self::optimizer::optimize_contributions;
use self::overlap_terms::{OverlapCall, OverlapTerm, get_segment_overlap_terms};
use crate::cli::CallerParameters;
use crate::copy_ratio::CopyRatioSegment;
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;
use crate::log_utils::debug_msg;
use crate::prob_utils::unscaled_ln_normal;
use crate::sv_call::{CallAnnotation, LargeSVCall, ModeledCall};

/// Tuning constants for copy number contribution estimation
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CopyNumberModelSettings {
    /// Finite difference step used to estimate the gradient
    pub search_delta: f64,

    pub learning_rate: f64,

    /// Convergence threshold on the objective change per unit of contribution movement in one sweep
    pub absolute_tolerance: f64,

    /// Maximum number of coordinate sweeps
    pub max_iterations: usize,

    /// Maximum change of one contribution in a single coordinate update
    pub max_step_size: f64,

    pub max_contribution: f64,

    /// Maximum total contribution of calls stacked at one position, also used as the baseline copy
    /// number
    pub ploidy: f64,

    /// Standard deviation of the observed copy number around the predicted copy number
    pub copy_number_sigma: f64,
}

impl Default for CopyNumberModelSettings {
    fn default() -> Self {
        Self::from(&CallerParameters::default())
    }
}

impl From<&CallerParameters> for CopyNumberModelSettings {
    fn from(params: &CallerParameters) -> Self {
        Self {
            search_delta: params.search_delta,
            learning_rate: params.learning_rate,
            absolute_tolerance: params.absolute_tolerance,
            max_iterations: params.max_iterations,
            max_step_size: params.max_step_size,
            max_contribution: params.max_contribution,
            ploidy: params.ploidy,
            copy_number_sigma: params.copy_number_sigma,
        }
    }
}

/// Overlap terms of one called copy ratio segment
#[derive(Debug)]
pub struct SegmentEvidence {
    pub observed_copy_number: f64,
    pub terms: Vec<OverlapTerm>,
}

pub struct CopyNumberModel {
    pub call_count: usize,

    /// Sorted model ids of the calls stacked at each call start position with more than two calls
    pub ploidy_groups: Vec<Vec<usize>>,

    /// Indexes into `ploidy_groups` of the groups containing each call
    pub call_ploidy_groups: Vec<Vec<usize>>,

    pub segment_evidence: Vec<SegmentEvidence>,

    pub baseline_copy_number: f64,
    pub copy_number_sigma: f64,
}

impl CopyNumberModel {
    /// Build the model for a cluster of calls, where each call's model id is its position in `calls`
    ///
    pub fn new(
        calls: &[LargeSVCall],
        segment_index: &IntervalIndex<CopyRatioSegment>,
        settings: &CopyNumberModelSettings,
    ) -> Self {
        let call_index = calls
            .iter()
            .enumerate()
            .map(|(model_id, call)| (call.segment, model_id))
            .collect::<IntervalIndex<_>>();

        let ploidy_groups = get_ploidy_groups(calls, &call_index);
        let mut call_ploidy_groups = vec![Vec::new(); calls.len()];
        for (group_index, group) in ploidy_groups.iter().enumerate() {
            for &model_id in group.iter() {
                call_ploidy_groups[model_id].push(group_index);
            }
        }

        let segment_evidence = get_segment_evidence(calls, &call_index, segment_index);

        Self {
            call_count: calls.len(),
            ploidy_groups,
            call_ploidy_groups,
            segment_evidence,
            baseline_copy_number: settings.ploidy,
            copy_number_sigma: settings.copy_number_sigma,
        }
    }

    pub fn ploidy_group_total(&self, group_index: usize, contributions: &[f64]) -> f64 {
        self.ploidy_groups[group_index]
            .iter()
            .map(|&x| contributions[x])
            .sum()
    }

    fn copy_number_log_likelihood(&self, contributions: &[f64]) -> f64 {
        let mut total = 0.0;
        for evidence in self.segment_evidence.iter() {
            for term in evidence.terms.iter() {
                let predicted_copy_number = self.baseline_copy_number
                    + term
                        .calls
                        .iter()
                        .map(|&(model_id, sign)| sign * contributions[model_id])
                        .sum::<f64>();
                total += unscaled_ln_normal(
                    evidence.observed_copy_number,
                    predicted_copy_number,
                    self.copy_number_sigma,
                ) * term.scaling;
            }
        }
        total
    }

    /// Log likelihood of the split-read and read-pair evidence of each call
    ///
    /// Currently uninformative.
    ///
    fn call_evidence_log_likelihood(&self, _contributions: &[f64]) -> f64 {
        0.0
    }

    /// Contribution feasibility is enforced by projection during optimization, so the prior is flat
    fn log_prior(&self, _contributions: &[f64]) -> f64 {
        0.0
    }

    pub fn negative_log_posterior(&self, contributions: &[f64]) -> f64 {
        -(self.copy_number_log_likelihood(contributions)
            + self.call_evidence_log_likelihood(contributions)
            + self.log_prior(contributions))
    }
}

/// Find the sets of more than two calls overlapping each call's start position
fn get_ploidy_groups(calls: &[LargeSVCall], call_index: &IntervalIndex<usize>) -> Vec<Vec<usize>> {
    calls
        .iter()
        .filter_map(|call| {
            let overlappers = call_index.overlappers(&call.segment.start_point());
            if overlappers.len() > 2 {
                Some(
                    overlappers
                        .into_iter()
                        .map(|x| *call_index.value(x))
                        .sorted()
                        .collect(),
                )
            } else {
                None
            }
        })
        .collect()
}

/// Span of all calls in a cluster, which must share one contig
fn get_cluster_span(calls: &[LargeSVCall]) -> Option<GenomeSegment> {
    let first = calls.first()?;
    let chrom_index = first.segment.chrom_index;
    assert!(calls.iter().all(|x| x.segment.chrom_index == chrom_index));
    let start = calls.iter().map(|x| x.segment.range.start).min()?;
    let end = calls.iter().map(|x| x.segment.range.end).max()?;
    Some(GenomeSegment::from_pair(chrom_index, start, end))
}

fn get_segment_evidence(
    calls: &[LargeSVCall],
    call_index: &IntervalIndex<usize>,
    segment_index: &IntervalIndex<CopyRatioSegment>,
) -> Vec<SegmentEvidence> {
    let Some(cluster_span) = get_cluster_span(calls) else {
        return Vec::new();
    };

    let mut segment_evidence = Vec::new();
    for copy_ratio_segment in segment_index.overlapping_values(&cluster_span) {
        let overlap_calls = call_index
            .overlapping_values(&copy_ratio_segment.segment)
            .map(|&model_id| {
                let call = &calls[model_id];
                OverlapCall {
                    model_id,
                    range: call.segment.range,
                    sign: call.copy_number_sign(),
                }
            })
            .collect::<Vec<_>>();
        if overlap_calls.is_empty() {
            continue;
        }
        segment_evidence.push(SegmentEvidence {
            observed_copy_number: copy_ratio_segment.observed_copy_number(),
            terms: get_segment_overlap_terms(&copy_ratio_segment.segment.range, &overlap_calls),
        });
    }
    segment_evidence
}

pub struct ClusterModelResult {
    pub calls: Vec<ModeledCall>,

    /// Optimizer sweeps used for this cluster
    pub iterations: usize,
}

/// Estimate the copy number contribution of each call in one cluster
///
/// Calls are returned in genome order, with the model id of each call set to its position in the
/// returned list.
///
pub fn model_cluster_read_depth(
    mut calls: Vec<LargeSVCall>,
    segment_index: &IntervalIndex<CopyRatioSegment>,
    settings: &CopyNumberModelSettings,
) -> ClusterModelResult {
    let debug = false;

    calls.sort_by_key(|x| x.segment);

    debug_msg!(
        debug,
        "Computing read depth scores on {} events",
        calls.len()
    );

    let model = CopyNumberModel::new(&calls, segment_index, settings);
    let result = optimize_contributions(&model, settings, |_| {});

    debug_msg!(
        debug,
        "Finished after {} iterations with negative log posterior {} and delta {}",
        result.iterations,
        result.negative_log_posterior,
        result.delta
    );

    let calls = calls
        .into_iter()
        .zip(result.contributions)
        .enumerate()
        .map(|(model_id, (call, copy_number_contribution))| ModeledCall {
            call,
            annotation: CallAnnotation {
                model_id,
                copy_number_contribution,
                read_depth_support: None,
            },
        })
        .collect();

    ClusterModelResult {
        calls,
        iterations: result.iterations,
    }
}

/// Run copy number modeling on each cluster over a worker pool
///
/// Results are returned in the same order as `clusters`.
///
pub fn model_clusters_read_depth(
    clusters: Vec<Vec<LargeSVCall>>,
    segment_index: &IntervalIndex<CopyRatioSegment>,
    settings: &CopyNumberModelSettings,
    thread_count: usize,
) -> Vec<ClusterModelResult> {
    let cluster_count = clusters.len();
    info!(
        "Modeling read depth for {} call clusters",
        cluster_count.separate_with_commas()
    );

    let worker_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .unwrap();

    let (tx, rx) = channel();
    worker_pool.scope(move |scope| {
        for (cluster_index, cluster) in clusters.into_iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = model_cluster_read_depth(cluster, segment_index, settings);
                tx.send((cluster_index, result)).unwrap();
            });
        }
    });

    let mut results = rx.into_iter().collect::<Vec<_>>();
    assert_eq!(results.len(), cluster_count);
    results.sort_by_key(|(x, _)| *x);
    results.into_iter().map(|(_, x)| x).collect()
}
