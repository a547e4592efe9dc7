//! Track stats for the whole call run
//!

use std::fs::File;

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use unwrap::unwrap;

use crate::call::RUN_STATS_FILENAME;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CandidateStats {
    pub paired_breakpoint_count: usize,

    /// Breakpoint records with a mate attribute whose mate was never found
    pub unpaired_breakpoint_count: usize,

    /// Candidates found by re-testing existing deletion calls
    pub existing_call_candidate_count: usize,

    pub breakpoint_pair_candidate_count: usize,
    pub evidence_link_candidate_count: usize,

    /// Breakpoint pair and evidence link candidates dropped because they are not duplications
    pub non_duplication_dropped_count: usize,

    /// Duplication candidates rejected because they overlap a deletion
    pub deletion_precedence_rejected_count: usize,

    /// Calls removed in favor of a higher scoring call sharing the same evidence
    pub conflict_removed_count: usize,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ModelStats {
    pub channel_filtered_count: usize,

    /// Calls of a type which is not modeled
    pub unmodeled_type_count: usize,

    pub deletion_cluster_count: usize,
    pub duplication_cluster_count: usize,

    /// Total optimizer sweeps over all clusters
    pub optimizer_iteration_count: usize,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CallRunStats {
    pub run_time_secs: f64,
    pub candidates: CandidateStats,
    pub model: ModelStats,
    pub modeled_call_count: usize,

    /// Calls with read depth support, if read depth support was tested
    pub read_depth_supported_call_count: Option<usize>,
}

/// Write run_stats structure out in json format
pub fn write_call_run_stats(output_dir: &Utf8Path, run_stats: &CallRunStats) {
    let filename = output_dir.join(RUN_STATS_FILENAME);

    info!("Writing run statistics to file: '{filename}'");

    let f = unwrap!(
        File::create(&filename),
        "Unable to create run statistics json file: '{filename}'"
    );

    serde_json::to_writer_pretty(&f, &run_stats).unwrap();
}
