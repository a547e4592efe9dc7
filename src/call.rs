use std::error;

use camino::Utf8Path;
use log::info;
use thousands::Separable;

use crate::call_output::{write_breakpoint_pairs, write_calls, write_filtered_calls};
use crate::caller_input::read_caller_input;
use crate::cli;
use crate::genome_regions::read_bed_segments;
use crate::large_sv_caller::LargeSVCaller;
use crate::progress_reporter::LogProgressReporter;
use crate::run_stats::{CallRunStats, write_call_run_stats};

pub const BREAKPOINT_PAIRS_FILENAME: &str = "breakpoint_pairs.json";
pub const CALLS_FILENAME: &str = "calls.json";
pub const FILTERED_CALLS_FILENAME: &str = "filtered_calls.json";
pub const RUN_STATS_FILENAME: &str = "run.stats.json";
pub const SETTINGS_FILENAME: &str = "call.settings.json";

/// Number of records between progress log messages
const PROGRESS_LOG_INTERVAL: u64 = 10_000;

pub fn run_call(
    shared_settings: &cli::SharedSettings,
    settings: &cli::CallSettings,
) -> Result<(), Box<dyn error::Error>> {
    let start = std::time::Instant::now();

    cli::write_call_settings(&settings.output_dir, settings);

    let input = read_caller_input(Utf8Path::new(&settings.input_filename))?;
    let mut caller = LargeSVCaller::new(input, &settings.params)?;

    if let Some(filename) = settings.high_coverage_bed_filename.as_ref() {
        let segments = read_bed_segments(filename, caller.contig_dict(), "high coverage")?;
        caller.add_high_coverage_regions(segments);
    }

    let mut progress = LogProgressReporter::new(PROGRESS_LOG_INTERVAL);
    let mut result = caller.call_events(shared_settings.thread_count, &mut progress);

    info!(
        "Processed {} candidate loci",
        progress.record_count().separate_with_commas()
    );

    let read_depth_supported_call_count = if settings.test_read_depth {
        Some(caller.test_read_depth(&mut result.calls, &mut progress)?)
    } else {
        None
    };

    let output_dir = &settings.output_dir;
    write_calls(
        &output_dir.join(CALLS_FILENAME),
        caller.contig_dict(),
        &result.calls,
        settings.params.counter_evidence_pseudocount,
    );
    write_filtered_calls(
        &output_dir.join(FILTERED_CALLS_FILENAME),
        caller.contig_dict(),
        &result.filtered_calls,
    );
    write_breakpoint_pairs(
        &output_dir.join(BREAKPOINT_PAIRS_FILENAME),
        caller.contig_dict(),
        caller.breakpoint_pairs(),
    );

    info!(
        "Wrote {} calls to '{}'",
        result.calls.len().separate_with_commas(),
        output_dir.join(CALLS_FILENAME)
    );

    let run_stats = CallRunStats {
        run_time_secs: start.elapsed().as_secs_f64(),
        candidates: result.candidate_stats,
        model: result.model_stats,
        modeled_call_count: result.calls.len(),
        read_depth_supported_call_count,
    };
    write_call_run_stats(output_dir, &run_stats);

    Ok(())
}
