mod breakpoint;
mod call;
mod call_clustering;
mod call_output;
mod caller_input;
mod candidate_generation;
mod cli;
mod conflict_resolution;
mod contig_dictionary;
mod copy_number_model;
mod copy_ratio;
mod evidence;
mod genome_regions;
mod genome_segment;
mod globals;
mod int_range;
mod interval_index;
mod large_sv_caller;
mod log_utils;
mod logger;
mod prob_utils;
mod progress_reporter;
mod read_depth_support;
mod run_stats;
mod sv_call;

use std::{error, process};

use hhmmss::Hhmmss;
use log::info;

use crate::call::run_call;
use crate::cli::Commands;
use crate::globals::{PROGRAM_NAME, PROGRAM_VERSION};
use crate::logger::setup_output_dir_and_logger;

fn run(settings: &cli::Settings) -> Result<(), Box<dyn error::Error>> {
    info!("Starting {PROGRAM_NAME} {PROGRAM_VERSION}");
    info!(
        "cmdline: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    info!("Running on {} threads", settings.shared.thread_count);

    let start = std::time::Instant::now();

    match &settings.command {
        Commands::Call(x) => {
            run_call(&settings.shared, x)?;
        }
    }

    info!(
        "{PROGRAM_NAME} completed. Total Runtime: {}",
        start.elapsed().hhmmssxxx()
    );
    Ok(())
}

fn main() {
    let settings = cli::validate_and_fix_settings(cli::parse_settings());

    // Setup logger, including creation of the output directory for the log file:
    setup_output_dir_and_logger(
        settings.get_output_dir(),
        settings.shared.clobber,
        settings.shared.debug,
    );

    if let Err(err) = run(&settings) {
        log::error!("{err}");
        process::exit(2);
    }
}
