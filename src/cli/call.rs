use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};
use unwrap::unwrap;

use super::defaults::*;
use super::utils::{check_optional_filename, check_required_filename};
use crate::call::SETTINGS_FILENAME;
use crate::sv_call::CallChannel;

/// Parameters of the large SV caller
///
/// These are all the tunable values used from breakpoint pairing through read depth support
/// testing, so they are kept separate from the input and output file settings.
///
#[derive(Args, Clone, Debug, Deserialize, Serialize)]
pub struct CallerParameters {
    /// Minimum size of a called event
    #[arg(long, default_value_t = MIN_EVENT_SIZE)]
    pub min_event_size: i64,

    /// Padding applied to each breakpoint when searching for evidence supporting a breakpoint pair
    #[arg(long, default_value_t = BREAKPOINT_PADDING)]
    pub breakpoint_padding: i64,

    /// Padding applied to each end of an evidence link when it is used as a call target
    #[arg(long, default_value_t = EVIDENCE_TARGET_LINK_PADDING)]
    pub evidence_target_link_padding: i64,

    /// Extra padding around candidate intervals when selecting a minimal set of copy ratio bins
    #[arg(hide = true, long, default_value_t = HMM_PADDING)]
    pub hmm_padding: i64,

    /// Maximum reciprocal overlap of two calls for both to be reported
    ///
    /// This value is validated and recorded, but no current call filter uses it.
    ///
    #[arg(hide = true, long, default_value_t = MAX_CALL_RECIPROCAL_OVERLAP)]
    pub max_call_reciprocal_overlap: f64,

    /// Pseudocount added to the counter-evidence total when scoring calls
    #[arg(long, default_value_t = COUNTER_EVIDENCE_PSEUDOCOUNT)]
    pub counter_evidence_pseudocount: f64,

    /// Number of copy ratio bins to drop from each side of a call before read depth support testing
    #[arg(long, default_value_t = COPY_RATIO_BIN_TRIMMING)]
    pub copy_ratio_bin_trimming: usize,

    /// Maximum number of copy number states in the read depth support HMM
    #[arg(long, default_value_t = HMM_MAX_STATES)]
    pub hmm_max_states: usize,

    /// Probability of transition from one HMM copy number state to each other state
    #[arg(long, default_value_t = HMM_TRANSITION_PROB)]
    pub hmm_transition_prob: f64,

    /// Minimum fraction of a call's HMM state path in states consistent with the call type
    #[arg(long, default_value_t = HMM_VALID_STATES_MIN_FRACTION)]
    pub hmm_valid_states_min_fraction: f64,

    /// Channel of calls to model and report. Can be specified multiple times.
    #[arg(long = "primary-channel", value_name = "CHANNEL", default_values_t = [PRIMARY_CHANNEL])]
    pub primary_channels: Vec<CallChannel>,

    /// Restrict copy ratio bins to those near breakpoint pairs and evidence links
    #[arg(hide = true, long)]
    pub minimal_copy_ratio_bins: bool,

    #[arg(hide = true, long, default_value_t = SEARCH_DELTA)]
    pub search_delta: f64,

    #[arg(hide = true, long, default_value_t = LEARNING_RATE)]
    pub learning_rate: f64,

    #[arg(hide = true, long, default_value_t = ABSOLUTE_TOLERANCE)]
    pub absolute_tolerance: f64,

    #[arg(hide = true, long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    #[arg(hide = true, long, default_value_t = MAX_STEP_SIZE)]
    pub max_step_size: f64,

    #[arg(hide = true, long, default_value_t = MAX_CONTRIBUTION)]
    pub max_contribution: f64,

    #[arg(hide = true, long, default_value_t = PLOIDY)]
    pub ploidy: f64,

    #[arg(hide = true, long, default_value_t = COPY_NUMBER_SIGMA)]
    pub copy_number_sigma: f64,
}

impl Default for CallerParameters {
    fn default() -> Self {
        Self {
            min_event_size: MIN_EVENT_SIZE,
            breakpoint_padding: BREAKPOINT_PADDING,
            evidence_target_link_padding: EVIDENCE_TARGET_LINK_PADDING,
            hmm_padding: HMM_PADDING,
            max_call_reciprocal_overlap: MAX_CALL_RECIPROCAL_OVERLAP,
            counter_evidence_pseudocount: COUNTER_EVIDENCE_PSEUDOCOUNT,
            copy_ratio_bin_trimming: COPY_RATIO_BIN_TRIMMING,
            hmm_max_states: HMM_MAX_STATES,
            hmm_transition_prob: HMM_TRANSITION_PROB,
            hmm_valid_states_min_fraction: HMM_VALID_STATES_MIN_FRACTION,
            primary_channels: vec![PRIMARY_CHANNEL],
            minimal_copy_ratio_bins: false,
            search_delta: SEARCH_DELTA,
            learning_rate: LEARNING_RATE,
            absolute_tolerance: ABSOLUTE_TOLERANCE,
            max_iterations: MAX_ITERATIONS,
            max_step_size: MAX_STEP_SIZE,
            max_contribution: MAX_CONTRIBUTION,
            ploidy: PLOIDY,
            copy_number_sigma: COPY_NUMBER_SIGMA,
        }
    }
}

#[derive(Args, Default, Deserialize, Serialize)]
pub struct CallSettings {
    /// Directory for all call command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_call_output"))]
    pub output_dir: Utf8PathBuf,

    /// Caller input bundle in JSON format (required)
    #[arg(long = "input", value_name = "FILE")]
    pub input_filename: String,

    /// Regions of unusually high coverage in BED format. Calls in these regions are not tested for
    /// read depth support.
    ///
    #[arg(long = "high-coverage-bed", value_name = "FILE")]
    pub high_coverage_bed_filename: Option<String>,

    /// Test each modeled call for independent support from read depth
    #[arg(long)]
    pub test_read_depth: bool,

    /// Model and report calls from all channels, overriding --primary-channel
    #[arg(long)]
    pub all_channels: bool,

    #[command(flatten)]
    pub params: CallerParameters,
}

fn check_padding(value: i64, label: &str) -> SimpleResult<()> {
    if value < 0 {
        bail!("--{label} argument must not be negative");
    }
    Ok(())
}

fn check_fraction(value: f64, label: &str) -> SimpleResult<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("--{label} argument must be in [0,1]");
    }
    Ok(())
}

fn check_positive(value: f64, label: &str) -> SimpleResult<()> {
    if value.is_nan() || value <= 0.0 {
        bail!("--{label} argument must be greater than 0");
    }
    Ok(())
}

fn validate_caller_parameters(params: &CallerParameters) -> SimpleResult<()> {
    if params.min_event_size < 1 {
        bail!("--min-event-size argument must be greater than 0");
    }
    check_padding(params.breakpoint_padding, "breakpoint-padding")?;
    check_padding(
        params.evidence_target_link_padding,
        "evidence-target-link-padding",
    )?;
    check_padding(params.hmm_padding, "hmm-padding")?;

    check_fraction(
        params.max_call_reciprocal_overlap,
        "max-call-reciprocal-overlap",
    )?;
    check_fraction(
        params.hmm_valid_states_min_fraction,
        "hmm-valid-states-min-fraction",
    )?;

    check_positive(
        params.counter_evidence_pseudocount,
        "counter-evidence-pseudocount",
    )?;

    if params.hmm_max_states == 0 {
        bail!("--hmm-max-states argument must be greater than 0");
    }

    check_positive(params.hmm_transition_prob, "hmm-transition-prob")?;
    if params.hmm_max_states > 1 {
        let max_transition_prob = 1.0 / (params.hmm_max_states - 1) as f64;
        if params.hmm_transition_prob >= max_transition_prob {
            bail!(
                "--hmm-transition-prob argument must be less than {max_transition_prob} for {} HMM states",
                params.hmm_max_states
            );
        }
    }

    check_positive(params.search_delta, "search-delta")?;
    check_positive(params.learning_rate, "learning-rate")?;
    check_positive(params.absolute_tolerance, "absolute-tolerance")?;
    if params.max_iterations == 0 {
        bail!("--max-iterations argument must be greater than 0");
    }
    check_positive(params.max_step_size, "max-step-size")?;
    check_positive(params.max_contribution, "max-contribution")?;
    check_positive(params.ploidy, "ploidy")?;
    check_positive(params.copy_number_sigma, "copy-number-sigma")?;

    Ok(())
}

pub fn validate_and_fix_call_settings(settings: CallSettings) -> SimpleResult<CallSettings> {
    check_required_filename(&settings.input_filename, "caller input")?;

    check_optional_filename(
        settings.high_coverage_bed_filename.as_ref(),
        "high coverage regions",
    )?;

    validate_caller_parameters(&settings.params)?;

    let mut settings = settings;
    if settings.all_channels {
        settings.params.primary_channels.clear();
    } else {
        settings.params.primary_channels.sort();
        settings.params.primary_channels.dedup();
    }

    Ok(settings)
}

pub fn write_call_settings(output_dir: &Utf8Path, settings: &CallSettings) {
    use log::info;

    let filename = output_dir.join(SETTINGS_FILENAME);

    info!("Writing call settings to file: '{filename}'");

    let f = unwrap!(
        std::fs::File::create(&filename),
        "Unable to create call settings json file: '{filename}'"
    );

    serde_json::to_writer_pretty(&f, &settings).unwrap();
}
