pub const MIN_EVENT_SIZE: i64 = 1000;
pub const BREAKPOINT_PADDING: i64 = 1000;
pub const EVIDENCE_TARGET_LINK_PADDING: i64 = 1000;
pub const HMM_PADDING: i64 = 1000;
pub const MAX_CALL_RECIPROCAL_OVERLAP: f64 = 0.8;
pub const COUNTER_EVIDENCE_PSEUDOCOUNT: f64 = 1.0;

pub const COPY_RATIO_BIN_TRIMMING: usize = 0;
pub const HMM_MAX_STATES: usize = 10;
pub const HMM_TRANSITION_PROB: f64 = 1e-3;
pub const HMM_VALID_STATES_MIN_FRACTION: f64 = 0.5;

pub const PRIMARY_CHANNEL: u32 = 0;

// Copy number contribution optimizer
pub const SEARCH_DELTA: f64 = 1e-3;
pub const LEARNING_RATE: f64 = 1e-3;
pub const ABSOLUTE_TOLERANCE: f64 = 1e-6;
pub const MAX_ITERATIONS: usize = 50;
pub const MAX_STEP_SIZE: f64 = 0.1;
pub const MAX_CONTRIBUTION: f64 = 2.0;
pub const PLOIDY: f64 = 2.0;
pub const COPY_NUMBER_SIGMA: f64 = 0.5;
