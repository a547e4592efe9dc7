//! Coarse progress reporting for long running call loops
//!

use std::time::Instant;

use log::info;
use thousands::Separable;

/// Observer notified as records are processed
///
/// Observers have no effect on control flow.
///
pub trait ProgressObserver {
    /// Note that one more record has been processed, described by `label`
    fn update(&mut self, label: &str);

    /// Set the name of the record type being processed, used in progress messages
    fn set_record_label(&mut self, label: &str);
}

/// Progress observer which ignores all updates
pub struct NullProgressObserver;

impl ProgressObserver for NullProgressObserver {
    fn update(&mut self, _label: &str) {}

    fn set_record_label(&mut self, _label: &str) {}
}

/// Progress observer writing a log line every `log_interval` records
pub struct LogProgressReporter {
    record_label: String,
    record_count: u64,
    log_interval: u64,
    start_time: Instant,
}

impl LogProgressReporter {
    pub fn new(log_interval: u64) -> Self {
        assert!(log_interval > 0);
        Self {
            record_label: "records".to_string(),
            record_count: 0,
            log_interval,
            start_time: Instant::now(),
        }
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }
}

impl ProgressObserver for LogProgressReporter {
    fn update(&mut self, label: &str) {
        self.record_count += 1;
        if self.record_count % self.log_interval == 0 {
            info!(
                "Processed {} {} in {:.1}s, current: {}",
                self.record_count.separate_with_commas(),
                self.record_label,
                self.start_time.elapsed().as_secs_f64(),
                label
            );
        }
    }

    fn set_record_label(&mut self, label: &str) {
        self.record_label = label.to_string();
    }
}
