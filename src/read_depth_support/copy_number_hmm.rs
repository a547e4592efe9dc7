use statrs::distribution::{Continuous, Normal};

use crate::prob_utils::max_index;

/// Simple copy number HMM over a sequence of copy ratio bins
///
/// States are the copy numbers `0..state_count`, with a uniform prior. Every state change has the
/// same transition probability. Each bin's copy ratio is converted to an observed copy number
/// assuming a diploid baseline, and emitted from a normal distribution centered on the state's copy
/// number.
///
pub struct CopyNumberHmm {
    init_lnprob: f64,
    stay_lnprob: f64,
    go_lnprob: f64,
    emission_distros: Vec<Normal>,
}

impl CopyNumberHmm {
    /// # Arguments
    /// * `transition_prob` - Probability of a transition from any state to each other state
    /// * `emission_sigma` - Standard deviation of the observed copy number around the state copy
    ///   number
    ///
    pub fn new(state_count: usize, transition_prob: f64, emission_sigma: f64) -> Self {
        assert!(state_count > 0);
        let stay_prob = 1.0 - transition_prob * ((state_count - 1) as f64);
        assert!(
            stay_prob > 0.0,
            "Copy number HMM transition probability {transition_prob} is too high for {state_count} states"
        );

        let emission_distros = (0..state_count)
            .map(|x| Normal::new(x as f64, emission_sigma).unwrap())
            .collect();

        Self {
            init_lnprob: -(state_count as f64).ln(),
            stay_lnprob: stay_prob.ln(),
            go_lnprob: transition_prob.ln(),
            emission_distros,
        }
    }

    pub fn state_count(&self) -> usize {
        self.emission_distros.len()
    }

    fn emission_lnprob(&self, state_index: usize, copy_ratio: f64) -> f64 {
        self.emission_distros[state_index].ln_pdf(2.0 * copy_ratio)
    }

    fn transition_lnprob(&self, from_state_index: usize, to_state_index: usize) -> f64 {
        if from_state_index == to_state_index {
            self.stay_lnprob
        } else {
            self.go_lnprob
        }
    }

    /// Find the most likely copy number state path for the copy ratio observations
    ///
    #[allow(clippy::needless_range_loop)]
    pub fn viterbi_parse(&self, copy_ratios: &[f64]) -> Vec<usize> {
        let obs_count = copy_ratios.len();
        if obs_count == 0 {
            return Vec::new();
        }
        let state_count = self.state_count();

        // Ping-pong between two rows instead of keeping the full DP matrix
        let mut max_pr_row1 = vec![0.0; state_count];
        let mut max_pr_row2 = vec![0.0; state_count];
        let mut back_pointer = vec![vec![0usize; state_count]; obs_count];

        for state_index in 0..state_count {
            max_pr_row1[state_index] =
                self.init_lnprob + self.emission_lnprob(state_index, copy_ratios[0]);
        }

        let this_row = &mut max_pr_row1;
        let last_row = &mut max_pr_row2;
        for obs_index in 1..obs_count {
            std::mem::swap(this_row, last_row);
            for (to_state_index, row_value) in this_row.iter_mut().enumerate() {
                let emit_lnprob = self.emission_lnprob(to_state_index, copy_ratios[obs_index]);

                let mut max_index = 0;
                let mut max_lnprob = 0.0;
                for from_state_index in 0..state_count {
                    let lnprob = last_row[from_state_index]
                        + self.transition_lnprob(from_state_index, to_state_index)
                        + emit_lnprob;
                    if (from_state_index == 0) || (lnprob > max_lnprob) {
                        max_index = from_state_index;
                        max_lnprob = lnprob;
                    }
                }

                *row_value = max_lnprob;
                back_pointer[obs_index][to_state_index] = max_index;
            }
        }

        get_backtrace(this_row, &back_pointer)
    }
}

fn get_backtrace(last_row: &[f64], back_pointer: &[Vec<usize>]) -> Vec<usize> {
    let mut max_state = max_index(last_row).unwrap();

    let obs_count = back_pointer.len();
    let mut max_path = vec![0; obs_count];
    for obs_index in (0..obs_count).rev() {
        max_path[obs_index] = max_state;
        max_state = back_pointer[obs_index][max_state];
    }
    max_path
}
