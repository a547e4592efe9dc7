use super::{CopyNumberModel, CopyNumberModelSettings};
use crate::log_utils::debug_msg;

#[derive(Debug)]
pub struct OptimizerResult {
    /// Estimated copy number contribution of each call, indexed by model id
    pub contributions: Vec<f64>,

    /// Number of completed coordinate sweeps
    pub iterations: usize,

    pub negative_log_posterior: f64,

    /// Convergence statistic of the final sweep
    pub delta: f64,
}

/// Symmetric finite difference estimate of the objective gradient along coordinate `i`
fn get_coordinate_gradient(
    model: &CopyNumberModel,
    contributions: &mut [f64],
    i: usize,
    search_delta: f64,
) -> f64 {
    let init_value = contributions[i];
    contributions[i] = init_value + search_delta;
    let upper = model.negative_log_posterior(contributions);
    contributions[i] = init_value - search_delta;
    let lower = model.negative_log_posterior(contributions);
    contributions[i] = init_value;
    (upper - lower) / (2.0 * search_delta)
}

/// Reduce the contribution of call `i` until every ploidy group containing it is within ploidy
fn enforce_ploidy_constraints(
    model: &CopyNumberModel,
    contributions: &mut [f64],
    i: usize,
    ploidy: f64,
) {
    for &group_index in model.call_ploidy_groups[i].iter() {
        let total = model.ploidy_group_total(group_index, contributions);
        if total > ploidy {
            contributions[i] = (contributions[i] - (total - ploidy)).max(0.0);
        }
    }
}

/// Minimize the model's negative log posterior by projected coordinate gradient descent
///
/// Each sweep updates all coordinates in model id order, so that later coordinates in a sweep see
/// the updated values of earlier ones. After each coordinate update the value is clamped to
/// `[0, max_contribution]`, and then reduced as needed to satisfy every ploidy group containing the
/// coordinate.
///
/// Iteration stops when the objective change per unit of contribution movement in a sweep drops to
/// the absolute tolerance, when a sweep moves no contribution at all, or after the maximum number of
/// sweeps.
///
/// # Arguments
/// * `observe_step` - Called with the full contribution vector after every coordinate update
///
pub fn optimize_contributions(
    model: &CopyNumberModel,
    settings: &CopyNumberModelSettings,
    mut observe_step: impl FnMut(&[f64]),
) -> OptimizerResult {
    let debug = false;

    let mut contributions = vec![0.0; model.call_count];
    let mut delta = settings.absolute_tolerance * 2.0;
    let mut last_objective = model.negative_log_posterior(&contributions);
    let mut iterations = 0;

    while delta > settings.absolute_tolerance && iterations < settings.max_iterations {
        let mut total_sq_change = 0.0;
        for i in 0..contributions.len() {
            let init_value = contributions[i];
            let gradient =
                get_coordinate_gradient(model, &mut contributions, i, settings.search_delta);
            let step = (settings.learning_rate * gradient)
                .clamp(-settings.max_step_size, settings.max_step_size);
            contributions[i] = (init_value - step).clamp(0.0, settings.max_contribution);
            enforce_ploidy_constraints(model, &mut contributions, i, settings.ploidy);

            let change = contributions[i] - init_value;
            total_sq_change += change * change;
            observe_step(&contributions);
        }

        let objective = model.negative_log_posterior(&contributions);
        delta = if total_sq_change == 0.0 {
            0.0
        } else {
            (last_objective - objective).abs() / total_sq_change.sqrt()
        };
        last_objective = objective;
        iterations += 1;

        debug_msg!(
            debug,
            "Sweep {iterations}: objective {objective} delta {delta} contributions {contributions:?}"
        );
    }

    OptimizerResult {
        contributions,
        iterations,
        negative_log_posterior: last_objective,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy_number_model::overlap_terms::OverlapTerm;
    use crate::copy_number_model::SegmentEvidence;

    fn get_single_call_model(observed_copy_number: f64) -> CopyNumberModel {
        CopyNumberModel {
            call_count: 1,
            ploidy_groups: Vec::new(),
            call_ploidy_groups: vec![Vec::new()],
            segment_evidence: vec![SegmentEvidence {
                observed_copy_number,
                terms: vec![OverlapTerm {
                    calls: vec![(0, 1.0)],
                    scaling: 1.0,
                }],
            }],
            baseline_copy_number: 2.0,
            copy_number_sigma: 0.5,
        }
    }

    #[test]
    fn test_single_duplication_converges() {
        let model = get_single_call_model(3.0);
        let settings = CopyNumberModelSettings {
            learning_rate: 0.1,
            ..Default::default()
        };
        let result = optimize_contributions(&model, &settings, |_| {});
        assert!(result.iterations <= 50);
        approx::assert_abs_diff_eq!(result.contributions[0], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_default_settings_progress() {
        let model = get_single_call_model(4.0);
        let settings = CopyNumberModelSettings::default();

        let mut last_value = 0.0;
        let result = optimize_contributions(&model, &settings, |r| {
            assert!(r[0] >= last_value);
            assert!((0.0..=2.0).contains(&r[0]));
            last_value = r[0];
        });

        // The default learning rate moves slowly, so the sweep limit is reached first
        assert_eq!(result.iterations, 50);
        assert!(result.contributions[0] > 0.1);
        assert!(result.contributions[0] < 1.0);
    }

    #[test]
    fn test_no_movement_stops_immediately() {
        // Gain call over a copy number loss, so the contribution is pinned at zero
        let model = get_single_call_model(1.0);
        let settings = CopyNumberModelSettings::default();
        let result = optimize_contributions(&model, &settings, |_| {});
        assert_eq!(result.iterations, 1);
        assert_eq!(result.delta, 0.0);
        assert_eq!(result.contributions[0], 0.0);
    }

    #[test]
    fn test_contribution_upper_bound() {
        let model = get_single_call_model(64.0);
        let settings = CopyNumberModelSettings {
            learning_rate: 1.0,
            ..Default::default()
        };
        let result = optimize_contributions(&model, &settings, |r| {
            assert!(r[0] <= settings.max_contribution);
        });
        assert_eq!(result.contributions[0], settings.max_contribution);
    }
}
