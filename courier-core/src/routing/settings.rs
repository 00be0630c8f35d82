#[cfg(test)]
#[path = "../../tests/unit/routing/settings_test.rs"]
mod settings_test;

use crate::solver::AlgorithmSettings;

/// Job count above which a problem is considered large.
const LARGE_PROBLEM_SIZE: usize = 250;

/// Creates search settings bounded by the problem size and by the previous runtime of the carrier.
///
/// Large problems get less iterations, a shorter no-improvement window and smaller ruin
/// neighborhoods. If the previous run took longer than threshold, iterations and termination
/// window are halved. When a previous runtime is known, termination window is at least two
/// and iterations are at least ten.
pub fn create_algorithm_settings(job_count: usize, prev_runtime: Option<f64>, threshold: f64) -> AlgorithmSettings {
    let is_large = job_count > LARGE_PROBLEM_SIZE;

    let (radial_share, random_share) = if is_large { (0.15, 0.25) } else { (0.3, 0.5) };
    let (mut max_iterations, mut no_improvement_termination): (usize, usize) = if is_large { (20, 3) } else { (40, 5) };

    if let Some(runtime) = prev_runtime {
        if runtime > threshold {
            max_iterations = max_iterations.div_ceil(2);
            no_improvement_termination = no_improvement_termination.div_ceil(2);
        }

        no_improvement_termination = no_improvement_termination.max(2);
        max_iterations = max_iterations.max(10);
    }

    let share = |ratio: f64| ((job_count as f64 * ratio) as usize).max(1);

    AlgorithmSettings {
        max_iterations,
        no_improvement_termination,
        radial_share: share(radial_share),
        random_share: share(random_share),
    }
}
