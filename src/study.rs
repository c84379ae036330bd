use crate::hyperparameters::Hyperparameters;
use crate::network::Network;
use crate::stats::{mean, std_dev};
use crate::train::{evaluate_network, train_single_problem, TrainingOutcome};
use crate::training_set::TrainingSet;
use serde::{Deserialize, Serialize};

/// Configuration for a study: training budgets, the convergence
/// threshold, and the network to use as the architecture template.
/// Each repetition gets its own fresh instance stamped out from the
/// template, so no weights leak between repetitions.
pub struct StudyConfig {
    /// Maximum row presentations per training attempt
    pub epoch_max: usize,

    /// Minimum acceptable RMS error for convergence
    pub err_min: f32,

    /// Architecture template; never trained directly
    pub network: Box<dyn Network>,

    /// Total retraining attempts allowed across all problems of a
    /// multi-problem run. Zero means a single pass with no retraining.
    pub retraining_max: usize,

    /// Number of independent simulation repetitions
    pub simulations: usize,
}

/// Aggregate outcome of a single-problem study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleProblemResults {
    /// Mean iterations to converge, over successful repetitions only
    pub average_epochs: f32,

    /// Std dev of iterations to converge, over successful repetitions
    pub std_dev_epochs: f32,

    /// Fraction of repetitions that exhausted the epoch budget
    pub perc_incorrect: f32,
}

/// Outcome of one multi-problem simulation repetition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Initial training outcome for each problem, in set order
    pub initial: Vec<TrainingOutcome>,

    /// Retraining attempts per problem, in set order
    pub retries: Vec<Vec<TrainingOutcome>>,

    /// Total retraining attempts consumed
    pub retry_count: usize,

    /// Whether the network ever needed retraining at all
    pub needed_retraining: bool,

    /// Whether any initial pass exhausted its epoch budget
    pub failed_initial: bool,

    /// Whether the retraining budget ran out before all problems were
    /// simultaneously satisfied
    pub failed_retraining: bool,
}

/// Per-problem initial-learning statistics, aligned to set order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemStats {
    pub average_epochs: f32,
    pub std_dev_epochs: f32,
}

/// Aggregate outcome of a multi-problem interference study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiProblemResults {
    /// Fraction of repetitions that never learned every problem once
    pub perc_failed_initial: f32,

    /// Mean total initial-training iterations (summed across problems),
    /// over repetitions that learned initially
    pub average_initial_epochs: f32,
    pub std_dev_initial_epochs: f32,

    /// Initial-learning statistics per problem, in set order
    pub problem_stats: Vec<ProblemStats>,

    /// Retraining-attempt counts, over repetitions that needed retraining
    pub average_retries: f32,
    pub std_dev_retries: f32,

    /// Total additional iterations consumed while retraining, over
    /// repetitions that needed retraining
    pub average_retrain_epochs: f32,
    pub std_dev_retrain_epochs: f32,

    /// Fraction of initially-learned repetitions that needed retraining
    pub perc_retrained: f32,

    /// Fraction of retraining repetitions that exhausted the budget
    pub perc_failed_retraining: f32,

    /// Training-set names in presentation order, for labeling
    pub set_names: Vec<String>,
}

/// Runs single-problem training for a configured number of repetitions,
/// each with a fresh randomized network, and reports how many epochs
/// convergence took and how often it never came.
pub fn single_problem_study(
    hyperparams: &Hyperparameters,
    training_set: &TrainingSet,
    config: &StudyConfig,
    on_complete: impl FnOnce(SingleProblemResults),
) {
    let mut iterations = Vec::with_capacity(config.simulations);
    for _ in 0..config.simulations {
        let mut network = config.network.generate_new_network();
        network.randomize_weights(hyperparams.weight_init_min, hyperparams.weight_init_max);
        let outcome = train_single_problem(hyperparams, network.as_mut(), training_set, config);
        iterations.push(outcome.iterations_used);
    }

    let failed = iterations.iter().filter(|&&i| i == config.epoch_max).count();
    let successful: Vec<f32> = iterations
        .iter()
        .filter(|&&i| i != config.epoch_max)
        .map(|&i| i as f32)
        .collect();

    on_complete(SingleProblemResults {
        average_epochs: mean(&successful),
        std_dev_epochs: std_dev(&successful),
        perc_incorrect: failed as f32 / iterations.len() as f32,
    });
}

/// Whether the network currently satisfies the convergence criterion on
/// every problem at once, checked against each set's canonical data.
fn all_problems_satisfied(
    network: &mut dyn Network,
    training_sets: &[TrainingSet],
    config: &StudyConfig,
) -> bool {
    training_sets
        .iter()
        .all(|set| evaluate_network(network, set).satisfies(config.err_min))
}

/// One multi-problem repetition: learn every problem in sequence, then
/// retrain within the shared budget until all problems hold at once.
pub fn run_simulation(
    hyperparams: &Hyperparameters,
    training_sets: &[TrainingSet],
    config: &StudyConfig,
) -> SimulationRun {
    let mut network = config.network.generate_new_network();
    network.randomize_weights(hyperparams.weight_init_min, hyperparams.weight_init_max);

    let mut run = SimulationRun {
        initial: Vec::with_capacity(training_sets.len()),
        retries: vec![Vec::new(); training_sets.len()],
        retry_count: 0,
        needed_retraining: false,
        failed_initial: false,
        failed_retraining: false,
    };

    for set in training_sets {
        let outcome = train_single_problem(hyperparams, network.as_mut(), set, config);
        let exhausted = outcome.iterations_used == config.epoch_max;
        run.initial.push(outcome);
        if exhausted {
            // A run that never learned all problems once is not retrained.
            run.failed_initial = true;
            return run;
        }
    }

    if all_problems_satisfied(network.as_mut(), training_sets, config) {
        return run;
    }
    run.needed_retraining = true;

    while run.retry_count < config.retraining_max {
        for (problem, set) in training_sets.iter().enumerate() {
            let outcome = train_single_problem(hyperparams, network.as_mut(), set, config);
            run.retries[problem].push(outcome);
            run.retry_count += 1;

            if all_problems_satisfied(network.as_mut(), training_sets, config) {
                return run;
            }
            if run.retry_count >= config.retraining_max {
                break;
            }
        }
    }

    // With a zero budget no retraining was ever attempted, so the run
    // is not counted as having failed to retrain.
    if config.retraining_max > 0 {
        run.failed_retraining = true;
    }
    run
}

/// Runs the catastrophic-interference study: many independent
/// repetitions of sequential learning plus bounded retraining, with
/// initial-learning and retraining statistics aggregated across them.
pub fn multi_problem_study(
    hyperparams: &Hyperparameters,
    training_sets: &[TrainingSet],
    config: &StudyConfig,
    on_complete: impl FnOnce(MultiProblemResults),
) {
    let runs: Vec<SimulationRun> = (0..config.simulations)
        .map(|_| run_simulation(hyperparams, training_sets, config))
        .collect();

    let learned: Vec<&SimulationRun> = runs.iter().filter(|r| !r.failed_initial).collect();
    let retrained: Vec<&SimulationRun> = learned
        .iter()
        .copied()
        .filter(|r| r.needed_retraining)
        .collect();

    let total_initial: Vec<f32> = learned
        .iter()
        .map(|r| r.initial.iter().map(|o| o.iterations_used).sum::<usize>() as f32)
        .collect();

    let problem_stats = (0..training_sets.len())
        .map(|problem| {
            let epochs: Vec<f32> = learned
                .iter()
                .map(|r| r.initial[problem].iterations_used as f32)
                .collect();
            ProblemStats {
                average_epochs: mean(&epochs),
                std_dev_epochs: std_dev(&epochs),
            }
        })
        .collect();

    let retry_counts: Vec<f32> = retrained.iter().map(|r| r.retry_count as f32).collect();
    let retrain_epochs: Vec<f32> = retrained
        .iter()
        .map(|r| {
            r.retries
                .iter()
                .flatten()
                .map(|o| o.iterations_used)
                .sum::<usize>() as f32
        })
        .collect();
    let failed_retraining = retrained.iter().filter(|r| r.failed_retraining).count();

    on_complete(MultiProblemResults {
        perc_failed_initial: (runs.len() - learned.len()) as f32 / runs.len() as f32,
        average_initial_epochs: mean(&total_initial),
        std_dev_initial_epochs: std_dev(&total_initial),
        problem_stats,
        average_retries: mean(&retry_counts),
        std_dev_retries: std_dev(&retry_counts),
        average_retrain_epochs: mean(&retrain_epochs),
        std_dev_retrain_epochs: std_dev(&retrain_epochs),
        perc_retrained: retrained.len() as f32 / learned.len() as f32,
        perc_failed_retraining: failed_retraining as f32 / retrained.len() as f32,
        set_names: training_sets.iter().map(|s| s.name.clone()).collect(),
    });
}
