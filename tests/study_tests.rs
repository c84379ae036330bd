use engram::{
    evaluate_network, multi_problem_study, run_simulation, single_problem_study,
    train_single_problem, Hyperparameters, Network, StandardNetwork, StudyConfig, TrainingSet,
};
use ndarray::{array, Array1};

/// Network stub that always emits the same output, for pinning down the
/// evaluation arithmetic independently of training.
struct ConstantNetwork(f32);

impl Network for ConstantNetwork {
    fn forward_pass(&mut self, _input: &Array1<f32>) -> Array1<f32> {
        array![self.0]
    }

    fn backward_pass(&mut self, _expected: &Array1<f32>, _learning_rate: f32, _momentum: f32) {}

    fn apply_weight_changes(&mut self) {}

    fn randomize_weights(&mut self, _min: f32, _max: f32) {}

    fn generate_new_network(&self) -> Box<dyn Network> {
        Box::new(ConstantNetwork(self.0))
    }

    fn description(&self) -> &str {
        "constant"
    }
}

fn study_config(epoch_max: usize, retraining_max: usize, simulations: usize) -> StudyConfig {
    StudyConfig {
        epoch_max,
        err_min: 0.5,
        network: Box::new(StandardNetwork::new(2, 2)),
        retraining_max,
        simulations,
    }
}

#[test]
fn test_rounded_output_matches_offset_targets() {
    // A row counts as correct when the rounded output lands within 0.1
    // of its target. The ±0.9 targets sit exactly at that tolerance,
    // and in f32 arithmetic 1.0 - 0.9 comes out a hair above 0.1, so
    // the comparison must not be done in single precision.
    let set = TrainingSet::new("saturated", vec![vec![1.0, 1.0]], vec![0.9]);
    let mut network = ConstantNetwork(1.0);
    let evaluation = evaluate_network(&mut network, &set);
    assert_eq!(evaluation.percent_correct, 1.0);

    let set = TrainingSet::new("saturated-neg", vec![vec![-1.0, -1.0]], vec![-0.9]);
    let mut network = ConstantNetwork(-1.0);
    let evaluation = evaluate_network(&mut network, &set);
    assert_eq!(evaluation.percent_correct, 1.0);

    // An output rounding to the wrong integer is still incorrect
    let set = TrainingSet::new("wrong", vec![vec![1.0, 1.0]], vec![0.9]);
    let mut network = ConstantNetwork(-1.0);
    let evaluation = evaluate_network(&mut network, &set);
    assert_eq!(evaluation.percent_correct, 0.0);
}

#[test]
fn test_converged_network_satisfies_criterion_on_offset_targets() {
    // An output of ±0.9 on a ±0.9 target is a perfect classification:
    // zero RMS error and full rounded correctness.
    let set = TrainingSet::new("exact", vec![vec![1.0, 1.0]], vec![0.9]);
    let mut network = ConstantNetwork(0.9);
    let evaluation = evaluate_network(&mut network, &set);

    assert_eq!(evaluation.percent_correct, 1.0);
    assert!(evaluation.rms_error < 1e-6);
    assert!(evaluation.satisfies(0.5));
}

#[test]
fn test_zero_training_shortcut_leaves_weights_untouched() {
    // A zero-weight network outputs htan(0) = 0, which rounds to the
    // expected target of this trivial set, so training never starts.
    let set = TrainingSet::new("trivial", vec![vec![0.0, 0.0]], vec![0.0]);
    let config = study_config(1000, 0, 1);
    let hp = Hyperparameters::default();

    let mut network = StandardNetwork::new(2, 2);
    let outcome = train_single_problem(&hp, &mut network, &set, &config);

    assert_eq!(outcome.iterations_used, 0);
    assert_eq!(outcome.percent_correct, 1.0);
    assert!(network.hidden().weights.iter().all(|&w| w == 0.0));
    assert!(network.output().weights.iter().all(|&w| w == 0.0));
}

#[test]
fn test_training_never_exceeds_epoch_budget() {
    let hp = Hyperparameters::default();
    let config = study_config(50, 0, 1);

    for _ in 0..10 {
        let mut network = StandardNetwork::new(2, 2);
        network.randomize_weights(hp.weight_init_min, hp.weight_init_max);
        let outcome = train_single_problem(&hp, &mut network, &TrainingSet::xor_set(), &config);

        assert!(outcome.iterations_used <= 50);
        if !(outcome.percent_correct == 1.0 && outcome.rms_error <= config.err_min) {
            // Criterion never held, so the whole budget was consumed
            assert_eq!(outcome.iterations_used, 50);
        }
    }
}

#[test]
fn test_or_study_converges_for_most_initializations() {
    let hp = Hyperparameters::default();
    let config = study_config(1000, 0, 30);

    let mut invoked = false;
    single_problem_study(&hp, &TrainingSet::or_set(), &config, |results| {
        invoked = true;
        // OR is linearly separable; failures should be rare.
        assert!(
            results.perc_incorrect < 0.5,
            "OR failed too often: {}",
            results.perc_incorrect
        );
        assert!(results.average_epochs > 0.0);
        assert!(results.average_epochs < 1000.0);
        assert!(results.std_dev_epochs >= 0.0);
    });
    assert!(invoked);
}

#[test]
fn test_xor_study_reports_well_formed_aggregates() {
    let hp = Hyperparameters::default();
    let config = study_config(500, 0, 10);

    single_problem_study(&hp, &TrainingSet::xor_set(), &config, |results| {
        assert!((0.0..=1.0).contains(&results.perc_incorrect));
        // Averages are over successful repetitions only; NaN means
        // every repetition failed, which is acceptable for XOR.
        if results.perc_incorrect < 1.0 {
            assert!(results.average_epochs > 0.0);
            assert!(results.average_epochs <= 500.0);
        }
    });
}

#[test]
fn test_sequential_training_forgets_the_first_problem() {
    // OR and XOR disagree on [1, 1], so any network that has converged
    // on XOR necessarily misclassifies at least one OR row.
    let hp = Hyperparameters::default();
    let config = study_config(1000, 0, 1);
    let or = TrainingSet::or_set();
    let xor = TrainingSet::xor_set();

    let mut both_converged = 0;
    for _ in 0..20 {
        let mut network = StandardNetwork::new(2, 2);
        network.randomize_weights(hp.weight_init_min, hp.weight_init_max);

        let first = train_single_problem(&hp, &mut network, &or, &config);
        let second = train_single_problem(&hp, &mut network, &xor, &config);
        if first.iterations_used == config.epoch_max || second.iterations_used == config.epoch_max
        {
            continue;
        }
        both_converged += 1;

        let retention = evaluate_network(&mut network, &or);
        assert!(
            retention.percent_correct < 1.0,
            "no interference observed: OR retention {}",
            retention.percent_correct
        );
    }
    assert!(both_converged > 0, "no repetition learned both problems");
}

#[test]
fn test_multi_problem_study_aggregates() {
    let hp = Hyperparameters::default();
    let sets = [TrainingSet::or_set(), TrainingSet::xor_set()];
    let config = study_config(800, 6, 8);

    let mut invoked = false;
    multi_problem_study(&hp, &sets, &config, |results| {
        invoked = true;
        assert_eq!(results.set_names, vec!["OR", "XOR"]);
        assert_eq!(results.problem_stats.len(), 2);
        assert!((0.0..=1.0).contains(&results.perc_failed_initial));
        if results.perc_failed_initial < 1.0 {
            assert!(results.average_initial_epochs > 0.0);
            if results.perc_retrained > 0.0 {
                assert!(results.average_retries >= 0.0);
                assert!((0.0..=1.0).contains(&results.perc_failed_retraining));
            }
        }
    });
    assert!(invoked);
}

#[test]
fn test_retraining_bound_is_respected() {
    let hp = Hyperparameters::default();
    let sets = [TrainingSet::or_set(), TrainingSet::xor_set()];
    let config = study_config(600, 3, 1);

    for _ in 0..8 {
        let run = run_simulation(&hp, &sets, &config);
        assert!(run.retry_count <= 3);
        if run.failed_retraining {
            assert_eq!(run.retry_count, 3);
        }
        if run.failed_initial {
            assert_eq!(run.retry_count, 0);
            assert!(!run.failed_retraining);
        }
    }
}

#[test]
fn test_zero_retraining_budget_never_fails_retraining() {
    let hp = Hyperparameters::default();
    let sets = [TrainingSet::or_set(), TrainingSet::xor_set()];
    let config = study_config(600, 0, 1);

    for _ in 0..8 {
        let run = run_simulation(&hp, &sets, &config);
        assert_eq!(run.retry_count, 0);
        assert!(!run.failed_retraining);
        assert!(run.retries.iter().all(|attempts| attempts.is_empty()));
    }
}
