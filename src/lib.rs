mod activation;
mod hyperparameters;
mod layer;
mod network;
mod stats;
mod study;
mod train;
mod training_set;

pub use activation::ActivationType;
pub use hyperparameters::Hyperparameters;
pub use layer::{Layer, WeightDelta};
pub use network::{MirroredCascadeNetwork, Network, StandardNetwork};
pub use stats::{mean, std_dev};
pub use study::{
    multi_problem_study, run_simulation, single_problem_study, MultiProblemResults, ProblemStats,
    SimulationRun, SingleProblemResults, StudyConfig,
};
pub use train::{epoch, evaluate_network, train_single_problem, Evaluation, TrainingOutcome};
pub use training_set::TrainingSet;
