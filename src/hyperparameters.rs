use serde::{Deserialize, Serialize};

/// Hyperparameters shared by every training run in a study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate for weight updates
    pub learning_rate: f32,

    /// Momentum coefficient applied to the previous weight delta
    pub momentum: f32,

    /// Lower bound of the uniform weight-initialization range
    pub weight_init_min: f32,

    /// Upper bound (exclusive) of the uniform weight-initialization range
    pub weight_init_max: f32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            learning_rate: 0.6,
            momentum: 0.9,
            weight_init_min: -1.0,
            weight_init_max: 1.0,
        }
    }
}
