use crate::activation::ActivationType;
use ndarray::{Array1, Array2};
use rand_distr::{Distribution, Uniform};

/// A weight/bias update computed by `weight_changes` but not yet applied
/// to the live parameters. Kept around between steps as momentum memory.
#[derive(Debug, Clone)]
pub struct WeightDelta {
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
}

/// A single trainable affine-plus-activation transform.
///
/// The layer caches its last input, output, and error vectors so that
/// neighboring layers can read them during the backward pass, and keeps
/// its last computed delta for the momentum term.
///
/// Vector lengths are never checked on the hot path; shapes are a
/// construction-time precondition of the owning network.
#[derive(Debug, Clone)]
pub struct Layer {
    pub inputs: usize,
    pub neurons: usize,
    pub activation: ActivationType,
    pub use_bias: bool,
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
    pub last_input: Array1<f32>,
    pub last_output: Array1<f32>,
    pub last_errors: Array1<f32>,
    pub last_delta: Option<WeightDelta>,
    pub last_applied_delta: Option<WeightDelta>,
}

impl Layer {
    /// Constructs a new layer with zeroed weights
    ///
    /// # Arguments
    ///
    /// * `inputs` - Number of inputs to this layer
    /// * `neurons` - Number of neurons in this layer
    /// * `activation` - Activation function type for the layer
    /// * `use_bias` - Whether the layer carries a bias term
    pub fn new(inputs: usize, neurons: usize, activation: ActivationType, use_bias: bool) -> Self {
        let mut layer = Layer {
            inputs,
            neurons,
            activation,
            use_bias,
            weights: Array2::zeros((neurons, inputs)),
            bias: Array1::zeros(if use_bias { neurons } else { 0 }),
            last_input: Array1::zeros(0),
            last_output: Array1::zeros(0),
            last_errors: Array1::zeros(0),
            last_delta: None,
            last_applied_delta: None,
        };
        layer.reset();
        layer
    }

    /// Zeroes weights and bias and clears all cached state, including
    /// the momentum history.
    pub fn reset(&mut self) {
        self.weights = Array2::zeros((self.neurons, self.inputs));
        self.bias = Array1::zeros(if self.use_bias { self.neurons } else { 0 });
        self.last_input = Array1::zeros(0);
        self.last_output = Array1::zeros(0);
        self.last_errors = Array1::zeros(0);
        self.last_delta = None;
        self.last_applied_delta = None;
    }

    /// Forward propagation through the layer.
    ///
    /// Computes `bias + weights · input` and applies the activation
    /// elementwise. Caches the input and the post-activation output.
    pub fn forward(&mut self, input: &Array1<f32>) -> Array1<f32> {
        let mut net = self.weights.dot(input);
        if self.use_bias {
            net += &self.bias;
        }
        let activation = self.activation;
        let output = net.mapv(|x| activation.apply(x));

        self.last_input = input.clone();
        self.last_output = output.clone();
        output
    }

    /// Error terms for an output layer, given the expected targets and
    /// the layer's own outputs: `(expected - output) * f'(output)`.
    pub fn errors_with_expected_outputs(
        &mut self,
        expected: &Array1<f32>,
        outputs: &Array1<f32>,
    ) -> Array1<f32> {
        let errors = Array1::from_shape_fn(outputs.len(), |o| {
            (expected[o] - outputs[o]) * self.activation.derivative(outputs[o])
        });
        self.last_errors = errors.clone();
        errors
    }

    /// Error terms for a hidden layer, backpropagated through the layer
    /// it feeds into: each unit's raw error is the receiving layer's
    /// errors weighted by that layer's connections to this unit, scaled
    /// by the activation derivative at this layer's output.
    pub fn errors_with_receiving_layer(
        &mut self,
        outputs: &Array1<f32>,
        receiving_layer: &Layer,
        receiving_errors: &Array1<f32>,
    ) -> Array1<f32> {
        let raw = receiving_layer.weights.t().dot(receiving_errors);
        let errors = Array1::from_shape_fn(outputs.len(), |o| {
            raw[o] * self.activation.derivative(outputs[o])
        });
        self.last_errors = errors.clone();
        errors
    }

    /// Computes this step's weight/bias delta without applying it.
    ///
    /// With a nonzero momentum and a previous delta on record, the new
    /// delta starts at `momentum * previous`; otherwise it starts at
    /// zero. The gradient contribution `error[o] * sending[i] * lr`
    /// (and `error[o] * lr` for the bias) is then added on top. The
    /// result is cached as the next step's momentum term.
    pub fn weight_changes(
        &mut self,
        errors: &Array1<f32>,
        sending_outputs: &Array1<f32>,
        learning_rate: f32,
        momentum: f32,
    ) -> WeightDelta {
        let mut delta = match &self.last_delta {
            Some(previous) if momentum != 0.0 => WeightDelta {
                weights: &previous.weights * momentum,
                bias: &previous.bias * momentum,
            },
            _ => WeightDelta {
                weights: Array2::zeros(self.weights.dim()),
                bias: Array1::zeros(self.bias.len()),
            },
        };

        for o in 0..self.neurons {
            if self.use_bias {
                delta.bias[o] += errors[o] * learning_rate;
            }
            for i in 0..self.inputs {
                delta.weights[[o, i]] += errors[o] * sending_outputs[i] * learning_rate;
            }
        }

        self.last_delta = Some(delta.clone());
        delta
    }

    /// Adds a previously computed delta into the live weights and bias.
    pub fn apply_weight_changes(&mut self, delta: &WeightDelta) {
        self.weights += &delta.weights;
        self.bias += &delta.bias;
        self.last_applied_delta = Some(delta.clone());
    }

    /// Sets every weight and bias entry to a value drawn uniformly
    /// from `[min, max)`.
    pub fn randomize_params(&mut self, min: f32, max: f32) {
        let dist = Uniform::new(min, max).unwrap();
        let mut rng = rand::rng();
        self.weights.mapv_inplace(|_| dist.sample(&mut rng));
        self.bias.mapv_inplace(|_| dist.sample(&mut rng));
    }

    /// Total count of weights and biases
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}
