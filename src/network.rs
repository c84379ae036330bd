use crate::activation::ActivationType;
use crate::layer::Layer;
use ndarray::Array1;

/// Capability contract shared by the network topologies under study.
///
/// A network can run a forward pass, compute (but not yet apply) weight
/// deltas from an expected output, commit those deltas, re-randomize its
/// parameters, and stamp out a fresh zero-weight instance of the same
/// topology for an independent study repetition.
pub trait Network {
    /// Propagates an input vector through the network and returns the
    /// output vector. Caches intermediate state for the backward pass.
    fn forward_pass(&mut self, input: &Array1<f32>) -> Array1<f32>;

    /// Computes per-layer errors and weight deltas against the expected
    /// output of the most recent forward pass. Deltas are held until
    /// `apply_weight_changes` commits them.
    fn backward_pass(&mut self, expected: &Array1<f32>, learning_rate: f32, momentum: f32);

    /// Commits the deltas computed by the last backward pass.
    fn apply_weight_changes(&mut self);

    /// Draws every trainable parameter uniformly from `[min, max)`.
    fn randomize_weights(&mut self, min: f32, max: f32);

    /// Constructs a brand-new zero-weight network with the same declared
    /// topology. Weights are not carried over.
    fn generate_new_network(&self) -> Box<dyn Network>;

    /// Human-readable name of the topology, for labeling results
    fn description(&self) -> &str;
}

/// Conventional two-layer feed-forward network: a hidden layer feeding a
/// single-unit output layer, htan activations throughout.
#[derive(Debug, Clone)]
pub struct StandardNetwork {
    description: String,
    input_width: usize,
    hidden_width: usize,
    hidden: Layer,
    output: Layer,
}

impl StandardNetwork {
    pub fn new(input_width: usize, hidden_width: usize) -> Self {
        StandardNetwork {
            description: format!("standard {}-{}-1 network", input_width, hidden_width),
            input_width,
            hidden_width,
            hidden: Layer::new(input_width, hidden_width, ActivationType::Htan, true),
            output: Layer::new(hidden_width, 1, ActivationType::Htan, true),
        }
    }

    pub fn hidden(&self) -> &Layer {
        &self.hidden
    }

    pub fn output(&self) -> &Layer {
        &self.output
    }
}

impl Network for StandardNetwork {
    fn forward_pass(&mut self, input: &Array1<f32>) -> Array1<f32> {
        let hidden_output = self.hidden.forward(input);
        self.output.forward(&hidden_output)
    }

    fn backward_pass(&mut self, expected: &Array1<f32>, learning_rate: f32, momentum: f32) {
        let output_values = self.output.last_output.clone();
        let output_errors = self.output.errors_with_expected_outputs(expected, &output_values);

        let hidden_values = self.hidden.last_output.clone();
        let hidden_errors =
            self.hidden
                .errors_with_receiving_layer(&hidden_values, &self.output, &output_errors);

        self.output
            .weight_changes(&output_errors, &self.hidden.last_output, learning_rate, momentum);
        let hidden_input = self.hidden.last_input.clone();
        self.hidden
            .weight_changes(&hidden_errors, &hidden_input, learning_rate, momentum);
    }

    fn apply_weight_changes(&mut self) {
        if let Some(delta) = self.output.last_delta.clone() {
            self.output.apply_weight_changes(&delta);
        }
        if let Some(delta) = self.hidden.last_delta.clone() {
            self.hidden.apply_weight_changes(&delta);
        }
    }

    fn randomize_weights(&mut self, min: f32, max: f32) {
        self.hidden.randomize_params(min, max);
        self.output.randomize_params(min, max);
    }

    fn generate_new_network(&self) -> Box<dyn Network> {
        Box::new(StandardNetwork::new(self.input_width, self.hidden_width))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Cascade topology in which the single output unit has no learned
/// weights of its own: on every forward pass the hidden layer's
/// activations are copied into the output layer's weight row, and the
/// output unit reads the *original network input* rather than the hidden
/// output. The output therefore computes
/// `f(Σ_i hidden_output[i] * input[i])`.
///
/// Only the hidden layer is trained; the output layer's parameters are
/// overwritten by the mirror on the next forward pass.
#[derive(Debug, Clone)]
pub struct MirroredCascadeNetwork {
    description: String,
    use_bias: bool,
    input_width: usize,
    hidden_width: usize,
    hidden: Layer,
    output: Layer,
}

impl MirroredCascadeNetwork {
    /// The mirror writes a hidden-width activation vector into an
    /// input-width weight row, so the two widths must agree.
    pub fn new(use_bias: bool, input_width: usize, hidden_width: usize) -> Self {
        assert_eq!(
            hidden_width, input_width,
            "mirrored cascade requires hidden_width == input_width"
        );
        MirroredCascadeNetwork {
            description: format!("mirrored cascade {}-{}-1 network", input_width, hidden_width),
            use_bias,
            input_width,
            hidden_width,
            hidden: Layer::new(input_width, hidden_width, ActivationType::Htan, use_bias),
            output: Layer::new(input_width, 1, ActivationType::Htan, use_bias),
        }
    }

    pub fn hidden(&self) -> &Layer {
        &self.hidden
    }

    pub fn output(&self) -> &Layer {
        &self.output
    }
}

impl Network for MirroredCascadeNetwork {
    fn forward_pass(&mut self, input: &Array1<f32>) -> Array1<f32> {
        let hidden_output = self.hidden.forward(input);

        // Mirror: copy the hidden activations into the output layer's
        // weight row before its forward pass. The output layer then
        // consumes the original network input, not the hidden output.
        self.output.weights.row_mut(0).assign(&hidden_output);
        self.output.forward(input)
    }

    fn backward_pass(&mut self, expected: &Array1<f32>, learning_rate: f32, momentum: f32) {
        let output_values = self.output.last_output.clone();
        let output_errors = self.output.errors_with_expected_outputs(expected, &output_values);

        // Cascade-specific error rule: the output unit's weights are the
        // mirrored hidden activations, so each hidden unit's error is the
        // single output error scaled by the corresponding component of
        // the output layer's last input (the network input).
        let hidden_errors = Array1::from_shape_fn(self.hidden_width, |i| {
            output_errors[0] * self.output.last_input[i]
        });
        self.hidden.last_errors = hidden_errors.clone();

        let hidden_input = self.hidden.last_input.clone();
        self.hidden
            .weight_changes(&hidden_errors, &hidden_input, learning_rate, momentum);
    }

    fn apply_weight_changes(&mut self) {
        // The output layer is never trained; its weights are mirrored.
        if let Some(delta) = self.hidden.last_delta.clone() {
            self.hidden.apply_weight_changes(&delta);
        }
    }

    fn randomize_weights(&mut self, min: f32, max: f32) {
        self.hidden.randomize_params(min, max);
        self.output.randomize_params(min, max);
    }

    fn generate_new_network(&self) -> Box<dyn Network> {
        Box::new(MirroredCascadeNetwork::new(
            self.use_bias,
            self.input_width,
            self.hidden_width,
        ))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
