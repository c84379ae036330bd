/// Enum representing the supported activation function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    Htan,
    Logsig,
    Linear,
}

impl ActivationType {
    /// Applies the activation function to a given input
    pub fn apply(&self, x: f32) -> f32 {
        match self {
            ActivationType::Htan => x.tanh(),
            ActivationType::Logsig => 1.0 / (1.0 + (-x).exp()),
            ActivationType::Linear => x,
        }
    }

    /// Computes the derivative of the activation function.
    ///
    /// Takes the *output* of the activation, not its input: for
    /// `y = f(x)` this returns `df/dx` expressed in terms of `y`, so
    /// callers pass the already-computed activation value back in.
    pub fn derivative(&self, y: f32) -> f32 {
        match self {
            ActivationType::Htan => 1.0 - y * y,
            ActivationType::Logsig => y * (1.0 - y),
            ActivationType::Linear => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::EPSILON;

    #[test]
    fn test_activation_functions() {
        // Htan tests
        assert!((ActivationType::Htan.apply(0.0)).abs() < EPSILON);
        assert!(ActivationType::Htan.apply(2.0) > 0.9);

        // Logsig tests
        assert!((ActivationType::Logsig.apply(0.0) - 0.5).abs() < EPSILON);
        assert!(ActivationType::Logsig.apply(-2.0) < 0.5);

        // Linear tests
        assert_eq!(ActivationType::Linear.apply(5.0), 5.0);
        assert_eq!(ActivationType::Linear.apply(-3.5), -3.5);
    }

    #[test]
    fn test_activation_derivatives() {
        // Derivatives take the activation's own output.
        let y = ActivationType::Htan.apply(0.7);
        assert!((ActivationType::Htan.derivative(y) - (1.0 - y * y)).abs() < EPSILON);

        let y = ActivationType::Logsig.apply(0.7);
        assert!((ActivationType::Logsig.derivative(y) - y * (1.0 - y)).abs() < EPSILON);

        // Htan at zero output has unit slope
        assert!((ActivationType::Htan.derivative(0.0) - 1.0).abs() < EPSILON);

        // Logsig at its midpoint output has slope 0.25
        assert!((ActivationType::Logsig.derivative(0.5) - 0.25).abs() < EPSILON);

        // Linear derivative
        assert_eq!(ActivationType::Linear.derivative(5.0), 1.0);
    }
}
