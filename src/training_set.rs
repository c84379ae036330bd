use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A named classification problem: parallel sequences of input vectors
/// and scalar expected outputs, index-aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSet {
    pub name: String,
    pub inputs: Vec<Array1<f32>>,
    pub outputs: Vec<f32>,
}

impl TrainingSet {
    pub fn new(name: &str, inputs: Vec<Vec<f32>>, outputs: Vec<f32>) -> Self {
        TrainingSet {
            name: name.to_string(),
            inputs: inputs.into_iter().map(Array1::from_vec).collect(),
            outputs,
        }
    }

    /// OR truth table over ±1 inputs with ±0.9 targets
    pub fn or_set() -> Self {
        TrainingSet::new(
            "OR",
            vec![
                vec![-1.0, -1.0],
                vec![-1.0, 1.0],
                vec![1.0, -1.0],
                vec![1.0, 1.0],
            ],
            vec![-0.9, 0.9, 0.9, 0.9],
        )
    }

    /// XOR truth table over ±1 inputs with ±0.9 targets
    pub fn xor_set() -> Self {
        TrainingSet::new(
            "XOR",
            vec![
                vec![-1.0, -1.0],
                vec![-1.0, 1.0],
                vec![1.0, -1.0],
                vec![1.0, 1.0],
            ],
            vec![-0.9, 0.9, 0.9, -0.9],
        )
    }

    /// OR table with a constant context component prepended to every
    /// input row, used by the interference studies to tag the problem.
    pub fn or_set_with_context(context: f32) -> Self {
        TrainingSet::or_set().with_context("OR+context", context)
    }

    /// XOR table with a constant context component prepended
    pub fn xor_set_with_context(context: f32) -> Self {
        TrainingSet::xor_set().with_context("XOR+context", context)
    }

    fn with_context(self, name: &str, context: f32) -> Self {
        let inputs = self
            .inputs
            .iter()
            .map(|row| {
                let mut extended = Vec::with_capacity(row.len() + 1);
                extended.push(context);
                extended.extend(row.iter().copied());
                extended
            })
            .collect();
        TrainingSet::new(name, inputs, self.outputs)
    }

    /// Returns a copy of this set with its rows in a freshly shuffled
    /// order. A Fisher–Yates pass over index positions permutes both
    /// sequences identically, so input/output alignment is preserved.
    pub fn random_set(&self) -> TrainingSet {
        let mut order: Vec<usize> = (0..self.inputs.len()).collect();
        for i in (1..order.len()).rev() {
            let j = fastrand::usize(..=i);
            order.swap(i, j);
        }

        TrainingSet {
            name: self.name.clone(),
            inputs: order.iter().map(|&i| self.inputs[i].clone()).collect(),
            outputs: order.iter().map(|&i| self.outputs[i]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        let or = TrainingSet::or_set();
        assert_eq!(or.len(), 4);
        assert_eq!(or.inputs.len(), or.outputs.len());
        assert_eq!(or.outputs, vec![-0.9, 0.9, 0.9, 0.9]);

        let xor = TrainingSet::xor_set();
        assert_eq!(xor.outputs, vec![-0.9, 0.9, 0.9, -0.9]);
    }

    #[test]
    fn test_context_component_prepended() {
        let set = TrainingSet::xor_set_with_context(1.0);
        assert_eq!(set.inputs[0].len(), 3);
        for row in &set.inputs {
            assert_eq!(row[0], 1.0);
        }
        // Targets are untouched
        assert_eq!(set.outputs, TrainingSet::xor_set().outputs);
    }

    #[test]
    fn test_random_set_preserves_pairing() {
        let set = TrainingSet::xor_set();
        let shuffled = set.random_set();

        assert_eq!(shuffled.len(), set.len());
        // Every shuffled row must be some original row, pairing intact.
        for (input, &output) in shuffled.inputs.iter().zip(&shuffled.outputs) {
            let found = set
                .inputs
                .iter()
                .zip(&set.outputs)
                .any(|(i, &o)| i == input && o == output);
            assert!(found, "shuffled row {:?} -> {} not in original", input, output);
        }
        // And no row may be duplicated: the multiset of inputs matches.
        for original in &set.inputs {
            let in_original = set.inputs.iter().filter(|i| *i == original).count();
            let in_shuffled = shuffled.inputs.iter().filter(|i| *i == original).count();
            assert_eq!(in_original, in_shuffled);
        }
    }
}
