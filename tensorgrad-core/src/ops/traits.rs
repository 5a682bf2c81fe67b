use std::fmt::Debug;

use ndarray::ArrayD;

use crate::error::TensorGradError;

/// Uniform interface of the differentiable operations.
///
/// `forward` computes the result array from the input values. `input_grad`
/// is the vector-Jacobian product for one input: given the gradient flowing
/// into the result (`upstream`, shaped like `output`), it returns the
/// gradient for `inputs[index]`, shaped exactly like that input.
///
/// Both methods see the input values as they were when the result node was
/// recorded. Implementations start with [`Operation::check_inputs`] or
/// [`Operation::check_index`], so a wrong number of inputs is an error
/// rather than an out-of-bounds panic.
pub trait Operation: Debug {
    /// Name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Number of inputs the operation takes.
    fn arity(&self) -> usize;

    fn check_inputs(&self, count: usize) -> Result<(), TensorGradError> {
        if count != self.arity() {
            return Err(TensorGradError::ArityMismatch {
                operation: self.name().to_string(),
                expected: self.arity(),
                actual: count,
            });
        }
        Ok(())
    }

    /// Validates the input count and that `index` names one of the inputs.
    fn check_index(&self, count: usize, index: usize) -> Result<(), TensorGradError> {
        self.check_inputs(count)?;
        if index >= self.arity() {
            return Err(TensorGradError::InvalidInputIndex {
                operation: self.name().to_string(),
                index,
                arity: self.arity(),
            });
        }
        Ok(())
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError>;

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError>;

    /// Gradients for every input, in input order.
    fn backward(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        output: &ArrayD<f64>,
    ) -> Result<Vec<ArrayD<f64>>, TensorGradError> {
        (0..inputs.len())
            .map(|index| self.input_grad(upstream, inputs, output, index))
            .collect()
    }
}
