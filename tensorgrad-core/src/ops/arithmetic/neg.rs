use ndarray::ArrayD;

use crate::error::TensorGradError;
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::Tensor;

/// Elementwise negation. The local gradient is `-g`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Negate;

impl Operation for Negate {
    fn name(&self) -> &'static str {
        "neg"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_inputs(inputs.len())?;
        Ok(-inputs[0])
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        _output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        Ok(-upstream)
    }
}

/// Negates every element of `a`.
pub fn neg_op(a: &Tensor) -> Result<Tensor, TensorGradError> {
    record_op(Negate, a.graph(), &[a])
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
