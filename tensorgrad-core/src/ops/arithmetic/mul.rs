// tensorgrad-core/src/ops/arithmetic/mul.rs

use ndarray::ArrayD;

use crate::error::TensorGradError;
use crate::ops::broadcast::{broadcast_shapes, broadcast_to, reduce_to_shape};
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::{IntoTensor, Tensor};

/// Elementwise multiplication with broadcasting.
///
/// Product rule: the gradient of one input is the upstream gradient times
/// the other input's value, summed back down to the input's shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl Operation for Multiply {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_inputs(inputs.len())?;
        let (a, b) = (inputs[0], inputs[1]);
        let shape = broadcast_shapes(a.shape(), b.shape())?;
        let a = broadcast_to(a, &shape, self.name())?;
        let b = broadcast_to(b, &shape, self.name())?;
        Ok(&a * &b)
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        _output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        let other = &inputs[1 - index];
        let other = broadcast_to(other, upstream.shape(), self.name())?;
        let local = upstream * &other;
        reduce_to_shape(&local, inputs[index].shape())
    }
}

/// Performs element-wise multiplication of two tensors with broadcasting.
///
/// # Errors
/// `BroadcastError` if the shapes cannot be broadcast together,
/// `GraphMismatch` if `b` belongs to another graph.
pub fn mul_op<B: IntoTensor>(a: &Tensor, b: B) -> Result<Tensor, TensorGradError> {
    let b = a.coerce(b)?;
    record_op(Multiply, a.graph(), &[a, &b])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
