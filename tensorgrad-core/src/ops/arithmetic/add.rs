// tensorgrad-core/src/ops/arithmetic/add.rs

use ndarray::ArrayD;

use crate::error::TensorGradError;
use crate::ops::broadcast::{broadcast_shapes, broadcast_to, reduce_to_shape};
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::{IntoTensor, Tensor};

/// Elementwise addition with broadcasting.
///
/// The gradient of each input is the upstream gradient, summed back down
/// over the axes that input was broadcast along.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl Operation for Add {
    fn name(&self) -> &'static str {
        "add"
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
        Ok(&a + &b)
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        _output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        reduce_to_shape(upstream, inputs[index].shape())
    }
}

/// Performs element-wise addition of two tensors with broadcasting.
///
/// `b` may be a tensor of the same graph or any literal accepted by
/// [`IntoTensor`].
///
/// # Errors
/// `BroadcastError` if the shapes cannot be broadcast together,
/// `GraphMismatch` if `b` belongs to another graph.
pub fn add_op<B: IntoTensor>(a: &Tensor, b: B) -> Result<Tensor, TensorGradError> {
    let b = a.coerce(b)?;
    record_op(Add, a.graph(), &[a, &b])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
