use ndarray::{ArrayD, Axis, IxDyn};

use crate::error::TensorGradError;
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::Tensor;

/// Sum over one axis, or over all axes when `axis` is `None`.
///
/// The reduced axis is removed (no keep-dims). Summing everything yields a
/// 0-dimensional tensor. The backward pass broadcasts the upstream gradient
/// back out to the input shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumReduce {
    pub axis: Option<usize>,
}

impl SumReduce {
    fn check_axis(&self, rank: usize) -> Result<(), TensorGradError> {
        match self.axis {
            Some(axis) if axis >= rank => Err(TensorGradError::AxisOutOfBounds { axis, rank }),
            _ => Ok(()),
        }
    }
}

impl Operation for SumReduce {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_inputs(inputs.len())?;
        let input = inputs[0];
        self.check_axis(input.ndim())?;
        Ok(match self.axis {
            Some(axis) => input.sum_axis(Axis(axis)),
            None => ArrayD::from_elem(IxDyn(&[]), input.sum()),
        })
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        _output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        let input_shape = inputs[0].shape();
        let expanded = match self.axis {
            Some(axis) => {
                if axis > upstream.ndim() {
                    return Err(TensorGradError::AxisOutOfBounds {
                        axis,
                        rank: upstream.ndim(),
                    });
                }
                upstream.view().insert_axis(Axis(axis))
            }
            None => upstream.view(),
        };
        expanded
            .broadcast(IxDyn(input_shape))
            .map(|view| view.to_owned())
            .ok_or_else(|| TensorGradError::ShapeMismatch {
                expected: input_shape.to_vec(),
                actual: upstream.shape().to_vec(),
                operation: "sum backward".to_string(),
            })
    }
}

/// Sums `a` over `axis`, or over every axis when `axis` is `None`.
///
/// # Errors
/// `AxisOutOfBounds` if `axis` is not smaller than the rank of `a`.
pub fn sum_op(a: &Tensor, axis: Option<usize>) -> Result<Tensor, TensorGradError> {
    record_op(SumReduce { axis }, a.graph(), &[a])
}

impl Tensor {
    /// Sum of all elements, as a 0-dimensional tensor.
    pub fn sum(&self) -> Result<Tensor, TensorGradError> {
        sum_op(self, None)
    }

    /// Sum along one axis; the axis is removed from the result.
    pub fn sum_axis(&self, axis: usize) -> Result<Tensor, TensorGradError> {
        sum_op(self, Some(axis))
    }
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
