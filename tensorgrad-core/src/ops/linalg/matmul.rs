// Matrix multiplication of 2-D tensors.

use ndarray::{ArrayD, ArrayView2, Ix2};

use crate::error::TensorGradError;
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::{IntoTensor, Tensor};

/// Matrix product `C = A @ B` of an `(m, k)` and a `(k, n)` matrix.
///
/// Gradients: `dA = G @ Bᵀ` and `dB = Aᵀ @ G`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatMul;

impl MatMul {
    fn as_matrix<'a>(
        array: &'a ArrayD<f64>,
        operation: &str,
    ) -> Result<ArrayView2<'a, f64>, TensorGradError> {
        array
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| TensorGradError::RankMismatch {
                expected: 2,
                actual: array.ndim(),
                operation: operation.to_string(),
            })
    }

    fn product(
        lhs: ArrayView2<'_, f64>,
        rhs: ArrayView2<'_, f64>,
        operation: &str,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        if lhs.ncols() != rhs.nrows() {
            return Err(TensorGradError::MatMulShapeMismatch {
                lhs: lhs.shape().to_vec(),
                rhs: rhs.shape().to_vec(),
                operation: operation.to_string(),
            });
        }
        Ok(lhs.dot(&rhs).into_dyn())
    }
}

impl Operation for MatMul {
    fn name(&self) -> &'static str {
        "matmul"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_inputs(inputs.len())?;
        let a = Self::as_matrix(inputs[0], self.name())?;
        let b = Self::as_matrix(inputs[1], self.name())?;
        Self::product(a, b, self.name())
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        _output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        let g = Self::as_matrix(upstream, "matmul backward")?;
        if index == 0 {
            let b = Self::as_matrix(&inputs[1], "matmul backward (lhs)")?;
            Self::product(g, b.t(), "matmul backward (lhs: upstream @ rhsᵀ)")
        } else {
            let a = Self::as_matrix(&inputs[0], "matmul backward (rhs)")?;
            Self::product(a.t(), g, "matmul backward (rhs: lhsᵀ @ upstream)")
        }
    }
}

/// Multiplies two 2-D tensors.
///
/// # Errors
/// `RankMismatch` if an operand is not 2-D, `MatMulShapeMismatch` if the
/// columns of `a` do not match the rows of `b`.
pub fn matmul_op<B: IntoTensor>(a: &Tensor, b: B) -> Result<Tensor, TensorGradError> {
    let b = a.coerce(b)?;
    record_op(MatMul, a.graph(), &[a, &b])
}

impl Tensor {
    /// Matrix product `self @ other`. See [`matmul_op`].
    pub fn matmul<B: IntoTensor>(&self, other: B) -> Result<Tensor, TensorGradError> {
        matmul_op(self, other)
    }
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
