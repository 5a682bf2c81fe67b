//! Coercions accepted wherever a tensor or an array payload is expected.

use ndarray::{arr0, Array, ArrayD, Dimension};

use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Values that can become the payload of a tensor.
pub trait IntoArray {
    fn into_array(self) -> ArrayD<f64>;
}

impl IntoArray for f64 {
    fn into_array(self) -> ArrayD<f64> {
        arr0(self).into_dyn()
    }
}

impl IntoArray for Vec<f64> {
    fn into_array(self) -> ArrayD<f64> {
        Array::from(self).into_dyn()
    }
}

impl IntoArray for &[f64] {
    fn into_array(self) -> ArrayD<f64> {
        Array::from(self.to_vec()).into_dyn()
    }
}

impl<D: Dimension> IntoArray for Array<f64, D> {
    fn into_array(self) -> ArrayD<f64> {
        self.into_dyn()
    }
}

/// Values accepted where a tensor operand is expected.
///
/// Tensors must come from `graph`. Anything else becomes an untracked leaf
/// in `graph`, with no dependencies.
pub trait IntoTensor {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError>;
}

impl IntoTensor for &Tensor {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        if self.graph.ptr_eq(graph) {
            Ok(self.clone())
        } else {
            Err(TensorGradError::GraphMismatch)
        }
    }
}

impl IntoTensor for Tensor {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        (&self).into_tensor(graph)
    }
}

impl IntoTensor for f64 {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        Ok(Tensor::new(graph, self, false))
    }
}

impl IntoTensor for Vec<f64> {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        Ok(Tensor::new(graph, self, false))
    }
}

impl IntoTensor for &[f64] {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        Ok(Tensor::new(graph, self, false))
    }
}

impl<D: Dimension> IntoTensor for Array<f64, D> {
    fn into_tensor(self, graph: &Graph) -> Result<Tensor, TensorGradError> {
        Ok(Tensor::new(graph, self, false))
    }
}
