// src/tensor/inplace_ops.rs
//
// Compound updates that overwrite a node's value. They read the *value* of
// the other operand only and leave `depends_on` untouched, so nothing here is
// differentiable: these are for parameter updates, not for building
// expressions.

use std::ops::{AddAssign, MulAssign, SubAssign};

use log::trace;
use ndarray::ArrayD;

use crate::error::TensorGradError;
use crate::ops::broadcast::{broadcast_shapes, broadcast_to};
use crate::tensor::{IntoTensor, Tensor};

impl Tensor {
    /// `self.data = self.data + other`, broadcasting. Clears the gradient.
    pub fn add_<T: IntoTensor>(&self, other: T) -> Result<(), TensorGradError> {
        self.apply_inplace(other, "add_", |a, b| a + b)
    }

    /// `self.data = self.data - other`, broadcasting. Clears the gradient.
    pub fn sub_<T: IntoTensor>(&self, other: T) -> Result<(), TensorGradError> {
        self.apply_inplace(other, "sub_", |a, b| a - b)
    }

    /// `self.data = self.data * other`, broadcasting. Clears the gradient.
    pub fn mul_<T: IntoTensor>(&self, other: T) -> Result<(), TensorGradError> {
        self.apply_inplace(other, "mul_", |a, b| a * b)
    }

    fn apply_inplace<T, F>(&self, other: T, name: &str, f: F) -> Result<(), TensorGradError>
    where
        T: IntoTensor,
        F: Fn(f64, f64) -> f64,
    {
        let other = self.coerce(other)?;
        let lhs = self.data();
        let rhs = other.data();
        let shape = broadcast_shapes(lhs.shape(), rhs.shape())?;

        let lhs_view = broadcast_to(&lhs, &shape, name)?;
        let rhs_view = broadcast_to(&rhs, &shape, name)?;
        let mut result = ArrayD::<f64>::zeros(lhs_view.raw_dim());
        ndarray::Zip::from(&mut result)
            .and(&lhs_view)
            .and(&rhs_view)
            .for_each(|out, &a, &b| *out = f(a, b));

        trace!("{}: node {} updated in place (shape {:?})", name, self.id, shape);
        self.set_data(result);
        Ok(())
    }
}

// The operator forms panic on error, like the arithmetic operators.

impl<T: IntoTensor> AddAssign<T> for Tensor {
    fn add_assign(&mut self, rhs: T) {
        if let Err(e) = self.add_(rhs) {
            panic!("in-place addition failed: {}", e);
        }
    }
}

impl<T: IntoTensor> SubAssign<T> for Tensor {
    fn sub_assign(&mut self, rhs: T) {
        if let Err(e) = self.sub_(rhs) {
            panic!("in-place subtraction failed: {}", e);
        }
    }
}

impl<T: IntoTensor> MulAssign<T> for Tensor {
    fn mul_assign(&mut self, rhs: T) {
        if let Err(e) = self.mul_(rhs) {
            panic!("in-place multiplication failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "inplace_ops_test.rs"]
mod tests;
