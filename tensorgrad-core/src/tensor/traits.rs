// src/tensor/traits.rs
//
// Formatting and operator overloads. The operators wrap the fallible `_op`
// functions and panic on error, the way `ndarray` arithmetic panics on
// incompatible shapes. Use the `_op` functions to handle errors.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::TensorGradError;
use crate::ops::{add_op, mul_op, neg_op, sub_op};
use crate::tensor::{IntoTensor, Tensor};

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.read(self.id, |node| {
            f.debug_struct("Tensor")
                .field("id", &self.id)
                .field("shape", &node.shape())
                .field("requires_grad", &node.requires_grad)
                .field("has_grad", &node.grad.is_some())
                .field("depends_on", &node.depends_on.len())
                .finish()
        })
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.read(self.id, |node| {
            write!(f, "Tensor({}, requires_grad={})", node.data, node.requires_grad)
        })
    }
}

fn unwrap_op(result: Result<Tensor, TensorGradError>, op: &str) -> Tensor {
    match result {
        Ok(tensor) => tensor,
        Err(e) => panic!("tensor {} failed: {}", op, e),
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op_fn:ident, $label:literal) => {
        impl<R: IntoTensor> $trait<R> for &Tensor {
            type Output = Tensor;
            fn $method(self, rhs: R) -> Tensor {
                unwrap_op($op_fn(self, rhs), $label)
            }
        }

        impl<R: IntoTensor> $trait<R> for Tensor {
            type Output = Tensor;
            fn $method(self, rhs: R) -> Tensor {
                unwrap_op($op_fn(&self, rhs), $label)
            }
        }
    };
}

impl_binary_op!(Add, add, add_op, "addition");
impl_binary_op!(Sub, sub, sub_op, "subtraction");
impl_binary_op!(Mul, mul, mul_op, "multiplication");

impl Neg for &Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        unwrap_op(neg_op(self), "negation")
    }
}

impl Neg for Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        -&self
    }
}

// Reflected forms with a scalar on the left: `2.0 * &t`, `1.0 - &t`.

impl Add<&Tensor> for f64 {
    type Output = Tensor;
    fn add(self, rhs: &Tensor) -> Tensor {
        unwrap_op(add_op(rhs, self), "addition")
    }
}

impl Add<Tensor> for f64 {
    type Output = Tensor;
    fn add(self, rhs: Tensor) -> Tensor {
        self + &rhs
    }
}

impl Mul<&Tensor> for f64 {
    type Output = Tensor;
    fn mul(self, rhs: &Tensor) -> Tensor {
        unwrap_op(mul_op(rhs, self), "multiplication")
    }
}

impl Mul<Tensor> for f64 {
    type Output = Tensor;
    fn mul(self, rhs: Tensor) -> Tensor {
        self * &rhs
    }
}

impl Sub<&Tensor> for f64 {
    type Output = Tensor;
    fn sub(self, rhs: &Tensor) -> Tensor {
        let result = rhs.coerce(self).and_then(|lhs| sub_op(&lhs, rhs));
        unwrap_op(result, "subtraction")
    }
}

impl Sub<Tensor> for f64 {
    type Output = Tensor;
    fn sub(self, rhs: Tensor) -> Tensor {
        self - &rhs
    }
}
