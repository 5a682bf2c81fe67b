use crate::error::TensorGradError;
use crate::ops::arithmetic::{add_op, neg_op};
use crate::tensor::{IntoTensor, Tensor};

/// Performs element-wise subtraction `a - b` with broadcasting.
///
/// Recorded as `a + (-b)`: one `Negate` node and one `Add` node, so the
/// gradient of `b` is the negated, broadcast-reduced upstream gradient.
pub fn sub_op<B: IntoTensor>(a: &Tensor, b: B) -> Result<Tensor, TensorGradError> {
    let b = a.coerce(b)?;
    let negated = neg_op(&b)?;
    add_op(a, &negated)
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
