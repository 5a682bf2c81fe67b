//! Broadcasting helpers shared by the elementwise operations.
//!
//! [`reduce_to_shape`] is the adjoint of broadcasting and the single place
//! where broadcast gradients are summed back down. Every broadcasting op uses
//! it for its `input_grad`.

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

use crate::error::TensorGradError;

/// Computes the shape two operands broadcast to (numpy rules: align trailing
/// axes, a size-1 axis stretches to match the other).
pub fn broadcast_shapes(shape1: &[usize], shape2: &[usize]) -> Result<Vec<usize>, TensorGradError> {
    let rank = shape1.len().max(shape2.len());
    let mut result = vec![0; rank];
    for i in 0..rank {
        let dim1 = dim_from_end(shape1, rank - 1 - i);
        let dim2 = dim_from_end(shape2, rank - 1 - i);
        result[i] = match (dim1, dim2) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(TensorGradError::BroadcastError {
                    shape1: shape1.to_vec(),
                    shape2: shape2.to_vec(),
                })
            }
        };
    }
    Ok(result)
}

fn dim_from_end(shape: &[usize], offset: usize) -> usize {
    if offset < shape.len() {
        shape[shape.len() - 1 - offset]
    } else {
        1
    }
}

/// Returns a read-only view of `array` stretched to `shape`.
pub fn broadcast_to<'a>(
    array: &'a ArrayD<f64>,
    shape: &[usize],
    operation: &str,
) -> Result<ArrayViewD<'a, f64>, TensorGradError> {
    array
        .broadcast(IxDyn(shape))
        .ok_or_else(|| TensorGradError::ShapeMismatch {
            expected: shape.to_vec(),
            actual: array.shape().to_vec(),
            operation: operation.to_string(),
        })
}

/// Reduces a gradient shaped like a broadcast result down to `target_shape`.
///
/// Sums over the leading axes the target does not have, then over every axis
/// where the target has size 1 but the gradient does not (keeping the axis).
/// The result has exactly `target_shape`.
///
/// # Errors
/// `ShapeMismatch` if `grad` could not have been broadcast from
/// `target_shape`.
pub fn reduce_to_shape(
    grad: &ArrayD<f64>,
    target_shape: &[usize],
) -> Result<ArrayD<f64>, TensorGradError> {
    if grad.shape() == target_shape {
        return Ok(grad.clone());
    }
    let mismatch = || TensorGradError::ShapeMismatch {
        expected: target_shape.to_vec(),
        actual: grad.shape().to_vec(),
        operation: "reduce_to_shape".to_string(),
    };

    let rank_diff = grad
        .ndim()
        .checked_sub(target_shape.len())
        .ok_or_else(mismatch)?;

    let mut reduced = grad.clone();
    for _ in 0..rank_diff {
        reduced = reduced.sum_axis(Axis(0));
    }

    for (axis, &target_dim) in target_shape.iter().enumerate() {
        let current_dim = reduced.shape()[axis];
        if current_dim == target_dim {
            continue;
        }
        if target_dim != 1 {
            return Err(mismatch());
        }
        reduced = reduced.sum_axis(Axis(axis)).insert_axis(Axis(axis));
    }

    Ok(reduced)
}
