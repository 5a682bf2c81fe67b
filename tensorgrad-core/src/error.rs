use thiserror::Error;

/// Custom error type for the tensorgrad engine.
///
/// Every failure is a programmer error surfaced synchronously; nothing here
/// is transient or retried.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum TensorGradError {
    #[error("Called backward on a tensor that does not require grad")]
    UngradableTensor,

    #[error("A seed gradient must be supplied for non-scalar tensor of shape {shape:?}")]
    MissingSeedGradient { shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Operation {operation} expects a tensor of rank {expected}, got rank {actual}")]
    RankMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Cannot multiply {lhs:?} by {rhs:?} during operation {operation}: columns of the left operand must match rows of the right")]
    MatMulShapeMismatch {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
        operation: String,
    },

    #[error("Operation {operation} takes {expected} inputs, got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Operation {operation} has no input {index} (it takes {arity})")]
    InvalidInputIndex {
        operation: String,
        index: usize,
        arity: usize,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Gradient for node {node} has shape {actual:?}, but the node's data has shape {expected:?}")]
    InvalidShape {
        node: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Axis {axis} is out of bounds for tensor of rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    #[error("Slice error: {message}")]
    SliceError { message: String },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Tensors belong to different computation graphs")]
    GraphMismatch,
}
