// src/tensor_data.rs
use ndarray::ArrayD;

use crate::autograd::Dependency;

/// Internal storage and metadata for one node of the computation graph.
///
/// Nodes live inside a [`Graph`](crate::autograd::graph::Graph) arena and are
/// reached through [`Tensor`](crate::Tensor) handles. Edges to input nodes are
/// stored as indices in `depends_on`, so a node is never exclusively owned by
/// the results built from it.
#[derive(Debug)]
pub struct TensorData {
    /// The forward value of the node.
    pub(crate) data: ArrayD<f64>,
    /// Flag fixed at construction. If true, gradients accumulate into `grad`.
    pub(crate) requires_grad: bool,
    /// Gradient accumulator, same shape as `data`.
    /// Absent when `requires_grad` is false or after `data` was replaced.
    pub(crate) grad: Option<ArrayD<f64>>,
    /// One entry per tracked input that produced this node. Empty for leaves.
    pub(crate) depends_on: Vec<Dependency>,
}

impl TensorData {
    /// Creates a node. When `requires_grad` is set, the gradient accumulator
    /// is materialized as zeros straight away.
    pub fn new(data: ArrayD<f64>, requires_grad: bool, depends_on: Vec<Dependency>) -> Self {
        let grad = requires_grad.then(|| ArrayD::zeros(data.raw_dim()));
        TensorData {
            data,
            requires_grad,
            grad,
            depends_on,
        }
    }

    /// Creates a leaf node with a fresh, empty dependency list.
    pub fn leaf(data: ArrayD<f64>, requires_grad: bool) -> Self {
        Self::new(data, requires_grad, Vec::new())
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Replaces the payload. The accumulated gradient was computed for the old
    /// value, so it is discarded.
    pub fn set_data(&mut self, data: ArrayD<f64>) {
        self.data = data;
        self.grad = None;
    }

    /// (Re)allocates the gradient accumulator as zeros.
    /// Nodes that do not track gradients never hold one.
    pub fn zero_grad(&mut self) {
        if self.requires_grad {
            self.grad = Some(ArrayD::zeros(self.data.raw_dim()));
        }
    }
}
