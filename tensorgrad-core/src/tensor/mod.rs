// src/tensor/mod.rs

use ndarray::{ArrayD, IxDyn};

use crate::autograd::{Dependency, Graph, NodeId};
use crate::error::TensorGradError;
use crate::tensor_data::TensorData;

mod autograd_methods;
pub mod convert;
pub mod create;
mod inplace_ops;
mod traits;

pub use convert::{IntoArray, IntoTensor};
pub use create::{full, ones, ones_like, rand, randn, zeros, zeros_like};

/// A node of the computation graph.
///
/// `Tensor` is a handle made of the owning [`Graph`] and the node's
/// [`NodeId`]. Cloning it is cheap and yields another handle onto the same
/// node: mutations (new data, gradient accumulation) are visible through all
/// clones. A node with no handle left is kept while a live node depends on it
/// and is reclaimed otherwise (see [`Graph::collect_garbage`]).
pub struct Tensor {
    pub(crate) graph: Graph,
    pub(crate) id: NodeId,
}

impl Tensor {
    /// Creates a leaf tensor in `graph`.
    ///
    /// `data` can be a scalar, a `Vec<f64>`, a slice or any `ndarray` array.
    /// When `requires_grad` is true, a zero gradient of the same shape is
    /// allocated immediately.
    pub fn new<A: IntoArray>(graph: &Graph, data: A, requires_grad: bool) -> Self {
        graph.insert(TensorData::leaf(data.into_array(), requires_grad))
    }

    /// Creates a leaf tensor from flat row-major data and a shape.
    ///
    /// # Errors
    /// `TensorCreationError` if `data.len()` does not match the number of
    /// elements described by `shape`.
    pub fn from_vec(
        graph: &Graph,
        data: Vec<f64>,
        shape: Vec<usize>,
        requires_grad: bool,
    ) -> Result<Self, TensorGradError> {
        let data_len = data.len();
        let array = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map_err(|_| TensorGradError::TensorCreationError { data_len, shape })?;
        Ok(Self::new(graph, array, requires_grad))
    }

    /// Takes a new handle onto an existing node.
    pub(crate) fn from_parts(graph: Graph, id: NodeId) -> Self {
        graph.acquire(id);
        Tensor { graph, id }
    }

    /// Wraps the handle counted by `Graph::insert`.
    pub(crate) fn from_owned_handle(graph: Graph, id: NodeId) -> Self {
        Tensor { graph, id }
    }

    /// Stable index of this node in its graph.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The graph this tensor belongs to.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns a copy of the forward value.
    pub fn data(&self) -> ArrayD<f64> {
        self.graph.read(self.id, |node| node.data.clone())
    }

    /// Replaces the forward value and discards the accumulated gradient.
    ///
    /// This does not touch `depends_on`: the node keeps its lineage, but the
    /// new value is not differentiable with respect to it.
    pub fn set_data<A: IntoArray>(&self, data: A) {
        let data = data.into_array();
        self.graph.write(self.id, |node| node.set_data(data));
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.graph.read(self.id, |node| node.shape().to_vec())
    }

    pub fn ndim(&self) -> usize {
        self.graph.read(self.id, |node| node.data.ndim())
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.graph.read(self.id, |node| node.numel())
    }

    /// Returns the value of a scalar-shaped (or single element) tensor.
    pub fn item(&self) -> Option<f64> {
        self.graph.read(self.id, |node| {
            if node.numel() == 1 {
                node.data.iter().next().copied()
            } else {
                None
            }
        })
    }

    /// The edges to the inputs that produced this tensor, in recording order.
    pub fn depends_on(&self) -> Vec<Dependency> {
        self.graph.read(self.id, |node| node.depends_on.clone())
    }

    /// True for tensors that were not produced by a tracked operation.
    pub fn is_leaf(&self) -> bool {
        self.graph.read(self.id, |node| node.depends_on.is_empty())
    }

    /// Resolves `other` to a tensor of this tensor's graph.
    pub(crate) fn coerce<T: IntoTensor>(&self, other: T) -> Result<Tensor, TensorGradError> {
        other.into_tensor(&self.graph)
    }
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Tensor::from_parts(self.graph.clone(), self.id)
    }
}

impl Drop for Tensor {
    fn drop(&mut self) {
        self.graph.release(self.id);
    }
}
