//! # Autograd
//!
//! The graph arena, the dependency edges between nodes and the backward
//! engine that walks them.

use std::fmt;
use std::rc::Rc;

use ndarray::ArrayD;

use crate::error::TensorGradError;

pub mod backward;
pub mod grad_check;
pub mod graph;

pub use grad_check::{check_grad, GradCheckConfig, GradCheckError};
pub use graph::{Graph, NodeId};

/// Local-gradient function of one edge: maps an upstream gradient shaped like
/// the result to a gradient shaped like the input (a vector-Jacobian product).
pub type GradFn = Rc<dyn Fn(&ArrayD<f64>) -> Result<ArrayD<f64>, TensorGradError>>;

/// An edge from a result node to one of the inputs that produced it.
#[derive(Clone)]
pub struct Dependency {
    pub(crate) node: NodeId,
    pub(crate) grad_fn: GradFn,
}

impl Dependency {
    pub fn new(node: NodeId, grad_fn: GradFn) -> Self {
        Dependency { node, grad_fn }
    }

    /// The input node this edge points to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Applies the local-gradient function to an upstream gradient.
    pub fn grad(&self, upstream: &ArrayD<f64>) -> Result<ArrayD<f64>, TensorGradError> {
        (self.grad_fn)(upstream)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}
