//! The backward engine.
//!
//! Gradients are pushed from the root towards the leaves once per path: a
//! node reachable through several paths is visited, and accumulated into,
//! once for each of them. Contributions of different paths add up by the
//! chain rule, so accumulating (never overwriting) keeps revisits correct.
//! No reverse topological ordering is needed.
//!
//! The walk uses an explicit LIFO worklist instead of recursion. Frames are
//! pushed in reverse dependency order and local gradients are computed when a
//! frame is popped, which reproduces the depth-first order of the recursive
//! formulation exactly while keeping the call stack flat on deep graphs.

use std::rc::Rc;

use log::{debug, trace, warn};
use ndarray::{ArrayD, IxDyn};

use crate::autograd::{Dependency, GradFn, Graph, NodeId};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// One pending visit: the gradient arriving at `node` is `grad_fn(upstream)`,
/// or `upstream` itself for the root.
struct Frame {
    node: NodeId,
    upstream: Rc<ArrayD<f64>>,
    grad_fn: Option<GradFn>,
}

impl Frame {
    fn gradient(&self) -> Result<ArrayD<f64>, TensorGradError> {
        match &self.grad_fn {
            Some(grad_fn) => grad_fn(&self.upstream),
            None => Ok(self.upstream.as_ref().clone()),
        }
    }
}

/// Runs a backward pass from `root`, seeded with `seed` (or `1.0` for scalar
/// roots when `seed` is `None`).
pub(crate) fn run_backward(root: &Tensor, seed: Option<ArrayD<f64>>) -> Result<(), TensorGradError> {
    let graph = root.graph();
    let (requires_grad, shape) =
        graph.read(root.id(), |node| (node.requires_grad, node.shape().to_vec()));
    if !requires_grad {
        return Err(TensorGradError::UngradableTensor);
    }

    let seed = match seed {
        Some(seed) => {
            if seed.shape() != shape.as_slice() {
                return Err(TensorGradError::InvalidShape {
                    node: root.id().index(),
                    expected: shape,
                    actual: seed.shape().to_vec(),
                });
            }
            seed
        }
        None if shape.is_empty() => ArrayD::from_elem(IxDyn(&[]), 1.0),
        None => return Err(TensorGradError::MissingSeedGradient { shape }),
    };

    debug!("backward: starting at node {} (shape {:?})", root.id(), shape);

    let mut worklist = vec![Frame {
        node: root.id(),
        upstream: Rc::new(seed),
        grad_fn: None,
    }];
    let mut visits = 0usize;

    while let Some(frame) = worklist.pop() {
        let grad = frame.gradient()?;
        let depends_on = accumulate(graph, frame.node, &grad)?;
        visits += 1;
        trace!(
            "backward: node {} accumulated, {} dependencies",
            frame.node,
            depends_on.len()
        );

        if depends_on.is_empty() {
            continue;
        }
        let upstream = Rc::new(grad);
        worklist.extend(depends_on.into_iter().rev().map(|dependency| Frame {
            node: dependency.node,
            upstream: Rc::clone(&upstream),
            grad_fn: Some(dependency.grad_fn),
        }));
    }

    debug!("backward: finished after {} node visits", visits);
    Ok(())
}

/// Adds `grad` into the accumulator of `id` and returns the node's
/// dependencies. The arena borrow ends before any `grad_fn` runs.
fn accumulate(
    graph: &Graph,
    id: NodeId,
    grad: &ArrayD<f64>,
) -> Result<Vec<Dependency>, TensorGradError> {
    graph.write(id, |node| {
        if grad.shape() != node.shape() {
            return Err(TensorGradError::InvalidShape {
                node: id.index(),
                expected: node.shape().to_vec(),
                actual: grad.shape().to_vec(),
            });
        }
        if !node.requires_grad {
            return Ok(node.depends_on.clone());
        }
        match node.grad.as_mut() {
            Some(acc) => *acc += grad,
            None => {
                warn!(
                    "backward: node {} had no gradient (data replaced?), starting from zeros",
                    id
                );
                node.grad = Some(grad.clone());
            }
        }
        Ok(node.depends_on.clone())
    })
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
