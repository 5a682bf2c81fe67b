//! # Tensor Operations Module (`ops`)
//!
//! The differentiable operations of the engine, grouped by kind.
//!
//! - **Operation structs** (`Add`, `Multiply`, `MatMul`, `Negate`, `Slice`,
//!   `SumReduce`) implement the [`Operation`](traits::Operation) trait: a
//!   forward computation plus a per-input vector-Jacobian product.
//! - **`_op` functions** (`add_op`, `mul_op`, ...) resolve their operands,
//!   run the forward pass and record the result node through
//!   [`record_op`], which builds the dependency list.
//! - **Operators** (`+`, `-`, `*`, unary `-`) on `Tensor` are thin wrappers
//!   around the `_op` functions, see `tensor::traits`.
//!
//! The broadcast-reduction rule shared by every broadcasting op lives in
//! [`broadcast`].

use std::rc::Rc;

use log::trace;
use ndarray::ArrayD;

use crate::autograd::{Dependency, GradFn, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

pub mod arithmetic;
pub mod broadcast;
pub mod linalg;
pub mod reduction;
pub mod traits;
pub mod view;

pub use arithmetic::{add_op, mul_op, neg_op, sub_op, Add, Multiply, Negate};
pub use linalg::{matmul_op, MatMul};
pub use reduction::{sum_op, SumReduce};
pub use traits::Operation;
pub use view::{s_range, slice_op, Slice, SliceArg};

/// Runs `op` forward on `inputs` and records the result node.
///
/// The result requires grad iff any input does. Each tracked input gets a
/// `Dependency` whose `grad_fn` closes over the op, the input values and the
/// output value as they are now, so later `set_data` calls on the inputs do
/// not change already recorded gradients. An input used twice (`a * a`)
/// yields two dependencies on the same node.
///
/// All inputs must belong to `graph`.
pub(crate) fn record_op<O>(
    op: O,
    graph: &Graph,
    inputs: &[&Tensor],
) -> Result<Tensor, TensorGradError>
where
    O: Operation + 'static,
{
    if inputs.iter().any(|t| !t.graph().ptr_eq(graph)) {
        return Err(TensorGradError::GraphMismatch);
    }

    let values: Vec<ArrayD<f64>> = inputs.iter().map(|t| t.data()).collect();
    let output = {
        let refs: Vec<&ArrayD<f64>> = values.iter().collect();
        op.forward(&refs)?
    };

    let tracked: Vec<bool> = inputs.iter().map(|t| t.requires_grad()).collect();
    let requires_grad = tracked.iter().any(|&t| t);

    let mut depends_on = Vec::new();
    if requires_grad {
        let op: Rc<dyn Operation> = Rc::new(op);
        let values: Rc<[ArrayD<f64>]> = values.into();
        let captured_output = Rc::new(output.clone());
        for (index, input) in inputs.iter().enumerate() {
            if !tracked[index] {
                continue;
            }
            let op = Rc::clone(&op);
            let values = Rc::clone(&values);
            let captured_output = Rc::clone(&captured_output);
            let grad_fn: GradFn = Rc::new(move |upstream: &ArrayD<f64>| {
                op.input_grad(upstream, &values, &captured_output, index)
            });
            depends_on.push(Dependency::new(input.id(), grad_fn));
        }
    }

    let result = graph.insert(TensorData::new(output, requires_grad, depends_on));
    trace!(
        "record_op: node {} from inputs {:?} (requires_grad={})",
        result.id(),
        inputs.iter().map(|t| t.id().index()).collect::<Vec<_>>(),
        requires_grad
    );
    Ok(result)
}
