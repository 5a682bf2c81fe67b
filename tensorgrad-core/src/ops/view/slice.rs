// tensorgrad-core/src/ops/view/slice.rs

use ndarray::{ArrayD, IxDyn, SliceInfo, SliceInfoElem};

use crate::error::TensorGradError;
use crate::ops::record_op;
use crate::ops::traits::Operation;
use crate::tensor::Tensor;

/// Represents the different ways to index or slice a tensor dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceArg {
    /// Expands to as many `Full` entries as needed to cover the remaining
    /// axes. At most one per slice.
    Ellipsis,
    /// `start:end:step`. Negative bounds count from the end and out-of-range
    /// bounds are clamped; `None` as end means "to the end". `step` must be
    /// positive.
    Slice(isize, Option<isize>, isize),
    /// Selects a single position and removes the dimension.
    Index(isize),
    /// The whole dimension (`:`).
    Full,
}

/// Shorthand for `SliceArg::Slice(start, Some(end), 1)`.
pub fn s_range(start: isize, end: isize) -> SliceArg {
    SliceArg::Slice(start, Some(end), 1)
}

/// Gather of a sub-array. The backward pass scatters the upstream gradient
/// into zeros shaped like the input, at the same positions.
#[derive(Debug, Clone)]
pub struct Slice {
    elems: Vec<SliceInfoElem>,
}

impl Slice {
    /// Resolves `args` against `shape` into concrete, in-bounds selections.
    ///
    /// Axes not covered by `args` are taken whole.
    pub fn new(args: &[SliceArg], shape: &[usize]) -> Result<Self, TensorGradError> {
        let ellipses = args.iter().filter(|a| **a == SliceArg::Ellipsis).count();
        if ellipses > 1 {
            return Err(slice_error("an index can only have a single ellipsis"));
        }
        let explicit = args.len() - ellipses;
        if explicit > shape.len() {
            return Err(slice_error(format!(
                "too many indices: {} for tensor of rank {}",
                explicit,
                shape.len()
            )));
        }

        let mut elems = Vec::with_capacity(shape.len());
        for arg in args {
            match *arg {
                SliceArg::Ellipsis => {
                    let fill = shape.len() - explicit;
                    for _ in 0..fill {
                        elems.push(full_elem(shape[elems.len()]));
                    }
                }
                SliceArg::Full => elems.push(full_elem(shape[elems.len()])),
                SliceArg::Index(index) => {
                    let axis = elems.len();
                    let len = shape[axis] as isize;
                    let resolved = if index < 0 { index + len } else { index };
                    if resolved < 0 || resolved >= len {
                        return Err(slice_error(format!(
                            "index {} is out of bounds for axis {} with size {}",
                            index, axis, len
                        )));
                    }
                    elems.push(SliceInfoElem::Index(resolved));
                }
                SliceArg::Slice(start, end, step) => {
                    if step <= 0 {
                        return Err(slice_error(format!("step must be positive, got {}", step)));
                    }
                    let len = shape[elems.len()] as isize;
                    let start = clamp_bound(start, len);
                    let end = clamp_bound(end.unwrap_or(len), len).max(start);
                    elems.push(SliceInfoElem::Slice {
                        start,
                        end: Some(end),
                        step,
                    });
                }
            }
        }
        while elems.len() < shape.len() {
            elems.push(full_elem(shape[elems.len()]));
        }
        Ok(Slice { elems })
    }

    fn info(&self) -> Result<SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn>, TensorGradError> {
        SliceInfo::try_from(self.elems.clone()).map_err(|e| slice_error(e.to_string()))
    }

    fn check_rank(&self, array: &ArrayD<f64>) -> Result<(), TensorGradError> {
        if array.ndim() != self.elems.len() {
            return Err(slice_error(format!(
                "slice was resolved for rank {}, got an array of rank {}",
                self.elems.len(),
                array.ndim()
            )));
        }
        Ok(())
    }
}

fn slice_error(message: impl Into<String>) -> TensorGradError {
    TensorGradError::SliceError {
        message: message.into(),
    }
}

fn full_elem(len: usize) -> SliceInfoElem {
    SliceInfoElem::Slice {
        start: 0,
        end: Some(len as isize),
        step: 1,
    }
}

/// Python-style bound: negative counts from the end, then clamp to `[0, len]`.
fn clamp_bound(bound: isize, len: isize) -> isize {
    let bound = if bound < 0 { bound + len } else { bound };
    bound.clamp(0, len)
}

impl Operation for Slice {
    fn name(&self) -> &'static str {
        "slice"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, inputs: &[&ArrayD<f64>]) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_inputs(inputs.len())?;
        let input = inputs[0];
        self.check_rank(input)?;
        let info = self.info()?;
        Ok(input.slice(&info).to_owned())
    }

    fn input_grad(
        &self,
        upstream: &ArrayD<f64>,
        inputs: &[ArrayD<f64>],
        output: &ArrayD<f64>,
        index: usize,
    ) -> Result<ArrayD<f64>, TensorGradError> {
        self.check_index(inputs.len(), index)?;
        let input = &inputs[0];
        self.check_rank(input)?;
        if upstream.shape() != output.shape() {
            return Err(TensorGradError::ShapeMismatch {
                expected: output.shape().to_vec(),
                actual: upstream.shape().to_vec(),
                operation: "slice backward".to_string(),
            });
        }
        let info = self.info()?;
        let mut grad = ArrayD::<f64>::zeros(input.raw_dim());
        let mut region = grad.slice_mut(&info);
        region += upstream;
        Ok(grad)
    }
}

/// Selects a sub-array of `a` described by `args`.
///
/// # Example
/// ```
/// use tensorgrad_core::{ops::s_range, Graph, Tensor};
/// let graph = Graph::new();
/// let x = Tensor::new(&graph, vec![0.0, 1.0, 2.0, 3.0], true);
/// let y = x.slice(&[s_range(1, 3)]).unwrap();
/// assert_eq!(y.data().into_raw_vec(), vec![1.0, 2.0]);
/// ```
///
/// # Errors
/// `SliceError` for out-of-range indices, more indices than axes, several
/// ellipses, or a non-positive step.
pub fn slice_op(a: &Tensor, args: &[SliceArg]) -> Result<Tensor, TensorGradError> {
    let op = Slice::new(args, &a.shape())?;
    record_op(op, a.graph(), &[a])
}

impl Tensor {
    /// Returns a copy of the selected sub-array as a new node.
    /// See [`slice_op`].
    pub fn slice(&self, args: &[SliceArg]) -> Result<Tensor, TensorGradError> {
        slice_op(self, args)
    }
}

#[cfg(test)]
#[path = "slice_test.rs"]
mod tests;
