use ndarray::ArrayD;

use crate::autograd::backward::run_backward;
use crate::error::TensorGradError;
use crate::tensor::Tensor;

impl Tensor {
    /// Checks if this tensor accumulates gradients.
    pub fn requires_grad(&self) -> bool {
        self.graph.read(self.id, |node| node.requires_grad)
    }

    /// Returns a copy of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<ArrayD<f64>> {
        self.graph.read(self.id, |node| node.grad.clone())
    }

    /// Resets the gradient accumulator to zeros shaped like the data.
    /// Does nothing for tensors that do not require grad.
    pub fn zero_grad(&self) {
        self.graph.write(self.id, |node| node.zero_grad());
    }

    /// Performs the backward pass starting from this tensor.
    ///
    /// Every tracked ancestor receives the gradient of this tensor with
    /// respect to it, added to whatever it already holds.
    ///
    /// # Arguments
    /// * `gradient`: seed gradient, shaped like `self`. May be omitted only
    ///   for scalar (0-dimensional) tensors, where it defaults to `1.0`.
    ///
    /// # Errors
    /// * `UngradableTensor` if this tensor does not require grad.
    /// * `MissingSeedGradient` if `gradient` is omitted on a non-scalar tensor.
    /// * `InvalidShape` if the seed or a local gradient has the wrong shape.
    ///
    /// A failed pass leaves gradients partially accumulated; they should be
    /// zeroed and recomputed.
    pub fn backward(&self, gradient: Option<&Tensor>) -> Result<(), TensorGradError> {
        run_backward(self, gradient.map(Tensor::data))
    }
}
