// src/tensor/create.rs

use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::autograd::Graph;
use crate::tensor::Tensor;

/// Creates a leaf filled with zeros.
pub fn zeros(graph: &Graph, shape: &[usize], requires_grad: bool) -> Tensor {
    full(graph, shape, 0.0, requires_grad)
}

/// Creates a leaf filled with ones.
pub fn ones(graph: &Graph, shape: &[usize], requires_grad: bool) -> Tensor {
    full(graph, shape, 1.0, requires_grad)
}

/// Creates a leaf filled with `value`.
pub fn full(graph: &Graph, shape: &[usize], value: f64, requires_grad: bool) -> Tensor {
    Tensor::new(graph, ArrayD::from_elem(IxDyn(shape), value), requires_grad)
}

/// Untracked zeros shaped like `tensor`, in the same graph.
pub fn zeros_like(tensor: &Tensor) -> Tensor {
    zeros(tensor.graph(), &tensor.shape(), false)
}

/// Untracked ones shaped like `tensor`, in the same graph.
/// The usual seed for `backward` on a non-scalar result.
pub fn ones_like(tensor: &Tensor) -> Tensor {
    ones(tensor.graph(), &tensor.shape(), false)
}

/// Uniform samples in `[0, 1)` drawn from the thread-local generator.
pub fn rand(graph: &Graph, shape: &[usize], requires_grad: bool) -> Tensor {
    rand_with(&mut rand::thread_rng(), graph, shape, requires_grad)
}

/// Standard normal samples drawn from the thread-local generator.
pub fn randn(graph: &Graph, shape: &[usize], requires_grad: bool) -> Tensor {
    randn_with(&mut rand::thread_rng(), graph, shape, requires_grad)
}

/// Like [`rand`], drawing from `rng`. Pass a seeded `StdRng` for
/// reproducible values.
pub fn rand_with<R: Rng + ?Sized>(
    rng: &mut R,
    graph: &Graph,
    shape: &[usize],
    requires_grad: bool,
) -> Tensor {
    let data: ArrayD<f64> = ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen::<f64>());
    Tensor::new(graph, data, requires_grad)
}

/// Like [`randn`], drawing from `rng`.
pub fn randn_with<R: Rng + ?Sized>(
    rng: &mut R,
    graph: &Graph,
    shape: &[usize],
    requires_grad: bool,
) -> Tensor {
    let data: ArrayD<f64> =
        ArrayD::from_shape_simple_fn(IxDyn(shape), || StandardNormal.sample(&mut *rng));
    Tensor::new(graph, data, requires_grad)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
