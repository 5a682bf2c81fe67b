//! Assertion helpers for tests of code built on tensorgrad.

use approx::assert_relative_eq;
use ndarray::ArrayD;

use crate::autograd::Graph;
use crate::tensor::Tensor;

/// Default tolerance of [`check_array_near`].
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Checks that `actual` has `expected_shape` and, element by element in
/// row-major order, matches `expected_data` within `tolerance`.
///
/// Panics on mismatch.
pub fn check_array_near_tol(
    actual: &ArrayD<f64>,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    let actual_data: Vec<f64> = actual.iter().copied().collect();
    assert_eq!(actual_data.len(), expected_data.len(), "Data length mismatch");
    assert_relative_eq!(
        actual_data.as_slice(),
        expected_data,
        epsilon = tolerance,
        max_relative = tolerance
    );
}

/// [`check_array_near_tol`] with [`DEFAULT_TOLERANCE`].
pub fn check_array_near(actual: &ArrayD<f64>, expected_shape: &[usize], expected_data: &[f64]) {
    check_array_near_tol(actual, expected_shape, expected_data, DEFAULT_TOLERANCE);
}

/// Checks a tensor's forward value.
pub fn check_tensor_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64]) {
    check_array_near(&actual.data(), expected_shape, expected_data);
}

/// Checks a tensor's accumulated gradient. Panics if there is none.
pub fn check_grad_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64]) {
    let grad = actual
        .grad()
        .unwrap_or_else(|| panic!("tensor {} has no gradient", actual.id()));
    check_array_near(&grad, expected_shape, expected_data);
}

/// Creates a leaf from flat data and a shape. Panics on a bad shape.
pub fn create_test_tensor(
    graph: &Graph,
    data: Vec<f64>,
    shape: Vec<usize>,
    requires_grad: bool,
) -> Tensor {
    Tensor::from_vec(graph, data, shape, requires_grad).expect("Failed to create test tensor")
}
