use approx::assert_relative_eq;
use tensorgrad_core::ndarray::ArrayD;
use tensorgrad_core::{Graph, Tensor};

// Each integration test binary uses a different subset of these helpers.

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn create_test_tensor(graph: &Graph, data: Vec<f64>, shape: Vec<usize>, requires_grad: bool) -> Tensor {
    Tensor::from_vec(graph, data, shape, requires_grad).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn assert_array_eq(actual: &ArrayD<f64>, expected_shape: &[usize], expected: &[f64]) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    let actual: Vec<f64> = actual.iter().copied().collect();
    assert_relative_eq!(actual.as_slice(), expected, epsilon = 1e-9);
}

#[allow(dead_code)]
pub fn assert_grad_eq(tensor: &Tensor, expected_shape: &[usize], expected: &[f64]) {
    let grad = tensor.grad().expect("tensor should hold a gradient");
    assert_array_eq(&grad, expected_shape, expected);
}
