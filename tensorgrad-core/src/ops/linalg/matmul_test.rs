use super::*;
use crate::autograd::{check_grad, GradCheckConfig, GradCheckError, Graph};
use crate::tensor::ones_like;
use crate::utils::testing::{check_grad_near, check_tensor_near};
use ndarray::{arr2, Array2};

#[test]
fn test_matmul_forward() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]), false);
    let b = Tensor::new(&graph, arr2(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]), false);
    let c = a.matmul(&b)?;
    check_tensor_near(&c, &[2, 2], &[58.0, 64.0, 139.0, 154.0]);
    Ok(())
}

#[test]
fn test_matmul_inner_dim_mismatch() {
    let graph = Graph::new();
    let a = Tensor::new(&graph, Array2::<f64>::zeros((2, 3)), false);
    let b = Tensor::new(&graph, Array2::<f64>::zeros((2, 3)), false);
    assert_eq!(
        matmul_op(&a, &b).err(),
        Some(TensorGradError::MatMulShapeMismatch {
            lhs: vec![2, 3],
            rhs: vec![2, 3],
            operation: "matmul".to_string(),
        })
    );
}

#[test]
fn test_matmul_rejects_non_matrix() {
    let graph = Graph::new();
    let a = Tensor::new(&graph, vec![1.0, 2.0], false);
    let b = Tensor::new(&graph, Array2::<f64>::zeros((2, 2)), false);
    assert_eq!(
        matmul_op(&a, &b).err(),
        Some(TensorGradError::RankMismatch {
            expected: 2,
            actual: 1,
            operation: "matmul".to_string(),
        })
    );
    assert!(matches!(
        matmul_op(&b, &a),
        Err(TensorGradError::RankMismatch { expected: 2, actual: 1, .. })
    ));
}

#[test]
fn test_matmul_backward_reports_operand_shapes() {
    // An upstream gradient of the wrong width: (2, 3) instead of (2, 2).
    let a = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn();
    let b = arr2(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]).into_dyn();
    let output = arr2(&[[58.0, 64.0], [139.0, 154.0]]).into_dyn();
    let upstream = Array2::<f64>::ones((2, 3)).into_dyn();
    let inputs = [a, b];

    // dA = G @ Bᵀ: G is (2, 3), Bᵀ is (2, 3).
    assert_eq!(
        MatMul.input_grad(&upstream, &inputs, &output, 0).err(),
        Some(TensorGradError::MatMulShapeMismatch {
            lhs: vec![2, 3],
            rhs: vec![2, 3],
            operation: "matmul backward (lhs: upstream @ rhsᵀ)".to_string(),
        })
    );
    // dB = Aᵀ @ G: Aᵀ is (3, 2), G is (2, 3), which is consistent.
    assert!(MatMul.input_grad(&upstream, &inputs, &output, 1).is_ok());
}

#[test]
fn test_matmul_checks_input_count() {
    let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
    assert_eq!(
        MatMul.forward(&[&a]).err(),
        Some(TensorGradError::ArityMismatch {
            operation: "matmul".to_string(),
            expected: 2,
            actual: 1,
        })
    );
    assert_eq!(
        MatMul.input_grad(&a, &[a.clone(), a.clone()], &a, 2).err(),
        Some(TensorGradError::InvalidInputIndex {
            operation: "matmul".to_string(),
            index: 2,
            arity: 2,
        })
    );
}

#[test]
fn test_matmul_backward_adjoint() -> Result<(), TensorGradError> {
    // A: (2, 3), B: (3, 2), G = ones (2, 2)
    let graph = Graph::new();
    let a_values = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let b_values = arr2(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
    let a = Tensor::new(&graph, a_values.clone(), true);
    let b = Tensor::new(&graph, b_values.clone(), true);
    let c = matmul_op(&a, &b)?;
    c.backward(Some(&ones_like(&c)))?;

    let g = Array2::<f64>::ones((2, 2));
    let expected_a = g.dot(&b_values.t());
    let expected_b = a_values.t().dot(&g);
    check_grad_near(&a, &[2, 3], &expected_a.iter().copied().collect::<Vec<_>>());
    check_grad_near(&b, &[3, 2], &expected_b.iter().copied().collect::<Vec<_>>());

    // Spelled out: row sums of B, column sums of A.
    check_grad_near(&a, &[2, 3], &[15.0, 19.0, 23.0, 15.0, 19.0, 23.0]);
    check_grad_near(&b, &[3, 2], &[5.0, 5.0, 7.0, 7.0, 9.0, 9.0]);
    Ok(())
}

#[test]
fn test_matmul_backward_only_tracked_input() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let w = Tensor::new(&graph, arr2(&[[0.5, -1.0], [2.0, 0.0]]), true);
    let x = Tensor::new(&graph, arr2(&[[1.0], [3.0]]), false);
    let y = w.matmul(&x)?;
    assert_eq!(y.depends_on().len(), 1);

    let seed = Tensor::new(&graph, arr2(&[[1.0], [2.0]]), false);
    y.backward(Some(&seed))?;
    check_grad_near(&w, &[2, 2], &[1.0, 3.0, 2.0, 6.0]);
    assert!(x.grad().is_none());
    Ok(())
}

#[test]
fn test_matmul_grad_check() -> Result<(), GradCheckError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, arr2(&[[0.2, -0.4, 1.1], [0.9, 0.3, -0.6]]), true);
    let b = Tensor::new(&graph, arr2(&[[1.2, -0.1], [0.4, 0.5], [-0.8, 0.7]]), true);
    let output_grad = arr2(&[[1.0, -2.0], [0.5, 0.25]]).into_dyn();
    check_grad(
        |inputs: &[Tensor]| matmul_op(&inputs[0], &inputs[1]),
        &[a, b],
        &output_grad,
        &GradCheckConfig::default(),
    )
}
