use super::*;
use crate::autograd::{check_grad, GradCheckConfig, Graph};
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor};
use ndarray::{arr1, arr2};

#[test]
fn test_add_tensors_ok() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = create_test_tensor(&graph, vec![1.0, 2.0, 3.0, 4.0], vec![2, 2], false);
    let b = create_test_tensor(&graph, vec![5.0, 6.0, 7.0, 8.0], vec![2, 2], false);
    let result = add_op(&a, &b)?;
    check_tensor_near(&result, &[2, 2], &[6.0, 8.0, 10.0, 12.0]);
    assert!(!result.requires_grad());
    assert!(result.is_leaf());
    Ok(())
}

#[test]
fn test_add_broadcasting() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let matrix = Tensor::new(&graph, arr2(&[[1.0, 2.0], [3.0, 4.0]]), false);
    let row = Tensor::new(&graph, arr1(&[10.0, 20.0]), false);
    let result = add_op(&matrix, &row)?;
    check_tensor_near(&result, &[2, 2], &[11.0, 22.0, 13.0, 24.0]);

    let shifted = add_op(&matrix, 0.5)?;
    check_tensor_near(&shifted, &[2, 2], &[1.5, 2.5, 3.5, 4.5]);
    Ok(())
}

#[test]
fn test_add_shape_mismatch() {
    let graph = Graph::new();
    let a = Tensor::new(&graph, vec![1.0, 2.0, 3.0], true);
    let b = Tensor::new(&graph, vec![1.0, 2.0], true);
    let err = add_op(&a, &b).unwrap_err();
    assert_eq!(
        err,
        TensorGradError::BroadcastError {
            shape1: vec![3],
            shape2: vec![2]
        }
    );
}

#[test]
fn test_add_requires_grad_propagation() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, vec![1.0, 2.0], true);
    let b = Tensor::new(&graph, vec![3.0, 4.0], false);

    let c = add_op(&a, &b)?;
    assert!(c.requires_grad());
    // Only the tracked input gets an edge.
    let deps = c.depends_on();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].node(), a.id());

    let d = add_op(&b, &b)?;
    assert!(!d.requires_grad());
    assert!(d.depends_on().is_empty());
    assert!(d.grad().is_none());
    Ok(())
}

#[test]
fn test_add_backward_same_shape() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, vec![1.0, 2.0, 3.0], true);
    let b = Tensor::new(&graph, vec![4.0, 5.0, 6.0], true);
    let c = add_op(&a, &b)?;

    let seed = Tensor::new(&graph, vec![-1.0, 100.0, 0.5], false);
    c.backward(Some(&seed))?;

    check_grad_near(&a, &[3], &[-1.0, 100.0, 0.5]);
    check_grad_near(&b, &[3], &[-1.0, 100.0, 0.5]);
    Ok(())
}

#[test]
fn test_add_backward_broadcast() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]), true);
    let b = Tensor::new(&graph, arr1(&[7.0, 8.0, 9.0]), true);
    let c = add_op(&a, &b)?;

    let seed = Tensor::new(&graph, arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]), false);
    c.backward(Some(&seed))?;

    check_grad_near(&a, &[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    check_grad_near(&b, &[3], &[5.0, 7.0, 9.0]);
    Ok(())
}

#[test]
fn test_add_backward_scalar_operand() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, arr2(&[[1.0, 2.0], [3.0, 4.0]]), false);
    let s = Tensor::new(&graph, 2.0, true);
    let c = add_op(&a, &s)?;
    c.backward(Some(&crate::tensor::ones_like(&c)))?;
    check_grad_near(&s, &[], &[4.0]);
    Ok(())
}

#[test]
fn test_add_grad_check() -> Result<(), crate::autograd::GradCheckError> {
    let graph = Graph::new();
    let a = Tensor::new(&graph, arr2(&[[0.3, -1.2, 2.0], [0.7, 0.1, -0.4]]), true);
    let b = Tensor::new(&graph, arr2(&[[1.5], [-2.5]]), true);
    let output_grad = arr2(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).into_dyn();
    check_grad(
        |inputs: &[Tensor]| add_op(&inputs[0], &inputs[1]),
        &[a, b],
        &output_grad,
        &GradCheckConfig::default(),
    )
}

#[test]
fn test_add_backward_all_inputs() -> Result<(), TensorGradError> {
    let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
    let b = arr1(&[10.0, 20.0]).into_dyn();
    let output = Add.forward(&[&a, &b])?;
    let upstream = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
    let grads = Add.backward(&upstream, &[a, b], &output)?;
    assert_eq!(grads.len(), 2);
    crate::utils::testing::check_array_near(&grads[0], &[2, 2], &[1.0, 2.0, 3.0, 4.0]);
    crate::utils::testing::check_array_near(&grads[1], &[2], &[4.0, 6.0]);
    Ok(())
}
