use super::*;
use crate::autograd::{check_grad, GradCheckConfig, GradCheckError, Graph};
use crate::tensor::ones_like;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor};
use ndarray::arr2;

fn grid(graph: &Graph, requires_grad: bool) -> Tensor {
    // [[0, 1, 2], [3, 4, 5]]
    create_test_tensor(graph, (0..6).map(f64::from).collect(), vec![2, 3], requires_grad)
}

#[test]
fn test_slice_range() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = Tensor::new(&graph, vec![10.0, 11.0, 12.0, 13.0, 14.0], false);
    check_tensor_near(&x.slice(&[s_range(1, 3)])?, &[2], &[11.0, 12.0]);
    check_tensor_near(&x.slice(&[SliceArg::Slice(0, None, 2)])?, &[3], &[10.0, 12.0, 14.0]);
    Ok(())
}

#[test]
fn test_slice_negative_bounds_and_clamping() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = Tensor::new(&graph, vec![10.0, 11.0, 12.0, 13.0, 14.0], false);
    check_tensor_near(&x.slice(&[SliceArg::Slice(-2, None, 1)])?, &[2], &[13.0, 14.0]);
    check_tensor_near(&x.slice(&[s_range(3, 100)])?, &[2], &[13.0, 14.0]);
    check_tensor_near(&x.slice(&[s_range(-100, 1)])?, &[1], &[10.0]);
    Ok(())
}

#[test]
fn test_slice_empty_when_end_before_start() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = Tensor::new(&graph, vec![1.0, 2.0, 3.0], false);
    let empty = x.slice(&[s_range(2, 1)])?;
    assert_eq!(empty.shape(), vec![0]);
    Ok(())
}

#[test]
fn test_slice_index_drops_axis() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = grid(&graph, false);
    check_tensor_near(&x.slice(&[SliceArg::Index(1)])?, &[3], &[3.0, 4.0, 5.0]);
    check_tensor_near(&x.slice(&[SliceArg::Full, SliceArg::Index(-1)])?, &[2], &[2.0, 5.0]);

    let corner = x.slice(&[SliceArg::Index(0), SliceArg::Index(2)])?;
    assert!(corner.shape().is_empty());
    assert_eq!(corner.item(), Some(2.0));
    Ok(())
}

#[test]
fn test_slice_ellipsis() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = grid(&graph, false);
    check_tensor_near(
        &x.slice(&[SliceArg::Ellipsis, s_range(1, 3)])?,
        &[2, 2],
        &[1.0, 2.0, 4.0, 5.0],
    );
    check_tensor_near(&x.slice(&[SliceArg::Ellipsis])?, &[2, 3], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    check_tensor_near(&x.slice(&[SliceArg::Index(1), SliceArg::Ellipsis])?, &[3], &[3.0, 4.0, 5.0]);
    Ok(())
}

#[test]
fn test_slice_errors() {
    let graph = Graph::new();
    let x = grid(&graph, true);
    let is_slice_error = |r: Result<Tensor, TensorGradError>| {
        matches!(r, Err(TensorGradError::SliceError { .. }))
    };
    assert!(is_slice_error(x.slice(&[SliceArg::Index(2)])));
    assert!(is_slice_error(x.slice(&[SliceArg::Full, SliceArg::Index(-4)])));
    assert!(is_slice_error(x.slice(&[SliceArg::Full, SliceArg::Full, SliceArg::Full])));
    assert!(is_slice_error(x.slice(&[SliceArg::Ellipsis, SliceArg::Ellipsis])));
    assert!(is_slice_error(x.slice(&[SliceArg::Slice(0, None, 0)])));
    assert!(is_slice_error(x.slice(&[SliceArg::Slice(0, None, -1)])));
    // Nothing was recorded for the failed calls.
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_slice_backward_scatters_into_zeros() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = Tensor::new(&graph, vec![1.0, 2.0, 3.0, 4.0, 5.0], true);
    let y = x.slice(&[s_range(1, 3)])?;
    assert!(y.requires_grad());
    y.backward(Some(&ones_like(&y)))?;
    check_grad_near(&x, &[5], &[0.0, 1.0, 1.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn test_slice_backward_strided_and_indexed() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = grid(&graph, true);
    let y = x.slice(&[SliceArg::Full, SliceArg::Slice(0, None, 2)])?;
    let seed = Tensor::new(&graph, arr2(&[[1.0, 2.0], [3.0, 4.0]]), false);
    y.backward(Some(&seed))?;
    check_grad_near(&x, &[2, 3], &[1.0, 0.0, 2.0, 3.0, 0.0, 4.0]);

    x.zero_grad();
    let corner = x.slice(&[SliceArg::Index(1), SliceArg::Index(1)])?;
    corner.backward(None)?;
    check_grad_near(&x, &[2, 3], &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    Ok(())
}

#[test]
fn test_overlapping_slices_accumulate() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = Tensor::new(&graph, vec![1.0, 2.0, 3.0, 4.0], true);
    let y = (&x.slice(&[s_range(0, 3)])? + &x.slice(&[s_range(1, 4)])?).sum()?;
    y.backward(None)?;
    check_grad_near(&x, &[4], &[1.0, 2.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_slice_grad_check() -> Result<(), GradCheckError> {
    let graph = Graph::new();
    let x = grid(&graph, true);
    let output_grad = ndarray::arr1(&[0.5, -2.0]).into_dyn();
    check_grad(
        |inputs: &[Tensor]| inputs[0].slice(&[SliceArg::Ellipsis, SliceArg::Index(1)]),
        &[x],
        &output_grad,
        &GradCheckConfig::default(),
    )
}
