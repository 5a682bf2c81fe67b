//! Finite-difference verification of the analytical gradients.

use approx::relative_eq;
use log::debug;
use ndarray::ArrayD;
use thiserror::Error;

use crate::autograd::backward::run_backward;
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical} != numerical {numerical}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical: f64,
        numerical: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(TensorGradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(TensorGradError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Gradient check input tensor must be a leaf node. Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Loss+: {loss_plus}, Loss-: {loss_minus}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Output gradient has shape {actual:?}, function output has shape {expected:?}")]
    OutputShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(TensorGradError),
}

impl From<TensorGradError> for GradCheckError {
    fn from(err: TensorGradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Step and tolerances of [`check_grad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Half-width of the central difference.
    pub epsilon: f64,
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-6,
            abs_tolerance: 1e-5,
            rel_tolerance: 1e-4,
        }
    }
}

/// Checks analytical gradients against central finite differences.
///
/// The scalar being differentiated is `sum(func(inputs) * output_grad)`, so
/// the analytical side is a backward pass seeded with `output_grad`. Every
/// element of every input that requires grad is perturbed by `±epsilon` in
/// turn and `func` is re-run on the perturbed inputs.
///
/// Inputs are perturbed in place through `set_data` and restored afterwards.
/// On return (successful or not) their gradients have been reset to zeros
/// and the nodes recorded by the forward passes have been reclaimed.
///
/// # Errors
/// `GradientMismatch` for the first element whose gradients disagree beyond
/// both `abs_tolerance` and `rel_tolerance`, or one of the setup errors.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &ArrayD<f64>,
    config: &GradCheckConfig,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, TensorGradError>,
{
    let result = run_check(&func, inputs, output_grad, config);
    if let Some(first) = inputs.first() {
        let freed = first.graph().collect_garbage();
        debug!("check_grad: reclaimed {} nodes", freed);
    }
    result
}

fn run_check<F>(
    func: &F,
    inputs: &[Tensor],
    output_grad: &ArrayD<f64>,
    config: &GradCheckConfig,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, TensorGradError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        input.zero_grad();
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::OutputShapeMismatch {
            expected: output.shape(),
            actual: output_grad.shape().to_vec(),
        });
    }
    let any_input_requires_grad = inputs.iter().any(Tensor::requires_grad);
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if !output.requires_grad() {
        return Ok(());
    }
    run_backward(&output, Some(output_grad.clone())).map_err(GradCheckError::BackwardPassError)?;
    drop(output);

    let mut analytical_grads = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        if !input.requires_grad() {
            analytical_grads.push(None);
            continue;
        }
        match input.grad() {
            Some(grad) => analytical_grads.push(Some(grad)),
            None => return Err(GradCheckError::MissingAnalyticalGrad { input_index: i }),
        }
    }

    // --- Numerical gradients ---
    let result = compare_numerical(func, inputs, output_grad, config, &analytical_grads);
    for input in inputs {
        input.zero_grad();
    }
    result
}

fn compare_numerical<F>(
    func: &F,
    inputs: &[Tensor],
    output_grad: &ArrayD<f64>,
    config: &GradCheckConfig,
    analytical_grads: &[Option<ArrayD<f64>>],
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, TensorGradError>,
{
    for (i, (input, analytical)) in inputs.iter().zip(analytical_grads).enumerate() {
        let analytical = match analytical {
            Some(grad) => grad,
            None => continue,
        };
        let original = input.data();

        for (element_index, (position, &analytical_value)) in
            analytical.indexed_iter().enumerate()
        {
            let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
                let mut perturbed = original.clone();
                perturbed[&position] += delta;
                input.set_data(perturbed);
                let out = func(inputs).map_err(GradCheckError::ForwardPassError)?;
                Ok((out.data() * output_grad).sum())
            };
            let loss_plus = loss_at(config.epsilon);
            let loss_minus = loss_at(-config.epsilon);
            input.set_data(original.clone());
            let (loss_plus, loss_minus) = (loss_plus?, loss_minus?);

            let numerical = (loss_plus - loss_minus) / (2.0 * config.epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }
            if !relative_eq!(
                analytical_value,
                numerical,
                epsilon = config.abs_tolerance,
                max_relative = config.rel_tolerance
            ) {
                debug!(
                    "check_grad: input {} element {} analytical {} numerical {}",
                    i, element_index, analytical_value, numerical
                );
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index,
                    analytical: analytical_value,
                    numerical,
                });
            }
        }
    }
    Ok(())
}
