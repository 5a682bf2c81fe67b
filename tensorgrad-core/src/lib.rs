//! # tensorgrad-core
//!
//! A small reverse-mode automatic differentiation engine over `f64`
//! n-dimensional arrays.
//!
//! Tensors live in a [`Graph`] arena. Every operation on tensors that track
//! gradients records a new node whose dependency list points back to its
//! inputs; [`Tensor::backward`] then walks those edges from a root and
//! accumulates gradients into every tracked ancestor. Nodes that no tensor
//! handle can reach any more are reclaimed by [`Graph::collect_garbage`].
//!
//! ```
//! use tensorgrad_core::{Graph, Tensor};
//!
//! let graph = Graph::new();
//! let x = Tensor::new(&graph, vec![1.0, 2.0, 3.0], true);
//! let y = (&x * &x).sum().unwrap();
//! y.backward(None).unwrap();
//! assert_eq!(x.grad().unwrap().into_raw_vec(), vec![2.0, 4.0, 6.0]);
//! ```

pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use autograd::{check_grad, Dependency, GradCheckConfig, GradCheckError, Graph, NodeId};
pub use error::TensorGradError;
pub use ops::{s_range, SliceArg};
pub use tensor::{IntoArray, IntoTensor, Tensor};

// Re-exported so callers can build payloads with the same `ndarray` version.
pub use ndarray;
