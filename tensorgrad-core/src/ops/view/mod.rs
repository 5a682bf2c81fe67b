// src/ops/view/mod.rs

pub mod slice;

pub use slice::{s_range, slice_op, Slice, SliceArg};
