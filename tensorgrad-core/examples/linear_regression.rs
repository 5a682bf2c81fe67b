//! Fits `y = x @ w + b` to synthetic data with plain gradient descent.
//!
//! Parameters are updated in place with `sub_`, which breaks the graph on
//! purpose: every step builds a fresh expression from the updated values.
//! The previous step's nodes are reclaimed once its loss is dropped.
//!
//! Run with `RUST_LOG=debug cargo run --example linear_regression` to see the
//! backward engine's logs.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tensorgrad_core::ndarray::arr2;
use tensorgrad_core::tensor::create::randn_with;
use tensorgrad_core::{Graph, Tensor, TensorGradError};

fn main() -> Result<(), TensorGradError> {
    env_logger::init();

    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);

    let x = randn_with(&mut rng, &graph, &[64, 3], false);
    let true_w = Tensor::new(&graph, arr2(&[[2.0], [-1.0], [0.5]]), false);
    let y = (x.matmul(&true_w)? + 0.3).data();
    let y = Tensor::new(&graph, y, false);

    let w = randn_with(&mut rng, &graph, &[3, 1], true);
    let b = Tensor::new(&graph, 0.0, true);
    let learning_rate = 0.1;
    let n = x.shape()[0] as f64;

    for epoch in 0..100 {
        let residual = x.matmul(&w)? + &b - &y;
        let loss = (&residual * &residual).sum()? * (1.0 / n);
        loss.backward(None)?;

        let step_w = w.grad().map(|g| g * learning_rate);
        let step_b = b.grad().map(|g| g * learning_rate);
        if let (Some(step_w), Some(step_b)) = (step_w, step_b) {
            w.sub_(step_w)?;
            b.sub_(step_b)?;
        }
        w.zero_grad();
        b.zero_grad();

        if epoch % 20 == 0 {
            info!("epoch {:3}: loss {:.6}", epoch, loss.item().unwrap_or(f64::NAN));
        }
        drop((residual, loss));
        graph.collect_garbage();
    }
    info!("graph holds {} nodes after training", graph.len());

    println!("learned w = {}", w);
    println!("learned b = {}", b);
    Ok(())
}
