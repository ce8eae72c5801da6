pub mod error;
pub mod math;
pub mod nn;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::chain::{chain_cost, multiply_chain};
pub use math::grid::{Grid, GridMut};
pub use math::matrix::Matrix;
pub use math::solve::solve;
pub use math::sparse::{Csr, SparseMatrix};
pub use math::vector::Vector;
pub use nn::convolution::ConvolutionNetwork;
pub use nn::ensemble::Ensemble;
pub use nn::layer::NeuronLayer;
pub use nn::network::{FeedForward, Network, DEFAULT_REGULARIZATION};
pub use nn::projection::Projection2d;
pub use nn::sampling::SamplingNetwork;
pub use train::{fit, EpochStats, Sample, TrainConfig};
