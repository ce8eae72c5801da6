pub mod activation;
pub mod convolution;
pub mod ensemble;
pub mod layer;
pub mod network;
pub mod projection;
pub mod sampling;
