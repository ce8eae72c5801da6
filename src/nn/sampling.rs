use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;
use crate::nn::network::Network;
use crate::nn::projection::Projection2d;

/// A composite network that strides a fixed kernel across non-overlapping
/// blocks of the input projection, producing a smaller projection that
/// feeds the wrapped network.
///
/// The output grid is the input grid divided by the kernel shape, rounded
/// up; partial blocks along the far edges read zeros through the
/// projection's out-of-bounds policy.
pub struct SamplingNetwork<N: Network> {
    input: Projection2d,
    output: Projection2d,
    kernel: Matrix,
    inner: N,
}

impl<N: Network> SamplingNetwork<N> {
    pub fn new(input: Projection2d, kernel: Matrix, inner: N) -> Result<Self> {
        let output = Projection2d::new(
            input.width().div_ceil(kernel.column_rank()),
            input.height().div_ceil(kernel.row_rank()),
        )?;
        if inner.input_rank() != output.size() {
            return Err(Error::mismatch(
                "sampling wrapper",
                output.size(),
                inner.input_rank(),
            ));
        }
        Ok(SamplingNetwork {
            input,
            output,
            kernel,
            inner,
        })
    }

    pub fn kernel(&self) -> &Matrix {
        &self.kernel
    }

    /// Shape of the down-sampled projection handed to the inner network.
    pub fn output_projection(&self) -> Projection2d {
        self.output
    }

    fn sample(&self, input: &Vector) -> Result<Vector> {
        let mut output = Vector::new(self.output.size())?;
        for y in 0..self.output.height() {
            for x in 0..self.output.width() {
                let mut cell = 0.0;
                for ky in 0..self.kernel.row_rank() {
                    for kx in 0..self.kernel.column_rank() {
                        cell += self.kernel.get(ky, kx)?
                            * self.input.get(
                                input,
                                x * self.kernel.column_rank() + kx,
                                y * self.kernel.row_rank() + ky,
                                0.0,
                            )?;
                    }
                }
                self.output.set(&mut output, x, y, cell)?;
            }
        }
        Ok(output)
    }
}

impl<N: Network> Network for SamplingNetwork<N> {
    fn input_rank(&self) -> usize {
        self.input.size()
    }

    fn output_rank(&self) -> usize {
        self.inner.output_rank()
    }

    fn process(&mut self, input: &Vector) -> Result<Vector> {
        let sampled = self.sample(input)?;
        self.inner.process(&sampled)
    }

    fn train(
        &mut self,
        input: &Vector,
        target: &Vector,
        rate: f64,
        regularization: f64,
    ) -> Result<()> {
        let sampled = self.sample(input)?;
        self.inner.train(&sampled, target, rate, regularization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::convolution::tests::Probe;
    use crate::nn::network::FeedForward;

    #[test]
    fn block_sums_over_an_even_grid() {
        let input = Projection2d::new(4, 4).unwrap();
        let kernel = Matrix::ones(2, 2).unwrap();
        let mut net = SamplingNetwork::new(input, kernel, Probe::new(4)).unwrap();
        assert_eq!(net.output_projection().size(), 4);

        let v = Vector::from_vec(vec![
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ])
        .unwrap();
        let out = net.process(&v).unwrap();
        assert_eq!(
            out,
            Vector::from_vec(vec![14.0, 22.0, 46.0, 54.0]).unwrap()
        );
    }

    #[test]
    fn partial_blocks_read_zeros() {
        let input = Projection2d::new(3, 3).unwrap();
        let kernel = Matrix::ones(2, 2).unwrap();
        let mut net = SamplingNetwork::new(input, kernel, Probe::new(4)).unwrap();

        let v = Vector::from_vec(vec![
            1.0, 2.0, 3.0, //
            4.0, 5.0, 6.0, //
            7.0, 8.0, 9.0,
        ])
        .unwrap();
        let out = net.process(&v).unwrap();
        // Blocks: (1,2,4,5), (3,6), (7,8), (9).
        assert_eq!(
            out,
            Vector::from_vec(vec![12.0, 9.0, 15.0, 9.0]).unwrap()
        );
    }

    #[test]
    fn inner_rank_must_match_the_sampled_grid() {
        let input = Projection2d::new(4, 4).unwrap();
        let kernel = Matrix::ones(2, 2).unwrap();
        let inner = FeedForward::new(&[16, 1]).unwrap();
        assert!(matches!(
            SamplingNetwork::new(input, kernel, inner),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn composes_with_a_real_network() {
        let input = Projection2d::new(6, 6).unwrap();
        let kernel = Matrix::from_vec(2, 2, vec![0.25, 0.25, 0.25, 0.25]).unwrap();
        let inner = FeedForward::new(&[9, 3, 1]).unwrap();
        let mut net = SamplingNetwork::new(input, kernel, inner).unwrap();

        assert_eq!(net.input_rank(), 36);
        assert_eq!(net.output_rank(), 1);

        let v = Vector::random(36, 0.0, 1.0).unwrap();
        let target = Vector::from_vec(vec![1.0]).unwrap();
        net.train(&v, &target, 0.5, 1.0e-6).unwrap();
        assert_eq!(net.process(&v).unwrap().rank(), 1);
    }
}
