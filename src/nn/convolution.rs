use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;
use crate::nn::network::Network;
use crate::nn::projection::Projection2d;

/// A composite network that slides a fixed kernel over the 2D projection of
/// its input before handing the result to a wrapped network.
///
/// The kernel is a constant of the composite, not a learned parameter.
/// Positions past the grid edge read as zero through the projection's
/// default-returning accessor, so the convolved vector keeps the input
/// projection's shape.
pub struct ConvolutionNetwork<N: Network> {
    projection: Projection2d,
    kernel: Matrix,
    inner: N,
}

impl<N: Network> ConvolutionNetwork<N> {
    pub fn new(projection: Projection2d, kernel: Matrix, inner: N) -> Result<Self> {
        if inner.input_rank() != projection.size() {
            return Err(Error::mismatch(
                "convolution wrapper",
                projection.size(),
                inner.input_rank(),
            ));
        }
        Ok(ConvolutionNetwork {
            projection,
            kernel,
            inner,
        })
    }

    pub fn kernel(&self) -> &Matrix {
        &self.kernel
    }

    fn convolve(&self, input: &Vector) -> Result<Vector> {
        let mut output = Vector::new(self.projection.size())?;
        for y in 0..self.projection.height() {
            for x in 0..self.projection.width() {
                let mut cell = 0.0;
                for ky in 0..self.kernel.row_rank() {
                    for kx in 0..self.kernel.column_rank() {
                        cell += self.kernel.get(ky, kx)?
                            * self.projection.get(input, x + kx, y + ky, 0.0)?;
                    }
                }
                self.projection.set(&mut output, x, y, cell)?;
            }
        }
        Ok(output)
    }
}

impl<N: Network> Network for ConvolutionNetwork<N> {
    fn input_rank(&self) -> usize {
        self.projection.size()
    }

    fn output_rank(&self) -> usize {
        self.inner.output_rank()
    }

    fn process(&mut self, input: &Vector) -> Result<Vector> {
        let convolved = self.convolve(input)?;
        self.inner.process(&convolved)
    }

    fn train(
        &mut self,
        input: &Vector,
        target: &Vector,
        rate: f64,
        regularization: f64,
    ) -> Result<()> {
        let convolved = self.convolve(input)?;
        self.inner.train(&convolved, target, rate, regularization)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::nn::network::FeedForward;

    // Inner stand-in that hands its input back out, so tests can observe
    // exactly what a composite feeds its wrapped network.
    pub(crate) struct Probe {
        rank: usize,
        pub(crate) trained_with: Option<(Vector, Vector)>,
    }

    impl Probe {
        pub(crate) fn new(rank: usize) -> Probe {
            Probe {
                rank,
                trained_with: None,
            }
        }
    }

    impl Network for Probe {
        fn input_rank(&self) -> usize {
            self.rank
        }

        fn output_rank(&self) -> usize {
            self.rank
        }

        fn process(&mut self, input: &Vector) -> Result<Vector> {
            Ok(input.clone())
        }

        fn train(
            &mut self,
            input: &Vector,
            target: &Vector,
            _rate: f64,
            _regularization: f64,
        ) -> Result<()> {
            self.trained_with = Some((input.clone(), target.clone()));
            Ok(())
        }
    }

    fn grid3() -> Vector {
        Vector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap()
    }

    #[test]
    fn kernel_window_with_zero_padding() {
        let projection = Projection2d::new(3, 3).unwrap();
        // Identity-plus-diagonal kernel: out(x, y) = in(x, y) + in(x+1, y+1).
        let kernel = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let mut net =
            ConvolutionNetwork::new(projection, kernel, Probe::new(projection.size())).unwrap();

        let out = net.process(&grid3()).unwrap();
        let expected = Vector::from_vec(vec![
            1.0 + 5.0,
            2.0 + 6.0,
            3.0, // right edge pads with zero
            4.0 + 8.0,
            5.0 + 9.0,
            6.0,
            7.0, // bottom edge pads with zero
            8.0,
            9.0,
        ])
        .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn training_feeds_the_convolved_input_to_the_inner_network() {
        let projection = Projection2d::new(2, 2).unwrap();
        let kernel = Matrix::from_vec(1, 1, vec![2.0]).unwrap();
        let mut net =
            ConvolutionNetwork::new(projection, kernel, Probe::new(projection.size())).unwrap();

        let input = Vector::from_vec(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let target = Vector::from_vec(vec![0.0, 0.0, 0.0, 1.0]).unwrap();
        net.train(&input, &target, 0.5, 0.0).unwrap();

        let (seen_input, seen_target) = net.inner.trained_with.clone().unwrap();
        assert_eq!(
            seen_input,
            Vector::from_vec(vec![2.0, 4.0, 6.0, 8.0]).unwrap()
        );
        assert_eq!(seen_target, target);
    }

    #[test]
    fn wrapped_network_rank_must_match_the_projection() {
        let projection = Projection2d::new(3, 3).unwrap();
        let kernel = Matrix::ones(2, 2).unwrap();
        let inner = FeedForward::new(&[4, 1]).unwrap();
        assert!(matches!(
            ConvolutionNetwork::new(projection, kernel, inner),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn composes_with_a_real_network() {
        let projection = Projection2d::new(3, 3).unwrap();
        let kernel = Matrix::ones(2, 2).unwrap();
        let inner = FeedForward::new(&[9, 4, 2]).unwrap();
        let mut net = ConvolutionNetwork::new(projection, kernel, inner).unwrap();

        assert_eq!(net.input_rank(), 9);
        assert_eq!(net.output_rank(), 2);

        let target = Vector::from_vec(vec![1.0, 0.0]).unwrap();
        net.train(&grid3(), &target, 0.5, 1.0e-6).unwrap();
        let out = net.process(&grid3()).unwrap();
        assert_eq!(out.rank(), 2);
    }
}
