use crate::error::{Error, Result};
use crate::math::vector::Vector;

/// Per-epoch summary produced by [`fit`](crate::train::session::fit).
#[derive(Debug, Clone)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean squared error over all samples after this epoch's updates.
    pub mean_loss: f64,
}

/// Scalar mean squared error between a network output and its target.
pub fn mse(output: &Vector, target: &Vector) -> Result<f64> {
    if output.rank() != target.rank() {
        return Err(Error::mismatch("mse", target.rank(), output.rank()));
    }
    let sum: f64 = output
        .iter()
        .zip(target.iter())
        .map(|(o, t)| (o - t) * (o - t))
        .sum();
    Ok(sum / output.rank() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dim::approx_eq;

    #[test]
    fn mse_of_identical_vectors_is_zero() {
        let v = Vector::from_vec(vec![0.2, 0.8]).unwrap();
        assert_eq!(mse(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn mse_averages_squared_differences() {
        let output = Vector::from_vec(vec![1.0, 0.0]).unwrap();
        let target = Vector::from_vec(vec![0.0, 2.0]).unwrap();
        assert!(approx_eq(mse(&output, &target).unwrap(), 2.5));
    }

    #[test]
    fn ranks_must_match() {
        let a = Vector::from_vec(vec![1.0]).unwrap();
        let b = Vector::from_vec(vec![1.0, 2.0]).unwrap();
        assert!(matches!(mse(&a, &b), Err(Error::DimensionMismatch { .. })));
    }
}
