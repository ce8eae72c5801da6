use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;
use crate::nn::activation::{logistic, logistic_derivative};

/// One affine transform followed by the logistic activation.
///
/// The layer owns its weight matrix (`output_rank x input_rank`) and bias
/// vector, plus three values that only carry meaning while a training pass
/// is in flight: the pre-activation (`net`), the last output, and the
/// backpropagated gradient (`delta`). A non-training forward pass discards
/// the pre-activation and gradient immediately.
#[derive(Debug)]
pub struct NeuronLayer {
    weights: Matrix,
    bias: Vector,
    net: Vector,
    output: Vector,
    delta: Vector,
}

impl NeuronLayer {
    /// Creates a layer with weights and bias uniformly random in [-0.5, 0.5].
    pub fn new(input_rank: usize, output_rank: usize) -> Result<NeuronLayer> {
        Ok(NeuronLayer {
            weights: Matrix::random(output_rank, input_rank, -0.5, 0.5)?,
            bias: Vector::random(output_rank, -0.5, 0.5)?,
            net: Vector::new(output_rank)?,
            output: Vector::new(output_rank)?,
            delta: Vector::new(output_rank)?,
        })
    }

    pub fn input_rank(&self) -> usize {
        self.weights.column_rank()
    }

    pub fn output_rank(&self) -> usize {
        self.weights.row_rank()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn delta(&self) -> &Vector {
        &self.delta
    }

    /// The output of the most recent forward pass. Valid until the next
    /// `process` call on this layer.
    pub fn last_output(&self) -> &Vector {
        &self.output
    }

    /// Computes `logistic(weights * input + bias)`.
    ///
    /// With `training` set, the pre-activation is retained for the backward
    /// pass; otherwise it and the gradient are discarded immediately so
    /// inference leaves no training state behind.
    pub fn process(&mut self, input: &Vector, training: bool) -> Result<&Vector> {
        let affine = self.weights.mul_vector(input)?.checked_add(&self.bias)?;

        let mut output = Vector::new(self.output_rank())?;
        for i in 0..affine.rank() {
            output.set(i, logistic(affine.get(i)?))?;
        }
        self.net = affine;
        self.output = output;

        if !training {
            self.net.clear();
            self.delta.clear();
        }

        Ok(&self.output)
    }

    /// Gradient of the output layer: `(output - target) * F'(net)`.
    pub fn compute_output_delta(&mut self, target: &Vector) -> Result<()> {
        if target.rank() != self.output_rank() {
            return Err(Error::mismatch(
                "output gradient",
                self.output_rank(),
                target.rank(),
            ));
        }
        let mut delta = Vector::new(self.output_rank())?;
        for i in 0..delta.rank() {
            let error = self.output.get(i)? - target.get(i)?;
            delta.set(i, error * logistic_derivative(self.net.get(i)?))?;
        }
        self.delta = delta;
        Ok(())
    }

    /// Gradient of a hidden layer, backpropagated through the next layer's
    /// already-computed gradient and weights:
    /// `delta(i) = (sum_j next.delta(j) * next.weight(j, i)) * F'(net(i))`.
    pub fn compute_inner_delta(&mut self, next: &NeuronLayer) -> Result<()> {
        if next.input_rank() != self.output_rank() {
            return Err(Error::mismatch(
                "inner gradient",
                self.output_rank(),
                next.input_rank(),
            ));
        }
        let mut delta = Vector::new(self.output_rank())?;
        for i in 0..delta.rank() {
            let mut sum = 0.0;
            for j in 0..next.output_rank() {
                sum += next.delta.get(j)? * next.weights.get(j, i)?;
            }
            delta.set(i, sum * logistic_derivative(self.net.get(i)?))?;
        }
        self.delta = delta;
        Ok(())
    }

    /// Applies the gradient to the weights and bias:
    /// `w(r, c) += (delta(r) + regularization * w(r, c)) * input(c) * rate`,
    /// with the bias updated against an implicit unit input.
    ///
    /// The learning rate is forced negative and the regularization
    /// coefficient non-negative, whatever signs the caller passed.
    pub fn update_weights(&mut self, input: &Vector, rate: f64, regularization: f64) -> Result<()> {
        if input.rank() != self.input_rank() {
            return Err(Error::mismatch(
                "weight update",
                self.input_rank(),
                input.rank(),
            ));
        }
        let rate = -rate.abs();
        let regularization = regularization.abs();

        for row in 0..self.output_rank() {
            let delta = self.delta.get(row)?;
            for col in 0..self.input_rank() {
                let weight = self.weights.get(row, col)?;
                let update = (delta + regularization * weight) * input.get(col)? * rate;
                self.weights.set(row, col, weight + update)?;
            }
            let bias = self.bias.get(row)?;
            self.bias.set(row, bias + (delta + regularization * bias) * rate)?;
        }
        Ok(())
    }
}
