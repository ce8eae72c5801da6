use crate::error::{Error, Result};
use crate::math::vector::Vector;
use crate::nn::layer::NeuronLayer;

/// Regularization coefficient used when a caller has no opinion.
pub const DEFAULT_REGULARIZATION: f64 = 1.0e-6;

/// The polymorphic surface shared by plain and composite networks.
///
/// `process` is inference; `train` runs one backpropagation step on a
/// single example. Implementations are single-threaded: training state
/// lives inside the network between the phases of one `train` call and
/// concurrent use is not supported.
pub trait Network {
    fn input_rank(&self) -> usize;
    fn output_rank(&self) -> usize;

    fn process(&mut self, input: &Vector) -> Result<Vector>;

    fn train(
        &mut self,
        input: &Vector,
        target: &Vector,
        rate: f64,
        regularization: f64,
    ) -> Result<()>;
}

/// A feed-forward chain of [`NeuronLayer`]s trained by backpropagation.
///
/// Layers live in an ordered arena and every pass walks them by index, so
/// the three training phases stay strictly separated: forward, then every
/// gradient back-to-front, then every weight update.
pub struct FeedForward {
    layers: Vec<NeuronLayer>,
}

impl FeedForward {
    /// Builds a network from consecutive layer ranks: `[3, 5, 1]` is a
    /// 3-input network with one hidden layer of 5 and a single output.
    pub fn new(ranks: &[usize]) -> Result<FeedForward> {
        if ranks.len() < 2 {
            return Err(Error::construction(
                "a network needs an input rank and at least one layer rank",
            ));
        }
        let layers = ranks
            .windows(2)
            .map(|pair| NeuronLayer::new(pair[0], pair[1]))
            .collect::<Result<Vec<_>>>()?;
        Ok(FeedForward { layers })
    }

    pub fn layers(&self) -> &[NeuronLayer] {
        &self.layers
    }

    fn check_input(&self, input: &Vector) -> Result<()> {
        if input.rank() != self.input_rank() {
            return Err(Error::mismatch(
                "network input",
                self.input_rank(),
                input.rank(),
            ));
        }
        Ok(())
    }

    // Phase 1: thread the input through every layer in order. Each layer
    // keeps its own output, which the update phase reads back.
    fn forward(&mut self, input: &Vector, training: bool) -> Result<()> {
        for i in 0..self.layers.len() {
            let (fed, rest) = self.layers.split_at_mut(i);
            let layer_input = match fed.last() {
                Some(previous) => previous.last_output(),
                None => input,
            };
            rest[0].process(layer_input, training)?;
        }
        Ok(())
    }

    // Phase 2: output gradient first, then each hidden gradient from its
    // successor's finished gradient and weights.
    fn backward(&mut self, target: &Vector) -> Result<()> {
        let last = self.layers.len() - 1;
        self.layers[last].compute_output_delta(target)?;
        for i in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].compute_inner_delta(&tail[0])?;
        }
        Ok(())
    }

    // Phase 3: every layer updates from its own gradient and the previous
    // layer's cached output (the original input for the first layer).
    fn update(&mut self, input: &Vector, rate: f64, regularization: f64) -> Result<()> {
        for i in 0..self.layers.len() {
            let (fed, rest) = self.layers.split_at_mut(i);
            let layer_input = match fed.last() {
                Some(previous) => previous.last_output(),
                None => input,
            };
            rest[0].update_weights(layer_input, rate, regularization)?;
        }
        Ok(())
    }
}

impl Network for FeedForward {
    fn input_rank(&self) -> usize {
        self.layers[0].input_rank()
    }

    fn output_rank(&self) -> usize {
        self.layers[self.layers.len() - 1].output_rank()
    }

    fn process(&mut self, input: &Vector) -> Result<Vector> {
        self.check_input(input)?;
        self.forward(input, false)?;
        Ok(self.layers[self.layers.len() - 1].last_output().clone())
    }

    fn train(
        &mut self,
        input: &Vector,
        target: &Vector,
        rate: f64,
        regularization: f64,
    ) -> Result<()> {
        self.check_input(input)?;
        if target.rank() != self.output_rank() {
            return Err(Error::mismatch(
                "network target",
                self.output_rank(),
                target.rank(),
            ));
        }

        self.forward(input, true)?;
        self.backward(target)?;
        self.update(input, rate, regularization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_needs_two_ranks() {
        assert!(FeedForward::new(&[3]).is_err());
        assert!(FeedForward::new(&[]).is_err());
        assert!(FeedForward::new(&[3, 0, 1]).is_err());

        let net = FeedForward::new(&[3, 6, 5, 1]).unwrap();
        assert_eq!(net.input_rank(), 3);
        assert_eq!(net.output_rank(), 1);
        assert_eq!(net.layers().len(), 3);
    }

    #[test]
    fn layer_ranks_chain() {
        let net = FeedForward::new(&[4, 7, 2]).unwrap();
        assert_eq!(net.layers()[0].input_rank(), 4);
        assert_eq!(net.layers()[0].output_rank(), 7);
        assert_eq!(net.layers()[1].input_rank(), 7);
        assert_eq!(net.layers()[1].output_rank(), 2);
    }

    #[test]
    fn process_rejects_wrong_ranks() {
        let mut net = FeedForward::new(&[3, 1]).unwrap();
        let wrong = Vector::from_vec(vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            net.process(&wrong),
            Err(Error::DimensionMismatch { .. })
        ));

        let input = Vector::from_vec(vec![1.0, 2.0, 3.0]).unwrap();
        let bad_target = Vector::from_vec(vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            net.train(&input, &bad_target, 0.1, 0.0),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn outputs_are_logistic_bounded() {
        let mut net = FeedForward::new(&[3, 5, 2]).unwrap();
        let input = Vector::from_vec(vec![0.3, -2.0, 11.0]).unwrap();
        let output = net.process(&input).unwrap();
        assert_eq!(output.rank(), 2);
        for i in 0..output.rank() {
            let value = output.get(i).unwrap();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn inference_leaves_no_training_state() {
        let mut net = FeedForward::new(&[2, 3, 1]).unwrap();
        let input = Vector::from_vec(vec![1.0, 0.0]).unwrap();
        let target = Vector::from_vec(vec![1.0]).unwrap();

        net.train(&input, &target, 0.5, DEFAULT_REGULARIZATION).unwrap();
        net.process(&input).unwrap();
        for layer in net.layers() {
            assert!(layer.delta().is_empty());
        }
    }

    // The separation fixture the original console run used: one strongly
    // positive pattern and one flat pattern, trained in alternation.
    fn converges(ranks: &[usize]) {
        let positive = Vector::from_vec(vec![0.5, 10.0, 0.5]).unwrap();
        let negative = Vector::from_vec(vec![1.0, 1.0, 1.0]).unwrap();
        let positive_target = Vector::from_vec(vec![1.0]).unwrap();
        let negative_target = Vector::from_vec(vec![0.0]).unwrap();

        let mut net = FeedForward::new(ranks).unwrap();
        for _ in 0..10_000 {
            net.train(&positive, &positive_target, 0.5, DEFAULT_REGULARIZATION)
                .unwrap();
            net.train(&negative, &negative_target, 0.5, DEFAULT_REGULARIZATION)
                .unwrap();
        }

        assert!(net.process(&positive).unwrap().get(0).unwrap() > 0.9);
        assert!(net.process(&negative).unwrap().get(0).unwrap() < 0.1);
    }

    #[test]
    fn single_layer_network_separates_two_patterns() {
        converges(&[3, 1]);
    }

    #[test]
    fn two_layer_network_separates_two_patterns() {
        converges(&[3, 5, 1]);
    }
}
