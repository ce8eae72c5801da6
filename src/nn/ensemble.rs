use crate::error::{Error, Result};
use crate::math::vector::Vector;
use crate::nn::network::Network;

/// A max-pooling ensemble: two or more networks of identical shape whose
/// inference result is the elementwise maximum across member outputs.
///
/// Training is independent — every member sees the same example.
pub struct Ensemble {
    members: Vec<Box<dyn Network>>,
}

impl Ensemble {
    pub fn new(members: Vec<Box<dyn Network>>) -> Result<Ensemble> {
        if members.len() < 2 {
            return Err(Error::construction(
                "an ensemble needs at least two member networks",
            ));
        }
        let input_rank = members[0].input_rank();
        let output_rank = members[0].output_rank();
        for member in &members[1..] {
            if member.input_rank() != input_rank {
                return Err(Error::mismatch(
                    "ensemble input",
                    input_rank,
                    member.input_rank(),
                ));
            }
            if member.output_rank() != output_rank {
                return Err(Error::mismatch(
                    "ensemble output",
                    output_rank,
                    member.output_rank(),
                ));
            }
        }
        Ok(Ensemble { members })
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl Network for Ensemble {
    fn input_rank(&self) -> usize {
        self.members[0].input_rank()
    }

    fn output_rank(&self) -> usize {
        self.members[0].output_rank()
    }

    fn process(&mut self, input: &Vector) -> Result<Vector> {
        let mut pooled = self.members[0].process(input)?;
        for member in &mut self.members[1..] {
            let output = member.process(input)?;
            for i in 0..pooled.rank() {
                if output.get(i)? > pooled.get(i)? {
                    pooled.set(i, output.get(i)?)?;
                }
            }
        }
        Ok(pooled)
    }

    fn train(
        &mut self,
        input: &Vector,
        target: &Vector,
        rate: f64,
        regularization: f64,
    ) -> Result<()> {
        for member in &mut self.members {
            member.train(input, target, rate, regularization)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::network::{FeedForward, DEFAULT_REGULARIZATION};

    #[test]
    fn needs_two_members_of_one_shape() {
        let single: Vec<Box<dyn Network>> = vec![Box::new(FeedForward::new(&[2, 1]).unwrap())];
        assert!(matches!(
            Ensemble::new(single),
            Err(Error::InvalidConstruction(_))
        ));

        let mismatched: Vec<Box<dyn Network>> = vec![
            Box::new(FeedForward::new(&[2, 1]).unwrap()),
            Box::new(FeedForward::new(&[3, 1]).unwrap()),
        ];
        assert!(matches!(
            Ensemble::new(mismatched),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn process_is_the_elementwise_maximum_of_member_outputs() {
        let input = Vector::from_vec(vec![0.5, 10.0, 0.5]).unwrap();
        let high = Vector::from_vec(vec![1.0]).unwrap();
        let low = Vector::from_vec(vec![0.0]).unwrap();

        // Train two identically shaped networks to disagree on the input.
        let mut optimist = FeedForward::new(&[3, 4, 1]).unwrap();
        let mut pessimist = FeedForward::new(&[3, 4, 1]).unwrap();
        for _ in 0..4000 {
            optimist
                .train(&input, &high, 0.8, DEFAULT_REGULARIZATION)
                .unwrap();
            pessimist
                .train(&input, &low, 0.8, DEFAULT_REGULARIZATION)
                .unwrap();
        }

        let expected = optimist
            .process(&input)
            .unwrap()
            .get(0)
            .unwrap()
            .max(pessimist.process(&input).unwrap().get(0).unwrap());

        let mut ensemble = Ensemble::new(vec![Box::new(optimist), Box::new(pessimist)]).unwrap();
        let pooled = ensemble.process(&input).unwrap();
        assert_eq!(pooled.get(0).unwrap(), expected);
        // The disagreement is real: the max comes from the optimist.
        assert!(pooled.get(0).unwrap() > 0.5);
    }

    #[test]
    fn training_reaches_every_member() {
        let members: Vec<Box<dyn Network>> = vec![
            Box::new(FeedForward::new(&[2, 3, 1]).unwrap()),
            Box::new(FeedForward::new(&[2, 3, 1]).unwrap()),
            Box::new(FeedForward::new(&[2, 3, 1]).unwrap()),
        ];
        let mut ensemble = Ensemble::new(members).unwrap();
        assert_eq!(ensemble.member_count(), 3);

        let input = Vector::from_vec(vec![1.0, 0.0]).unwrap();
        let target = Vector::from_vec(vec![1.0]).unwrap();
        for _ in 0..2000 {
            ensemble
                .train(&input, &target, 0.8, DEFAULT_REGULARIZATION)
                .unwrap();
        }
        // Every member was pushed toward the target, so even the pooled
        // minimum-free answer is confidently high.
        assert!(ensemble.process(&input).unwrap().get(0).unwrap() > 0.9);
    }
}
