use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::math::vector::Vector;
use crate::nn::network::Network;
use crate::train::stats::{mse, EpochStats};

/// One training example: a rank-checked input and its target output.
#[derive(Debug, Clone)]
pub struct Sample {
    pub input: Vector,
    pub target: Vector,
}

/// Hyperparameters for a [`fit`] run.
///
/// - `epochs`         — full passes over the sample set; the run is bounded
///                      by this count and nothing else
/// - `rate`           — learning rate handed to `Network::train`
/// - `regularization` — regularization coefficient handed to `Network::train`
/// - `shuffle`        — present samples in a fresh random order each epoch
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub rate: f64,
    pub regularization: f64,
    pub shuffle: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, rate: f64, regularization: f64) -> TrainConfig {
        TrainConfig {
            epochs,
            rate,
            regularization,
            shuffle: true,
        }
    }
}

/// Trains `network` on `samples` for `config.epochs` epochs, returning one
/// [`EpochStats`] per epoch. The loss is measured by a separate inference
/// pass after each epoch's updates.
pub fn fit(
    network: &mut dyn Network,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    if samples.is_empty() {
        return Err(Error::construction("cannot fit on an empty sample set"));
    }

    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut stats = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if config.shuffle {
            order.shuffle(&mut rand::thread_rng());
        }

        for &index in &order {
            let sample = &samples[index];
            network.train(
                &sample.input,
                &sample.target,
                config.rate,
                config.regularization,
            )?;
        }

        let mut total = 0.0;
        for sample in samples {
            let output = network.process(&sample.input)?;
            total += mse(&output, &sample.target)?;
        }
        let mean_loss = total / samples.len() as f64;

        log::debug!("epoch {epoch}/{}: mean loss {mean_loss:.6}", config.epochs);
        stats.push(EpochStats { epoch, mean_loss });
    }

    Ok(stats)
}
