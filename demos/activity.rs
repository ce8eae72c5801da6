// Weekly-activity anomaly demo.
//
// A three-class network is trained on simulated per-day load figures and
// learns to report low, normal, or high activity for each day of the week,
// treating roughly +-20% around the ideal figure as normal.
//
//   cargo run --bin activity

use std::f64::consts::PI;

use rand::prelude::*;

use magnetite_nn::nn::activation::logistic;
use magnetite_nn::{FeedForward, Network, Vector, DEFAULT_REGULARIZATION};

const IDEAL_LOADS: [f64; 7] = [3500.0, 50000.0, 60000.0, 62000.0, 58000.0, 55000.0, 4000.0];
const MAX_LOAD: f64 = 65000.0;
const RATE: f64 = 0.6;
const ITERATIONS: usize = 20_000;

fn normalize(load: f64) -> f64 {
    logistic(load / MAX_LOAD)
}

// One-hot day of week plus the normalized load in the last slot.
fn make_input(day: usize, load: f64) -> Vector {
    let mut input = Vector::new(8).expect("rank 8");
    input.set(day, 1.0).expect("day in range");
    input.set(7, normalize(load)).expect("slot 7");
    input
}

fn one_hot(class: usize) -> Vector {
    let mut target = Vector::new(3).expect("rank 3");
    target.set(class, 1.0).expect("class in range");
    target
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn simulate<F>(label: &str, network: &mut FeedForward, mut deviate: F)
where
    F: FnMut(f64) -> f64,
{
    println!("{label}");
    for (day, ideal) in IDEAL_LOADS.iter().enumerate() {
        let test = deviate(*ideal);
        let out = network
            .process(&make_input(day, test))
            .expect("inference on a well-formed input");
        println!(
            "{day}: input {:>8.0}; ideal {:>8.0}; normal {}; low {}; high {}",
            test,
            ideal,
            out.get(0).unwrap() > 0.6,
            out.get(1).unwrap() > 0.6,
            out.get(2).unwrap() > 0.6,
        );
    }
}

fn main() {
    env_logger::init();

    let mut rng = rand::thread_rng();
    let mut network = FeedForward::new(&[8, 7, 3]).expect("valid layer ranks");

    let target_normal = one_hot(0);
    let target_low = one_hot(1);
    let target_high = one_hot(2);

    println!("Training network...");

    // Stochastic training: each iteration walks the week in random order
    // and presents one normal, one low, and one high deviation per day.
    // Loads more than ~20% under the ideal count as low, more than ~20%
    // over as high.
    let mut days: Vec<usize> = (0..IDEAL_LOADS.len()).collect();
    for iteration in 0..ITERATIONS {
        if (iteration + 1) % (ITERATIONS / 10) == 0 {
            log::info!("completed {} of {ITERATIONS} iterations", iteration + 1);
        }

        days.shuffle(&mut rng);
        for &day in &days {
            let ideal = IDEAL_LOADS[day];

            let normal = ideal * (1.0 + (rng.gen::<f64>() - 0.5) * 0.2);
            network
                .train(
                    &make_input(day, normal),
                    &target_normal,
                    RATE,
                    DEFAULT_REGULARIZATION,
                )
                .expect("training on a well-formed sample");

            let low = ideal * (0.8 * rng.gen::<f64>());
            network
                .train(
                    &make_input(day, low),
                    &target_low,
                    RATE,
                    DEFAULT_REGULARIZATION,
                )
                .expect("training on a well-formed sample");

            let high = ideal * (1.2 + 10.0 * rng.gen::<f64>());
            network
                .train(
                    &make_input(day, high),
                    &target_high,
                    RATE,
                    DEFAULT_REGULARIZATION,
                )
                .expect("training on a well-formed sample");
        }
    }

    // Normal, low, and high test inputs draw uniform deviations; the random
    // test draws gaussian deviations around the ideal.
    let mut uniform = rand::thread_rng();
    simulate("Normal input test", &mut network, |x| {
        x * (1.0 + (uniform.gen::<f64>() - 0.5) * 0.05)
    });

    let mut uniform = rand::thread_rng();
    simulate("High input test", &mut network, |x| {
        x * (1.3 + 20.0 * uniform.gen::<f64>())
    });

    let mut uniform = rand::thread_rng();
    simulate("Low input test", &mut network, |x| {
        x * (0.8 * uniform.gen::<f64>())
    });

    let mut gauss = rand::thread_rng();
    simulate("Random input test", &mut network, |x| {
        x * (1.0 + sample_standard_normal(&mut gauss) * 0.15).abs()
    });
}
