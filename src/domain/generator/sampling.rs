//! Random draws for the task parameters.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::generator::task_config::{ActivationStrategy, DeadlineStrategy, ExecutionTimeStrategy, MemoryStrategy, PeriodStrategy};

/// Uniform integer in `[min, max]`. An empty range yields `min`.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// UUniFast: `n` utilizations summing to `target`, in random order.
pub fn uunifast<R: Rng + ?Sized>(rng: &mut R, n: usize, target: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let mut utilizations = Vec::with_capacity(n);
    let mut sum_u = target;
    for i in 1..n {
        let next_sum_u = sum_u * rng.random::<f64>().powf(1.0 / (n - i) as f64);
        utilizations.push(sum_u - next_sum_u);
        sum_u = next_sum_u;
    }
    utilizations.push(sum_u);

    // Generation order is biased towards large first shares.
    utilizations.shuffle(rng);
    utilizations
}

/// `floor(exp(U(ln min, ln max)))`
pub fn log_uniform<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    let log_min = (min as f64).ln();
    let log_max = (max as f64).ln();
    let log_value = log_min + rng.random::<f64>() * (log_max - log_min);
    log_value.exp().floor() as i64
}

/// Inverse-CDF exponential draw with mean `(min + max) / 2`, floored.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    let lambda = 2.0 / (min + max) as f64;
    let value = -(1.0 - rng.random::<f64>()).ln() / lambda;
    value.floor() as i64
}

impl PeriodStrategy {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self {
            PeriodStrategy::Harmonic { values } => values[rng.random_range(0..values.len())],
            PeriodStrategy::Uniform { min, max } => random_in_range(rng, *min, *max),
            PeriodStrategy::Logarithmic { min, max } => log_uniform(rng, *min, *max),
        }
    }
}

impl ExecutionTimeStrategy {
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            ExecutionTimeStrategy::Uniform { min, max }
            | ExecutionTimeStrategy::Exponential { min, max }
            | ExecutionTimeStrategy::Bimodal { min, max, .. } => (*min, *max),
        }
    }

    /// Draws C for a task of period `period`, clamped to `[min, min(max, period - 1)]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, period: i64) -> i64 {
        let (min, max) = self.bounds();
        let upper = min.max(max.min(period - 1));

        let value = match self {
            ExecutionTimeStrategy::Uniform { .. } => random_in_range(rng, min, upper),
            ExecutionTimeStrategy::Exponential { .. } => exponential(rng, min, max),
            ExecutionTimeStrategy::Bimodal { modes, .. } => {
                let roll = rng.random::<f64>();
                let mut cumulative = 0.0;
                let mode = modes.iter().find(|mode| {
                    cumulative += mode.weight;
                    roll < cumulative
                });
                match mode {
                    Some(mode) => random_in_range(rng, mode.min, mode.max.min(period - 1)),
                    None => random_in_range(rng, min, upper),
                }
            }
        };

        value.clamp(min, upper)
    }
}

impl DeadlineStrategy {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, period: i64) -> i64 {
        match self {
            DeadlineStrategy::Implicit => period,
            DeadlineStrategy::Constrained { min, max } => {
                let ratio = min + rng.random::<f64>() * (max - min);
                (period as f64 * ratio).floor() as i64
            }
            DeadlineStrategy::Arbitrary { min, max } => {
                random_in_range(rng, (period as f64 * min).floor() as i64, (period as f64 * max).floor() as i64)
            }
        }
    }
}

impl ActivationStrategy {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, task_index: usize) -> i64 {
        match self {
            ActivationStrategy::Zero => 0,
            ActivationStrategy::Uniform { min, max } => random_in_range(rng, *min, *max),
            ActivationStrategy::Staggered { stagger_interval } => (task_index as i64).saturating_mul(*stagger_interval),
        }
    }
}

impl MemoryStrategy {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, execution_time: i64) -> i64 {
        match self {
            MemoryStrategy::Uniform { min, max } => random_in_range(rng, *min, *max),
            MemoryStrategy::Proportional { min, proportion_factor } => {
                (*min).max((execution_time as f64 * proportion_factor).floor() as i64)
            }
        }
    }
}
