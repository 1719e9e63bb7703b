use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphType {
    Chain,
    Tree,
    ForkJoin,
    #[default]
    Random,
    Layered,
    Independent,
}

/// One mode of a bimodal execution-time distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimodalMode {
    pub weight: f64,
    pub min: i64,
    pub max: i64,
}

/// How execution times (C) are drawn when no target utilization is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ExecutionTimeStrategy {
    Uniform {
        #[serde(default = "one")]
        min: i64,
        #[serde(default = "ten")]
        max: i64,
    },
    Exponential {
        #[serde(default = "one")]
        min: i64,
        #[serde(default = "ten")]
        max: i64,
    },
    Bimodal {
        #[serde(default = "one")]
        min: i64,
        #[serde(default = "bimodal_max")]
        max: i64,
        #[serde(default = "default_modes")]
        modes: Vec<BimodalMode>,
    },
}

impl Default for ExecutionTimeStrategy {
    fn default() -> Self {
        ExecutionTimeStrategy::Uniform { min: 1, max: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum PeriodStrategy {
    Harmonic {
        #[serde(default = "default_harmonic_values")]
        values: Vec<i64>,
    },
    Uniform {
        #[serde(default = "ten")]
        min: i64,
        #[serde(default = "hundred")]
        max: i64,
    },
    Logarithmic {
        #[serde(default = "ten")]
        min: i64,
        #[serde(default = "hundred")]
        max: i64,
    },
}

impl Default for PeriodStrategy {
    fn default() -> Self {
        PeriodStrategy::Harmonic { values: default_harmonic_values() }
    }
}

/// Deadline strategies. `min`/`max` are D/T ratios.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum DeadlineStrategy {
    #[default]
    Implicit,
    Constrained {
        #[serde(default = "half")]
        min: f64,
        #[serde(default = "whole")]
        max: f64,
    },
    Arbitrary {
        #[serde(default = "half")]
        min: f64,
        #[serde(default = "whole")]
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ActivationStrategy {
    #[default]
    Zero,
    Uniform {
        #[serde(default)]
        min: i64,
        #[serde(default)]
        max: i64,
    },
    Staggered {
        #[serde(default = "five", rename = "staggerInterval")]
        stagger_interval: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum MemoryStrategy {
    Uniform {
        #[serde(default = "one")]
        min: i64,
        #[serde(default = "five")]
        max: i64,
    },
    Proportional {
        #[serde(default = "one")]
        min: i64,
        #[serde(default = "half", rename = "proportionFactor")]
        proportion_factor: f64,
    },
}

impl Default for MemoryStrategy {
    fn default() -> Self {
        MemoryStrategy::Uniform { min: 1, max: 5 }
    }
}

/// Configuration of a [`TaskGenerator`](super::task_generator::TaskGenerator).
///
/// Every key is optional in JSON; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskGeneratorConfig {
    pub num_tasks: i64,
    pub graph_type: GraphType,

    /// Share of the n(n-1)/2 possible edges a random graph aims for.
    pub density: f64,
    pub layers: i64,
    pub branching_factor: i64,
    pub fork_join_groups: i64,

    /// Share of tasks generated as mist tasks.
    pub mist_task_ratio: f64,

    #[serde(rename = "C")]
    pub execution_time: ExecutionTimeStrategy,
    #[serde(rename = "T")]
    pub period: PeriodStrategy,
    #[serde(rename = "D")]
    pub deadline: DeadlineStrategy,
    #[serde(rename = "a")]
    pub activation: ActivationStrategy,
    #[serde(rename = "M")]
    pub memory: MemoryStrategy,

    /// If set, execution times are derived with UUniFast so that the total utilization matches.
    pub target_utilization: Option<f64>,

    pub seed: Option<u64>,
}

impl Default for TaskGeneratorConfig {
    fn default() -> Self {
        TaskGeneratorConfig {
            num_tasks: 10,
            graph_type: GraphType::Random,
            density: 0.3,
            layers: 3,
            branching_factor: 3,
            fork_join_groups: 2,
            mist_task_ratio: 0.2,
            execution_time: ExecutionTimeStrategy::default(),
            period: PeriodStrategy::default(),
            deadline: DeadlineStrategy::default(),
            activation: ActivationStrategy::default(),
            memory: MemoryStrategy::default(),
            target_utilization: None,
            seed: None,
        }
    }
}

impl TaskGeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        at_least("numTasks", self.num_tasks, 0)?;
        ratio("density", self.density)?;
        ratio("mistTaskRatio", self.mist_task_ratio)?;
        at_least("layers", self.layers, 1)?;
        at_least("branchingFactor", self.branching_factor, 1)?;
        at_least("forkJoinGroups", self.fork_join_groups, 1)?;

        match &self.execution_time {
            ExecutionTimeStrategy::Uniform { min, max } | ExecutionTimeStrategy::Exponential { min, max } => {
                range("C", *min, *max)?;
            }
            ExecutionTimeStrategy::Bimodal { min, max, modes } => {
                range("C", *min, *max)?;
                for mode in modes {
                    range("C.modes", mode.min, mode.max)?;
                    if !mode.weight.is_finite() || mode.weight < 0.0 {
                        return Err(Error::ConfigError(format!("C.modes weight must be a non-negative number, got {}", mode.weight)));
                    }
                }
            }
        }

        match &self.period {
            PeriodStrategy::Harmonic { values } => {
                if values.is_empty() {
                    return Err(Error::ConfigError("T.values must not be empty".to_string()));
                }
                if let Some(value) = values.iter().find(|value| **value <= 0) {
                    return Err(Error::ConfigError(format!("T.values must all be greater than zero, got {}", value)));
                }
            }
            PeriodStrategy::Uniform { min, max } | PeriodStrategy::Logarithmic { min, max } => {
                range("T", *min, *max)?;
                at_least("T.min", *min, 1)?;
            }
        }

        match &self.deadline {
            DeadlineStrategy::Implicit => {}
            DeadlineStrategy::Constrained { min, max } | DeadlineStrategy::Arbitrary { min, max } => {
                if !min.is_finite() || !max.is_finite() || *min < 0.0 || min > max {
                    return Err(Error::ConfigError(format!("D ratios must satisfy 0 <= min <= max, got [{}, {}]", min, max)));
                }
            }
        }

        match &self.activation {
            ActivationStrategy::Zero => {}
            ActivationStrategy::Uniform { min, max } => range("a", *min, *max)?,
            ActivationStrategy::Staggered { stagger_interval } => at_least("a.staggerInterval", *stagger_interval, 0)?,
        }

        match &self.memory {
            MemoryStrategy::Uniform { min, max } => range("M", *min, *max)?,
            MemoryStrategy::Proportional { min, proportion_factor } => {
                at_least("M.min", *min, 0)?;
                if !proportion_factor.is_finite() || *proportion_factor < 0.0 {
                    return Err(Error::ConfigError(format!("M.proportionFactor must be a non-negative number, got {}", proportion_factor)));
                }
            }
        }

        if let Some(target) = self.target_utilization {
            if !target.is_finite() || target <= 0.0 {
                return Err(Error::ConfigError(format!("targetUtilization must be greater than zero, got {}", target)));
            }
        }

        Ok(())
    }
}

fn at_least(name: &str, value: i64, min: i64) -> Result<()> {
    if value < min {
        return Err(Error::ConfigError(format!("{} must be an integer >= {}, got {}", name, min, value)));
    }
    Ok(())
}

fn ratio(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::ConfigError(format!("{} must be in range [0,1], got {}", name, value)));
    }
    Ok(())
}

fn range(name: &str, min: i64, max: i64) -> Result<()> {
    if min < 0 || min > max {
        return Err(Error::ConfigError(format!("{} range must satisfy 0 <= min <= max, got [{}, {}]", name, min, max)));
    }
    Ok(())
}

fn one() -> i64 {
    1
}

fn five() -> i64 {
    5
}

fn ten() -> i64 {
    10
}

fn hundred() -> i64 {
    100
}

fn bimodal_max() -> i64 {
    15
}

fn half() -> f64 {
    0.5
}

fn whole() -> f64 {
    1.0
}

fn default_harmonic_values() -> Vec<i64> {
    vec![10, 20, 40, 80, 160]
}

fn default_modes() -> Vec<BimodalMode> {
    vec![BimodalMode { weight: 0.7, min: 1, max: 5 }, BimodalMode { weight: 0.3, min: 8, max: 15 }]
}
