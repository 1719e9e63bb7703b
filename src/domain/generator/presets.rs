use std::fmt;
use std::str::FromStr;

use crate::domain::generator::task_config::{
    ActivationStrategy, BimodalMode, DeadlineStrategy, ExecutionTimeStrategy, GraphType, MemoryStrategy, PeriodStrategy, TaskGeneratorConfig,
};
use crate::error::Error;

/// Ready-made task generator configurations for common test scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPreset {
    Small,
    ConstantPeriod,
    Medium,
    LargeSparse,
    LargeDense,
    Pipeline,
    HighUtilization,
}

impl TaskPreset {
    pub const ALL: [TaskPreset; 7] = [
        TaskPreset::Small,
        TaskPreset::ConstantPeriod,
        TaskPreset::Medium,
        TaskPreset::LargeSparse,
        TaskPreset::LargeDense,
        TaskPreset::Pipeline,
        TaskPreset::HighUtilization,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskPreset::Small => "small",
            TaskPreset::ConstantPeriod => "constant-period",
            TaskPreset::Medium => "medium",
            TaskPreset::LargeSparse => "large-sparse",
            TaskPreset::LargeDense => "large-dense",
            TaskPreset::Pipeline => "pipeline",
            TaskPreset::HighUtilization => "high-utilization",
        }
    }

    pub fn config(&self) -> TaskGeneratorConfig {
        let base = TaskGeneratorConfig::default();

        match self {
            TaskPreset::Small => TaskGeneratorConfig {
                num_tasks: 5,
                graph_type: GraphType::Chain,
                execution_time: ExecutionTimeStrategy::Uniform { min: 1, max: 5 },
                period: PeriodStrategy::Harmonic { values: vec![10, 20, 40] },
                ..base
            },
            TaskPreset::ConstantPeriod => TaskGeneratorConfig {
                num_tasks: 10,
                graph_type: GraphType::Random,
                density: 0.3,
                period: PeriodStrategy::Harmonic { values: vec![50] },
                ..base
            },
            TaskPreset::Medium => TaskGeneratorConfig {
                num_tasks: 20,
                graph_type: GraphType::Layered,
                layers: 4,
                execution_time: ExecutionTimeStrategy::Bimodal {
                    min: 1,
                    max: 15,
                    modes: vec![BimodalMode { weight: 0.7, min: 1, max: 5 }, BimodalMode { weight: 0.3, min: 8, max: 15 }],
                },
                deadline: DeadlineStrategy::Constrained { min: 0.7, max: 1.0 },
                ..base
            },
            TaskPreset::LargeSparse => TaskGeneratorConfig {
                num_tasks: 100,
                graph_type: GraphType::Random,
                density: 0.1,
                mist_task_ratio: 0.1,
                period: PeriodStrategy::Logarithmic { min: 10, max: 1000 },
                ..base
            },
            TaskPreset::LargeDense => TaskGeneratorConfig {
                num_tasks: 50,
                graph_type: GraphType::Random,
                density: 0.4,
                execution_time: ExecutionTimeStrategy::Exponential { min: 1, max: 10 },
                ..base
            },
            TaskPreset::Pipeline => TaskGeneratorConfig {
                num_tasks: 30,
                graph_type: GraphType::ForkJoin,
                fork_join_groups: 4,
                mist_task_ratio: 0.0,
                activation: ActivationStrategy::Staggered { stagger_interval: 5 },
                memory: MemoryStrategy::Proportional { min: 1, proportion_factor: 0.5 },
                ..base
            },
            TaskPreset::HighUtilization => TaskGeneratorConfig {
                num_tasks: 25,
                graph_type: GraphType::Random,
                density: 0.2,
                target_utilization: Some(0.9),
                period: PeriodStrategy::Uniform { min: 20, max: 200 },
                ..base
            },
        }
    }
}

impl fmt::Display for TaskPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| Error::ConfigError(format!("unknown task preset '{}'", s)))
    }
}
