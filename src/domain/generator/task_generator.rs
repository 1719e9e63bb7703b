use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::domain::generator::presets::TaskPreset;
use crate::domain::generator::sampling::uunifast;
use crate::domain::generator::task_config::TaskGeneratorConfig;
use crate::domain::generator::task_topology;
use crate::domain::position::Position;
use crate::domain::schedule::schedule::Schedule;
use crate::domain::schedule::task::Task;
use crate::domain::utils::id::TaskId;
use crate::error::Result;

/// Synthesizes task sets and their precedence graph from a [`TaskGeneratorConfig`].
#[derive(Debug)]
pub struct TaskGenerator {
    config: TaskGeneratorConfig,
    rng: StdRng,
}

impl TaskGenerator {
    /// Validates `config`. With a `seed` every call sequence is reproducible.
    pub fn new(config: TaskGeneratorConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(TaskGenerator { config, rng })
    }

    pub fn from_preset(preset: TaskPreset) -> Result<Self> {
        Self::new(preset.config())
    }

    pub fn config(&self) -> &TaskGeneratorConfig {
        &self.config
    }

    /// Generates the tasks and shapes them into the configured graph type.
    pub fn generate(&mut self) -> Result<Schedule> {
        let tasks = self.generate_tasks();
        let ids: Vec<TaskId> = tasks.iter().map(|task| task.id.clone()).collect();
        let mist_count = tasks.iter().filter(|task| task.mist).count();

        let mut schedule = Schedule::new();
        for task in tasks {
            schedule.add_task(task)?;
        }

        let precedences = task_topology::shape(&mut schedule, &ids, &self.config, &mut self.rng);

        log::info!(
            "Generated {} tasks ({} mist) with {} precedences as {:?} graph, total utilization {:.3}.",
            schedule.len(),
            mist_count,
            precedences,
            self.config.graph_type,
            schedule.total_utilization()
        );

        Ok(schedule)
    }

    /// Draws the task parameters without any precedences.
    ///
    /// Periods are drawn first for all tasks since UUniFast needs all of them.
    pub fn generate_tasks(&mut self) -> Vec<Task> {
        let n = self.config.num_tasks as usize;

        let mist_count = (n as f64 * self.config.mist_task_ratio).floor() as usize;
        let mist: HashSet<usize> = index::sample(&mut self.rng, n, mist_count).into_iter().collect();

        let periods: Vec<i64> = (0..n).map(|_| self.config.period.sample(&mut self.rng)).collect();

        let execution_times: Option<Vec<i64>> = self.config.target_utilization.map(|target| {
            uunifast(&mut self.rng, n, target)
                .into_iter()
                .zip(&periods)
                .map(|(u, period)| ((*period as f64 * u).floor() as i64).max(1).min(period - 1))
                .collect()
        });

        let mut used_ids = HashSet::with_capacity(n);
        let mut tasks = Vec::with_capacity(n);

        for (i, period) in periods.iter().copied().enumerate() {
            let execution_time = match &execution_times {
                Some(execution_times) => execution_times[i],
                None => self.config.execution_time.sample(&mut self.rng, period),
            };
            let deadline = self.config.deadline.sample(&mut self.rng, period);
            let activation = self.config.activation.sample(&mut self.rng, i);
            let memory = self.config.memory.sample(&mut self.rng, execution_time);

            tasks.push(Task {
                id: self.unique_id(&mut used_ids),
                label: format!("Task {}", i),
                mist: mist.contains(&i),
                execution_time,
                period,
                deadline,
                activation,
                memory,
                successors: Vec::new(),
                position: Position::scattered(&mut self.rng),
            });
        }

        tasks
    }

    fn unique_id(&mut self, used: &mut HashSet<TaskId>) -> TaskId {
        loop {
            let id = TaskId::generate_with(&mut self.rng);
            if used.insert(id.clone()) {
                return id;
            }
            log::debug!("Task id {} drawn twice, drawing again.", id);
        }
    }
}
