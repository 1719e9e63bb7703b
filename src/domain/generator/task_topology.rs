//! Precedence shaping over generated tasks.
//!
//! All shapes work on the task order as generated. A rejected connection is
//! logged and skipped; it never aborts generation.

use rand::Rng;
use rand::seq::index;

use crate::domain::generator::task_config::{GraphType, TaskGeneratorConfig};
use crate::domain::schedule::schedule::Schedule;
use crate::domain::utils::id::TaskId;

/// Applies the configured graph type and returns the number of precedences created.
pub fn shape<R: Rng + ?Sized>(schedule: &mut Schedule, tasks: &[TaskId], config: &TaskGeneratorConfig, rng: &mut R) -> usize {
    match config.graph_type {
        GraphType::Chain => chain(schedule, tasks),
        GraphType::Tree => tree(schedule, tasks, config.branching_factor as usize),
        GraphType::ForkJoin => fork_join(schedule, tasks, config.fork_join_groups as usize),
        GraphType::Random => random_dag(schedule, tasks, config.density, rng),
        GraphType::Layered => layered(schedule, tasks, config.layers as usize, rng),
        GraphType::Independent => 0,
    }
}

fn try_connect(schedule: &mut Schedule, from: &TaskId, to: &TaskId) -> bool {
    match schedule.connect_tasks(from, to) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("Skipping precedence {} -> {}: {}", from, to, e);
            false
        }
    }
}

pub fn chain(schedule: &mut Schedule, tasks: &[TaskId]) -> usize {
    tasks.windows(2).filter(|pair| try_connect(schedule, &pair[0], &pair[1])).count()
}

/// Breadth-first tree rooted at the first task. Every parent of the current
/// level takes up to `branching_factor` children from the remaining tasks.
pub fn tree(schedule: &mut Schedule, tasks: &[TaskId], branching_factor: usize) -> usize {
    let Some(root) = tasks.first() else {
        return 0;
    };

    let mut created = 0;
    let mut current_level = vec![root];
    let mut next_child = 1;

    while next_child < tasks.len() && !current_level.is_empty() {
        let mut next_level = Vec::new();

        for parent in current_level {
            let end = (next_child + branching_factor).min(tasks.len());
            for child in &tasks[next_child..end] {
                if try_connect(schedule, parent, child) {
                    created += 1;
                }
                // Unattached children still parent the next level.
                next_level.push(child);
            }
            next_child = end;

            if next_child >= tasks.len() {
                break;
            }
        }

        current_level = next_level;
    }

    created
}

/// Source, `groups` parallel chains, sink. Falls back to a chain for fewer than three tasks.
pub fn fork_join(schedule: &mut Schedule, tasks: &[TaskId], groups: usize) -> usize {
    if tasks.len() < 3 {
        return chain(schedule, tasks);
    }

    let source = &tasks[0];
    let sink = &tasks[tasks.len() - 1];
    let parallel = &tasks[1..tasks.len() - 1];
    let groups = groups.max(1);
    let per_group = parallel.len().div_ceil(groups);

    let mut created = 0;
    for group in parallel.chunks(per_group).take(groups) {
        if try_connect(schedule, source, &group[0]) {
            created += 1;
        }
        created += chain(schedule, group);
        if try_connect(schedule, &group[group.len() - 1], sink) {
            created += 1;
        }
    }

    created
}

/// Random ordered pairs until `floor(n(n-1)/2 * density)` precedences exist
/// or `3x` that many attempts were made.
pub fn random_dag<R: Rng + ?Sized>(schedule: &mut Schedule, tasks: &[TaskId], density: f64, rng: &mut R) -> usize {
    let n = tasks.len();
    if n < 2 {
        return 0;
    }

    let max_edges = n * (n - 1) / 2;
    let target = (max_edges as f64 * density).floor() as usize;
    let attempts = target * 3;

    let mut created = 0;
    for _ in 0..attempts {
        if created >= target {
            break;
        }
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i != j && try_connect(schedule, &tasks[i], &tasks[j]) {
            created += 1;
        }
    }

    log::debug!("Random DAG: created {} of {} targeted precedences.", created, target);
    created
}

/// Contiguous layers of `ceil(n / layers)` tasks; every task links to one to
/// three distinct tasks of the next layer.
pub fn layered<R: Rng + ?Sized>(schedule: &mut Schedule, tasks: &[TaskId], layers: usize, rng: &mut R) -> usize {
    if tasks.is_empty() {
        return 0;
    }

    let per_layer = tasks.len().div_ceil(layers.max(1));
    let groups: Vec<&[TaskId]> = tasks.chunks(per_layer).collect();

    let mut created = 0;
    for pair in groups.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        for from in current {
            let amount = rng.random_range(1..=3).min(next.len());
            for target in index::sample(rng, next.len(), amount) {
                if try_connect(schedule, from, &next[target]) {
                    created += 1;
                }
            }
        }
    }

    created
}
