use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use num_integer::Integer;

use crate::api::schedule_dto::{PrecedenceEdgeDto, ScheduleGraphDto};
use crate::domain::schedule::task::Task;
use crate::domain::utils::id::{PrecedenceId, TaskId};
use crate::error::{Error, Result};

/// A precedence edge with both endpoints resolved against the schedule.
#[derive(Debug, Clone)]
pub struct Precedence<'a> {
    pub id: PrecedenceId,
    pub from: &'a Task,
    pub to: &'a Task,
}

pub fn precedence_id(from: &TaskId, to: &TaskId) -> PrecedenceId {
    PrecedenceId::new(format!("{}_{}", from, to))
}

/// Owns all tasks and is the only place precedence edges are created or removed.
///
/// Tasks are kept in insertion order, which is the enumeration order used by
/// every exporter. The successor relation is kept acyclic and never points
/// into a mist task.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    tasks: IndexMap<TaskId, Task>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `task`, replacing a task with the same id in place.
    ///
    /// A mist task strips its id from every other task's successors. A
    /// successor list carried by `task` is checked against the same rules
    /// as `connect_tasks`.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        task.validate()?;

        for successor_id in &task.successors {
            let successor = self.tasks.get(successor_id).ok_or_else(|| Error::UnknownTask(successor_id.clone()))?;
            if successor.mist {
                return Err(Error::MistTargetError(successor_id.clone()));
            }
            if !task.mist && self.reaches(successor_id, &task.id) {
                return Err(Error::CycleError { from: task.id.clone(), to: successor_id.clone() });
            }
        }

        if task.mist {
            self.strip_incoming(&task.id);
        }

        log::debug!("Schedule: adding task {} ('{}').", task.id, task.label);
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Removes a task and every precedence pointing to it.
    pub fn remove_task(&mut self, task_id: &TaskId) -> Option<Task> {
        let removed = self.tasks.shift_remove(task_id)?;
        self.strip_incoming(task_id);
        Some(removed)
    }

    /// Adds the precedence `from -> to`.
    pub fn connect_tasks(&mut self, from: &TaskId, to: &TaskId) -> Result<PrecedenceId> {
        if !self.tasks.contains_key(from) {
            return Err(Error::UnknownTask(from.clone()));
        }
        let target = self.tasks.get(to).ok_or_else(|| Error::UnknownTask(to.clone()))?;

        if target.mist {
            return Err(Error::MistTargetError(to.clone()));
        }

        if from == to {
            return Err(Error::CycleError { from: from.clone(), to: to.clone() });
        }

        if self.tasks.get(from).is_some_and(|task| task.has_successor(to)) {
            return Err(Error::DuplicateEdge { from: from.clone(), to: to.clone() });
        }

        if self.reaches(to, from) {
            return Err(Error::CycleError { from: from.clone(), to: to.clone() });
        }

        if let Some(task) = self.tasks.get_mut(from) {
            task.successors.push(to.clone());
        }

        Ok(precedence_id(from, to))
    }

    /// Removes the precedence `from -> to`. Returns whether an edge was removed.
    pub fn disconnect_tasks(&mut self, from: &TaskId, to: &TaskId) -> bool {
        self.tasks.get_mut(from).is_some_and(|task| task.remove_successor(to))
    }

    /// Changes the mist flag of a task. Becoming mist drops all of the task's
    /// incoming precedences.
    pub fn set_mist(&mut self, task_id: &TaskId, mist: bool) -> Result<()> {
        let task = self.tasks.get_mut(task_id).ok_or_else(|| Error::UnknownTask(task_id.clone()))?;
        task.mist = mist;

        if mist {
            self.strip_incoming(task_id);
        }
        Ok(())
    }

    pub fn get_task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.tasks.contains_key(task_id)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Position of a task in the enumeration order.
    pub fn index_of(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.get_index_of(task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get_precedences(&self) -> Vec<Precedence<'_>> {
        let mut precedences = Vec::new();
        for from in self.tasks.values() {
            for successor_id in &from.successors {
                if let Some(to) = self.tasks.get(successor_id) {
                    precedences.push(Precedence { id: precedence_id(&from.id, &to.id), from, to });
                }
            }
        }
        precedences
    }

    /// Precedences with unresolved endpoint ids, for serialization.
    pub fn precedence_edges(&self) -> Vec<PrecedenceEdgeDto> {
        self.get_precedences()
            .into_iter()
            .map(|precedence| PrecedenceEdgeDto {
                id: precedence.id.to_string(),
                from: precedence.from.id.to_string(),
                to: precedence.to.id.to_string(),
            })
            .collect()
    }

    pub fn to_graph(&self) -> ScheduleGraphDto {
        ScheduleGraphDto { vertices: self.tasks.values().map(Task::to_dto).collect(), edges: self.precedence_edges() }
    }

    /// Replaces the content of this schedule with `graph`.
    ///
    /// Every vertex goes through `add_task` and every edge through
    /// `connect_tasks`, so a loaded graph follows the same rules as
    /// one built edit by edit. On error the schedule is left untouched.
    pub fn from_graph(&mut self, graph: &ScheduleGraphDto) -> Result<()> {
        let mut rebuilt = Schedule::new();

        for vertex in &graph.vertices {
            rebuilt.add_task(Task::from_dto(vertex)?)?;
        }

        for edge in &graph.edges {
            rebuilt.connect_tasks(&TaskId::new(edge.from.as_str()), &TaskId::new(edge.to.as_str()))?;
        }

        log::debug!("Schedule: loaded {} tasks and {} precedences from graph.", rebuilt.len(), graph.edges.len());
        *self = rebuilt;
        Ok(())
    }

    /// Tasks in a topological order of the precedence relation (Kahn's algorithm,
    /// ties broken by insertion order).
    pub fn topological_order(&self) -> Vec<&Task> {
        let mut in_degree: HashMap<&TaskId, usize> = self.tasks.keys().map(|id| (id, 0)).collect();
        for task in self.tasks.values() {
            for successor_id in &task.successors {
                if let Some(degree) = in_degree.get_mut(successor_id) {
                    *degree += 1;
                }
            }
        }

        let mut ready: VecDeque<&Task> = self.tasks.values().filter(|task| in_degree[&task.id] == 0).collect();
        let mut order = Vec::with_capacity(self.tasks.len());

        while let Some(task) = ready.pop_front() {
            order.push(task);
            for successor_id in &task.successors {
                if let Some(degree) = in_degree.get_mut(successor_id) {
                    *degree -= 1;
                    if *degree == 0 {
                        if let Some(successor) = self.tasks.get(successor_id) {
                            ready.push_back(successor);
                        }
                    }
                }
            }
        }

        order
    }

    /// Sum of C/T over all tasks.
    pub fn total_utilization(&self) -> f64 {
        self.tasks.values().map(Task::utilization).sum()
    }

    /// Least common multiple of all periods. `None` for an empty schedule or on overflow.
    pub fn hyperperiod(&self) -> Option<i64> {
        let mut periods = self.tasks.values().map(|task| task.period);
        let first = periods.next()?;

        periods.try_fold(first, |hyperperiod, period| (hyperperiod / hyperperiod.gcd(&period)).checked_mul(period))
    }

    /// Tasks without predecessors.
    pub fn entry_tasks(&self) -> Vec<&Task> {
        let targets: HashSet<&TaskId> = self.tasks.values().flat_map(|task| task.successors.iter()).collect();
        self.tasks.values().filter(|task| !targets.contains(&task.id)).collect()
    }

    /// Tasks without successors.
    pub fn exit_tasks(&self) -> Vec<&Task> {
        self.tasks.values().filter(|task| task.successors.is_empty()).collect()
    }

    fn strip_incoming(&mut self, task_id: &TaskId) {
        for task in self.tasks.values_mut() {
            if task.remove_successor(task_id) {
                log::debug!("Schedule: dropped precedence {} -> {}.", task.id, task_id);
            }
        }
    }

    /// Whether `target` is reachable from `start` over successor edges.
    ///
    /// Iterative DFS. `on_path` holds the tasks of the current descent and is
    /// unwound on backtrack; `exhausted` holds tasks whose whole subtree is
    /// known not to reach `target`, so shared subgraphs are walked once.
    fn reaches<'a>(&'a self, start: &'a TaskId, target: &TaskId) -> bool {
        if start == target {
            return true;
        }

        let mut on_path: HashSet<&TaskId> = HashSet::from([start]);
        let mut exhausted: HashSet<&TaskId> = HashSet::new();
        let mut stack: Vec<(&TaskId, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let current = frame.0;
            let successors = self.tasks.get(current).map(|task| task.successors()).unwrap_or_default();

            match successors.get(frame.1) {
                Some(next) => {
                    frame.1 += 1;
                    // A task already on the path means the relation is cyclic already.
                    if next == target || on_path.contains(next) {
                        return true;
                    }
                    if exhausted.contains(next) {
                        continue;
                    }
                    on_path.insert(next);
                    stack.push((next, 0));
                }
                None => {
                    on_path.remove(current);
                    exhausted.insert(current);
                    stack.pop();
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(label: &str) -> Task {
        Task::new(label, false, 1, 10, 10, 0, 1)
    }

    fn schedule_with(count: usize) -> (Schedule, Vec<TaskId>) {
        let mut schedule = Schedule::new();
        let mut ids = Vec::new();
        for i in 0..count {
            let task = task(&format!("Task {}", i));
            ids.push(task.id.clone());
            schedule.add_task(task).unwrap();
        }
        (schedule, ids)
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let (mut schedule, ids) = schedule_with(4);
        schedule.connect_tasks(&ids[0], &ids[1]).unwrap();
        schedule.connect_tasks(&ids[0], &ids[2]).unwrap();
        schedule.connect_tasks(&ids[1], &ids[3]).unwrap();
        schedule.connect_tasks(&ids[2], &ids[3]).unwrap();

        // Walking 1 and 2 both reach 3; this must not look like a cycle.
        assert!(schedule.connect_tasks(&ids[0], &ids[3]).is_ok());
        assert!(matches!(schedule.connect_tasks(&ids[3], &ids[0]), Err(Error::CycleError { .. })));
    }

    #[test]
    fn test_self_loop_is_rejected_without_mutation() {
        let (mut schedule, ids) = schedule_with(1);

        assert!(matches!(schedule.connect_tasks(&ids[0], &ids[0]), Err(Error::CycleError { .. })));
        assert!(schedule.get_task(&ids[0]).unwrap().successors().is_empty());
    }

    #[test]
    fn test_duplicate_edge() {
        let (mut schedule, ids) = schedule_with(2);
        schedule.connect_tasks(&ids[0], &ids[1]).unwrap();

        assert!(matches!(schedule.connect_tasks(&ids[0], &ids[1]), Err(Error::DuplicateEdge { .. })));
    }

    #[test]
    fn test_unknown_task() {
        let (mut schedule, ids) = schedule_with(1);
        let ghost = TaskId::new("ghost");

        assert!(matches!(schedule.connect_tasks(&ids[0], &ghost), Err(Error::UnknownTask(id)) if id == ghost));
    }

    #[test]
    fn test_precedence_into_mist_task_fails() {
        let (mut schedule, ids) = schedule_with(2);
        schedule.set_mist(&ids[1], true).unwrap();

        assert!(matches!(schedule.connect_tasks(&ids[0], &ids[1]), Err(Error::MistTargetError(_))));
        // Mist tasks may still have successors.
        assert!(schedule.connect_tasks(&ids[1], &ids[0]).is_ok());
    }

    #[test]
    fn test_replacing_task_with_cyclic_successors_fails() {
        let (mut schedule, ids) = schedule_with(2);
        schedule.connect_tasks(&ids[0], &ids[1]).unwrap();

        let mut replacement = schedule.get_task(&ids[1]).unwrap().clone();
        replacement.successors.push(ids[0].clone());

        assert!(matches!(schedule.add_task(replacement), Err(Error::CycleError { .. })));
        assert!(schedule.get_task(&ids[1]).unwrap().successors().is_empty());
    }

    #[test]
    fn test_replace_keeps_enumeration_slot() {
        let (mut schedule, ids) = schedule_with(3);
        let mut replacement = schedule.get_task(&ids[1]).unwrap().clone();
        replacement.label = "renamed".to_string();
        schedule.add_task(replacement).unwrap();

        assert_eq!(schedule.index_of(&ids[1]), Some(1));
        assert_eq!(schedule.get_task(&ids[1]).unwrap().label, "renamed");
    }

    #[test]
    fn test_disconnect_missing_edge_is_noop() {
        let (mut schedule, ids) = schedule_with(2);
        assert!(!schedule.disconnect_tasks(&ids[0], &ids[1]));
        assert!(!schedule.disconnect_tasks(&TaskId::new("ghost"), &ids[1]));
    }

    #[test]
    fn test_hyperperiod_and_utilization() {
        let mut schedule = Schedule::new();
        schedule.add_task(Task::new("A", false, 2, 10, 10, 0, 1)).unwrap();
        schedule.add_task(Task::new("B", false, 3, 15, 15, 0, 1)).unwrap();
        schedule.add_task(Task::new("C", false, 1, 4, 4, 0, 1)).unwrap();

        assert_eq!(schedule.hyperperiod(), Some(60));
        assert!((schedule.total_utilization() - 0.65).abs() < 1e-9);
        assert_eq!(Schedule::new().hyperperiod(), None);
    }

    #[test]
    fn test_entry_and_exit_tasks() {
        let (mut schedule, ids) = schedule_with(3);
        schedule.connect_tasks(&ids[0], &ids[1]).unwrap();

        let entries: Vec<&TaskId> = schedule.entry_tasks().into_iter().map(|t| &t.id).collect();
        let exits: Vec<&TaskId> = schedule.exit_tasks().into_iter().map(|t| &t.id).collect();

        assert_eq!(entries, vec![&ids[0], &ids[2]]);
        assert_eq!(exits, vec![&ids[1], &ids[2]]);
    }

    #[test]
    fn test_failed_from_graph_leaves_schedule_untouched() {
        let (mut schedule, ids) = schedule_with(2);
        schedule.connect_tasks(&ids[0], &ids[1]).unwrap();

        let mut graph = schedule.to_graph();
        graph.edges.push(PrecedenceEdgeDto { id: "x".to_string(), from: ids[1].to_string(), to: ids[0].to_string() });

        assert!(matches!(schedule.from_graph(&graph), Err(Error::CycleError { .. })));
        assert_eq!(schedule.len(), 2);
        assert!(schedule.get_task(&ids[0]).unwrap().has_successor(&ids[1]));
    }
}
