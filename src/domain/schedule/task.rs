use std::collections::HashSet;

use crate::api::schedule_dto::TaskVertexDto;
use crate::domain::position::Position;
use crate::domain::utils::id::TaskId;
use crate::error::{Error, Result};

/// A periodic real-time task, the vertex of the precedence graph.
///
/// The timing attributes are integer ticks. Precedence edges are stored as
/// the ids of direct successors and can only be changed through a
/// [`Schedule`](crate::domain::schedule::schedule::Schedule).
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub label: String,

    /// If the allocation of this task is fixed to a node. Mist tasks never have incoming precedences.
    pub mist: bool,

    /// Worst-case execution time (C)
    pub execution_time: i64,

    /// Period (T)
    pub period: i64,

    /// Relative deadline (D)
    pub deadline: i64,

    /// Activation offset (a)
    pub activation: i64,

    /// Memory requirement (M)
    pub memory: i64,

    pub(crate) successors: Vec<TaskId>,

    pub position: Position,
}

impl Task {
    pub fn new(label: impl Into<String>, mist: bool, execution_time: i64, period: i64, deadline: i64, activation: i64, memory: i64) -> Self {
        Task {
            id: TaskId::generate(),
            label: label.into(),
            mist,
            execution_time,
            period,
            deadline,
            activation,
            memory,
            successors: Vec::new(),
            position: Position::scattered(&mut rand::rng()),
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Ids of the direct successors, in the order the precedences were added.
    pub fn successors(&self) -> &[TaskId] {
        &self.successors
    }

    pub fn has_successor(&self, task_id: &TaskId) -> bool {
        self.successors.contains(task_id)
    }

    /// C / T of this task.
    pub fn utilization(&self) -> f64 {
        self.execution_time as f64 / self.period as f64
    }

    pub(crate) fn remove_successor(&mut self, task_id: &TaskId) -> bool {
        let before = self.successors.len();
        self.successors.retain(|id| id != task_id);
        before != self.successors.len()
    }

    /// Builds a task from a graph vertex. Successors are not taken over; they
    /// are restored by replaying the graph's edges.
    pub fn from_dto(dto: &TaskVertexDto) -> Result<Self> {
        let id = dto.id.as_deref().ok_or_else(|| Error::InvalidTask("vertex is missing attribute 'id'".to_string()))?;
        let required = |name: &str, value: Option<i64>| {
            value.ok_or_else(|| Error::InvalidTask(format!("vertex {} is missing attribute '{}'", id, name)))
        };

        let task = Task {
            id: TaskId::new(id),
            label: dto.label.clone().unwrap_or_else(|| id.to_string()),
            mist: dto.mist,
            execution_time: required("C", dto.execution_time)?,
            period: required("T", dto.period)?,
            deadline: required("D", dto.deadline)?,
            activation: required("a", dto.activation)?,
            memory: required("M", dto.memory)?,
            successors: Vec::new(),
            position: dto.position,
        };
        task.validate()?;

        Ok(task)
    }

    pub fn to_dto(&self) -> TaskVertexDto {
        TaskVertexDto {
            id: Some(self.id.to_string()),
            label: Some(self.label.clone()),
            mist: self.mist,
            execution_time: Some(self.execution_time),
            period: Some(self.period),
            deadline: Some(self.deadline),
            activation: Some(self.activation),
            memory: Some(self.memory),
            successors: self.successors.iter().map(|id| id.to_string()).collect(),
            position: self.position,
        }
    }

    /// Checks that the task conforms to the task shape.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidTask(format!("task '{}' has an empty id", self.label)));
        }

        let attributes = [
            ("C", self.execution_time),
            ("T", self.period),
            ("D", self.deadline),
            ("a", self.activation),
            ("M", self.memory),
        ];
        for (name, value) in attributes {
            if value < 0 {
                return Err(Error::InvalidTask(format!("attribute {} in task {} must not be negative, got {}", name, self.id, value)));
            }
        }

        if self.period == 0 {
            return Err(Error::InvalidTask(format!("period of task {} must be greater than zero", self.id)));
        }

        let mut seen = HashSet::with_capacity(self.successors.len());
        for successor in &self.successors {
            if successor == &self.id {
                return Err(Error::InvalidTask(format!("task {} cannot be a successor to itself", self.id)));
            }
            if !seen.insert(successor) {
                return Err(Error::InvalidTask(format!("task {} lists successor {} twice", self.id, successor)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_has_short_id_and_no_successors() {
        let task = Task::new("Task 0", false, 2, 10, 10, 0, 1);

        assert_eq!(task.id.as_str().len(), 8);
        assert!(task.successors().is_empty());
        assert!(task.validate().is_ok());
        assert!((task.utilization() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_negative_attribute() {
        let task = Task::new("Broken", false, -1, 10, 10, 0, 1);
        assert!(matches!(task.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let task = Task::new("Broken", false, 0, 0, 0, 0, 0);
        assert!(matches!(task.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn test_validate_rejects_self_successor() {
        let mut task = Task::new("Loop", false, 1, 10, 10, 0, 1);
        task.successors.push(task.id.clone());
        assert!(matches!(task.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn test_from_dto_reports_missing_attribute() {
        let mut dto = Task::new("A", false, 1, 10, 10, 0, 1).to_dto();
        dto.deadline = None;

        match Task::from_dto(&dto) {
            Err(Error::InvalidTask(reason)) => assert!(reason.contains("'D'")),
            other => panic!("expected InvalidTask, got {:?}", other),
        }
    }

    #[test]
    fn test_dto_conversion_keeps_attributes() {
        let task = Task::new("A", true, 3, 20, 15, 2, 4);
        let back = Task::from_dto(&task.to_dto()).unwrap();

        assert_eq!(back, task);
    }

    #[test]
    fn test_remove_successor() {
        let mut task = Task::new("A", false, 1, 10, 10, 0, 1);
        let other = TaskId::new("other");
        task.successors.push(other.clone());

        assert!(task.remove_successor(&other));
        assert!(!task.remove_successor(&other));
        assert!(!task.has_successor(&other));
    }
}
