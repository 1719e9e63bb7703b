use serde::{Deserialize, Serialize};

use crate::domain::position::Position;

/// Flat vertex/edge form of a schedule, as exchanged with editors and exporters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ScheduleGraphDto {
    #[serde(default)]
    pub vertices: Vec<TaskVertexDto>,
    #[serde(default)]
    pub edges: Vec<PrecedenceEdgeDto>,
}

/// A task vertex. The numeric attributes are optional on input so a missing
/// attribute can be reported by name instead of as a generic parse failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TaskVertexDto {
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub mist: bool,

    #[serde(rename = "C")]
    pub execution_time: Option<i64>,

    #[serde(rename = "T")]
    pub period: Option<i64>,

    #[serde(rename = "D")]
    pub deadline: Option<i64>,

    #[serde(rename = "a")]
    pub activation: Option<i64>,

    #[serde(rename = "M")]
    pub memory: Option<i64>,

    #[serde(default)]
    pub successors: Vec<String>,

    #[serde(default)]
    pub position: Position,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceEdgeDto {
    pub id: String,
    pub from: String,
    pub to: String,
}
