use serde::{Deserialize, Serialize};

use crate::domain::position::Position;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkGraphDto {
    #[serde(default)]
    pub vertices: Vec<NodeVertexDto>,
    #[serde(default)]
    pub edges: Vec<LinkEdgeDto>,
}

/// A node vertex. `id`, `label`, `type`, `memory` and `u` must be present on
/// every vertex handed to `Network::from_graph`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NodeVertexDto {
    pub id: Option<String>,
    pub label: Option<String>,

    #[serde(rename = "type")]
    pub node_type: Option<String>,

    pub memory: Option<i64>,
    pub u: Option<f64>,

    #[serde(default)]
    pub position: Position,

    /// Ids of the tasks allocated to this node.
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkEdgeDto {
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub from: String,
    pub to: String,

    #[serde(default = "default_delay")]
    pub delay: i64,

    #[serde(default)]
    pub bidirectional: bool,
}

fn default_delay() -> i64 {
    1
}
