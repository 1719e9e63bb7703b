use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::api::network_dto::{LinkEdgeDto, NodeVertexDto};
use crate::domain::position::Position;
use crate::domain::utils::id::{LinkId, NodeId, TaskId};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    #[default]
    Undefined,
    Mist,
    Edge,
    Cloud,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Undefined => "UNDEFINED",
            NodeType::Mist => "MIST",
            NodeType::Edge => "EDGE",
            NodeType::Cloud => "CLOUD",
        }
    }

    /// Edge and cloud nodes talk to each other in both directions.
    pub fn is_backbone(&self) -> bool {
        matches!(self, NodeType::Edge | NodeType::Cloud)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UNDEFINED" => Ok(NodeType::Undefined),
            "MIST" => Ok(NodeType::Mist),
            "EDGE" => Ok(NodeType::Edge),
            "CLOUD" => Ok(NodeType::Cloud),
            _ => Err(Error::InvalidNodeType(s.to_string())),
        }
    }
}

/// A directed link stored on its source node. Bidirectional links exist as
/// two `Link` records, one per endpoint, sharing id and delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub label: String,
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub delay: i64,
    pub bidirectional: bool,
}

impl Link {
    pub fn new(source_id: NodeId, target_id: NodeId, delay: i64, bidirectional: bool) -> Self {
        let arrow = if bidirectional { "<->" } else { "->" };
        Link {
            id: LinkId::new(format!("{}{}{}", source_id, arrow, target_id)),
            label: String::new(),
            source_id,
            target_id,
            delay,
            bidirectional,
        }
    }

    /// The mirrored record for the target node.
    pub fn reversed(&self) -> Self {
        Link {
            id: self.id.clone(),
            label: self.label.clone(),
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
            delay: self.delay,
            bidirectional: self.bidirectional,
        }
    }

    pub fn to_dto(&self) -> LinkEdgeDto {
        LinkEdgeDto {
            id: self.id.to_string(),
            label: self.label.clone(),
            from: self.source_id.to_string(),
            to: self.target_id.to_string(),
            delay: self.delay,
            bidirectional: self.bidirectional,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub node_type: NodeType,

    /// Memory capacity
    pub memory: i64,

    /// Utilization capacity
    pub u: f64,

    pub position: Position,

    /// Tasks allocated to this node, see `domain::allocation`.
    pub(crate) tasks: IndexSet<TaskId>,

    /// Outgoing links
    pub(crate) links: Vec<Link>,
}

impl Node {
    pub fn new(label: impl Into<String>, node_type: NodeType) -> Self {
        Node {
            id: NodeId::generate(),
            label: label.into(),
            node_type,
            memory: 1,
            u: 0.0,
            position: Position::scattered(&mut rand::rng()),
            tasks: IndexSet::new(),
            links: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_capacity(mut self, memory: i64, u: f64) -> Self {
        self.memory = memory;
        self.u = u;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link_to(&self, target_id: &NodeId) -> Option<&Link> {
        self.links.iter().find(|link| &link.target_id == target_id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.iter()
    }

    pub fn holds_task(&self, task_id: &TaskId) -> bool {
        self.tasks.contains(task_id)
    }

    pub(crate) fn remove_link(&mut self, target_id: &NodeId) -> bool {
        let before = self.links.len();
        self.links.retain(|link| &link.target_id != target_id);
        before != self.links.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidNode(format!("node '{}' has an empty id", self.label)));
        }
        if self.memory < 0 {
            return Err(Error::InvalidNode(format!("memory of node {} must not be negative, got {}", self.id, self.memory)));
        }
        if !self.u.is_finite() || self.u < 0.0 {
            return Err(Error::InvalidNode(format!("utilization of node {} must be a non-negative number, got {}", self.id, self.u)));
        }
        if self.node_type == NodeType::Mist && self.tasks.len() > 1 {
            return Err(Error::InvalidNode(format!("mist node {} holds {} tasks, at most one is allowed", self.id, self.tasks.len())));
        }
        for link in &self.links {
            if link.source_id != self.id {
                return Err(Error::InvalidNode(format!("node {} carries link {} of node {}", self.id, link.id, link.source_id)));
            }
        }
        Ok(())
    }

    /// Builds a node from a graph vertex. Links are restored from the graph's
    /// edges; allocated tasks are taken over as listed.
    pub fn from_dto(dto: &NodeVertexDto) -> Result<Self> {
        let id = dto.id.as_deref().ok_or_else(|| Error::InvalidNode("vertex is missing attribute 'id'".to_string()))?;
        let missing = |name: &str| Error::InvalidNode(format!("vertex {} is missing attribute '{}'", id, name));

        let label = dto.label.clone().ok_or_else(|| missing("label"))?;
        let node_type = dto.node_type.as_deref().ok_or_else(|| missing("type"))?.parse::<NodeType>()?;
        let memory = dto.memory.ok_or_else(|| missing("memory"))?;
        let u = dto.u.ok_or_else(|| missing("u"))?;

        let node = Node {
            id: NodeId::new(id),
            label,
            node_type,
            memory,
            u,
            position: dto.position,
            tasks: dto.tasks.iter().map(|task| TaskId::new(task.as_str())).collect(),
            links: Vec::new(),
        };
        node.validate()?;

        Ok(node)
    }

    pub fn to_dto(&self) -> NodeVertexDto {
        NodeVertexDto {
            id: Some(self.id.to_string()),
            label: Some(self.label.clone()),
            node_type: Some(self.node_type.to_string()),
            memory: Some(self.memory),
            u: Some(self.u),
            position: self.position,
            tasks: self.tasks.iter().map(|id| id.to_string()).collect(),
        }
    }
}
