use thiserror::Error;

use crate::domain::utils::id::{LinkId, NodeId, TaskId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write delimited text: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Unknown link: {0}")]
    UnknownLink(LinkId),

    #[error("Precedence from task {from} to task {to} already exists")]
    DuplicateEdge { from: TaskId, to: TaskId },

    #[error("Link from node {from} to node {to} already exists")]
    DuplicateLink { from: NodeId, to: NodeId },

    #[error("Connecting task {from} to task {to} would create a circular dependency")]
    CycleError { from: TaskId, to: TaskId },

    #[error("Edge node {from} cannot connect to mist node {to}")]
    ForbiddenLink { from: NodeId, to: NodeId },

    #[error("Cannot add precedence to mist task {0}")]
    MistTargetError(TaskId),

    #[error("Only one cloud node is allowed in the network, {0} already is one")]
    DuplicateCloud(NodeId),

    #[error("Mist node {node} already holds task {task}")]
    MistNodeOccupied { node: NodeId, task: TaskId },

    #[error("Invalid generator configuration: {0}")]
    ConfigError(String),

    #[error("Malformed DAT input at line {line}: {reason}")]
    DatFormat { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
