use std::collections::HashSet;

use indexmap::IndexMap;

use crate::api::network_dto::{LinkEdgeDto, NetworkGraphDto};
use crate::domain::network::node::{Link, Node, NodeType};
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// A link with both endpoints resolved against the network.
#[derive(Debug, Clone)]
pub struct Connection<'a> {
    pub link: &'a Link,
    pub from: &'a Node,
    pub to: &'a Node,
}

/// Attribute of a link that can be changed after creation.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkProp {
    Delay(i64),
    Label(String),
}

/// Owns the compute nodes and their links.
///
/// Rules kept by every mutator: at most one cloud node, no link from an edge
/// node into a mist node, at most one link per ordered node pair.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: IndexMap<NodeId, Node>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node`, replacing a node with the same id in place. Outgoing
    /// links carried by `node` must point to known nodes.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        node.validate()?;

        if node.node_type == NodeType::Cloud {
            if let Some(cloud) = self.nodes.values().find(|other| other.node_type == NodeType::Cloud && other.id != node.id) {
                return Err(Error::DuplicateCloud(cloud.id.clone()));
            }
        }

        let mut targets = HashSet::with_capacity(node.links.len());
        for link in &node.links {
            let target = self.nodes.get(&link.target_id).ok_or_else(|| Error::UnknownNode(link.target_id.clone()))?;
            if node.node_type == NodeType::Edge && target.node_type == NodeType::Mist {
                return Err(Error::ForbiddenLink { from: node.id.clone(), to: target.id.clone() });
            }
            if !targets.insert(&link.target_id) {
                return Err(Error::DuplicateLink { from: node.id.clone(), to: link.target_id.clone() });
            }
        }

        if node.node_type == NodeType::Mist {
            let inbound_from_edge = self
                .nodes
                .values()
                .find(|other| other.id != node.id && other.node_type == NodeType::Edge && other.link_to(&node.id).is_some());
            if let Some(edge) = inbound_from_edge {
                return Err(Error::ForbiddenLink { from: edge.id.clone(), to: node.id.clone() });
            }
        }

        log::debug!("Network: adding {} node {} ('{}').", node.node_type, node.id, node.label);
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a node and every link pointing to it.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let removed = self.nodes.shift_remove(node_id)?;
        for node in self.nodes.values_mut() {
            node.remove_link(node_id);
        }
        Some(removed)
    }

    /// Links `source_id` to `target_id`. Between two edge/cloud nodes the link
    /// is bidirectional and a mirrored record is stored on the target.
    pub fn connect_nodes(&mut self, source_id: &NodeId, target_id: &NodeId, delay: i64) -> Result<LinkId> {
        self.insert_link(source_id, target_id, delay, None)
    }

    /// `connect_nodes` with an optional id overriding the one derived from the endpoints.
    fn insert_link(&mut self, source_id: &NodeId, target_id: &NodeId, delay: i64, link_id: Option<LinkId>) -> Result<LinkId> {
        let source = self.nodes.get(source_id).ok_or_else(|| Error::UnknownNode(source_id.clone()))?;
        let target = self.nodes.get(target_id).ok_or_else(|| Error::UnknownNode(target_id.clone()))?;

        if source_id == target_id {
            return Err(Error::InvalidLink(format!("node {} cannot link to itself", source_id)));
        }
        if delay < 0 {
            return Err(Error::InvalidLink(format!("delay of link {} -> {} must not be negative, got {}", source_id, target_id, delay)));
        }
        if source.node_type == NodeType::Edge && target.node_type == NodeType::Mist {
            return Err(Error::ForbiddenLink { from: source_id.clone(), to: target_id.clone() });
        }
        if source.link_to(target_id).is_some() {
            return Err(Error::DuplicateLink { from: source_id.clone(), to: target_id.clone() });
        }

        let bidirectional = source.node_type.is_backbone() && target.node_type.is_backbone();
        if bidirectional && target.link_to(source_id).is_some() {
            return Err(Error::DuplicateLink { from: target_id.clone(), to: source_id.clone() });
        }

        let mut link = Link::new(source_id.clone(), target_id.clone(), delay, bidirectional);
        if let Some(link_id) = link_id {
            link.id = link_id;
        }
        let link_id = link.id.clone();

        if bidirectional {
            if let Some(target) = self.nodes.get_mut(target_id) {
                target.links.push(link.reversed());
            }
        }
        if let Some(source) = self.nodes.get_mut(source_id) {
            source.links.push(link);
        }

        Ok(link_id)
    }

    /// Removes the link `source_id -> target_id` only. The mirror of a
    /// bidirectional link stays on the target node.
    pub fn disconnect_nodes(&mut self, source_id: &NodeId, target_id: &NodeId) -> bool {
        self.nodes.get_mut(source_id).is_some_and(|node| node.remove_link(target_id))
    }

    pub fn get_node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub(crate) fn get_node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |node| node.node_type == node_type)
    }

    pub fn cloud(&self) -> Option<&Node> {
        self.nodes_of_type(NodeType::Cloud).next()
    }

    pub fn index_of(&self, node_id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every link once, the first record of a bidirectional pair standing for both.
    pub fn get_connections(&self) -> Vec<Connection<'_>> {
        let mut seen: HashSet<&LinkId> = HashSet::new();
        let mut connections = Vec::new();

        for node in self.nodes.values() {
            for link in &node.links {
                if !seen.insert(&link.id) {
                    continue;
                }
                if let Some(to) = self.nodes.get(&link.target_id) {
                    connections.push(Connection { link, from: node, to });
                }
            }
        }
        connections
    }

    /// Changes an attribute of every record of link `link_id`, mirrors included.
    pub fn set_connection_prop(&mut self, link_id: &LinkId, prop: LinkProp) -> Result<()> {
        if let LinkProp::Delay(delay) = prop {
            if delay < 0 {
                return Err(Error::InvalidLink(format!("delay of link {} must not be negative, got {}", link_id, delay)));
            }
        }

        let mut found = false;
        for link in self.nodes.values_mut().flat_map(|node| node.links.iter_mut()).filter(|link| &link.id == link_id) {
            match &prop {
                LinkProp::Delay(delay) => link.delay = *delay,
                LinkProp::Label(label) => link.label = label.clone(),
            }
            found = true;
        }

        if found { Ok(()) } else { Err(Error::UnknownLink(link_id.clone())) }
    }

    /// Vertices plus one edge per stored link record, mirrors included.
    pub fn to_graph(&self) -> NetworkGraphDto {
        NetworkGraphDto {
            vertices: self.nodes.values().map(Node::to_dto).collect(),
            edges: self.nodes.values().flat_map(|node| node.links.iter().map(Link::to_dto)).collect(),
        }
    }

    /// Replaces the content of this network with `graph`, replaying
    /// `add_node` and `connect_nodes`. Link ids are taken over from the
    /// graph, and an edge already materialised as the mirror of an earlier
    /// bidirectional edge is skipped. On error the network is left untouched.
    pub fn from_graph(&mut self, graph: &NetworkGraphDto) -> Result<()> {
        let mut rebuilt = Network::new();

        for vertex in &graph.vertices {
            rebuilt.add_node(Node::from_dto(vertex)?)?;
        }

        for edge in &graph.edges {
            rebuilt.replay_edge(edge)?;
        }

        log::debug!("Network: loaded {} nodes and {} links from graph.", rebuilt.len(), rebuilt.get_connections().len());
        *self = rebuilt;
        Ok(())
    }

    fn replay_edge(&mut self, edge: &LinkEdgeDto) -> Result<()> {
        let from = NodeId::new(edge.from.as_str());
        let to = NodeId::new(edge.to.as_str());

        // Either record of a bidirectional link restores both.
        let mirrored = self.nodes.get(&from).and_then(|node| node.link_to(&to)).is_some_and(|link| link.bidirectional);
        if mirrored {
            return Ok(());
        }

        let stored_id = (!edge.id.trim().is_empty()).then(|| LinkId::new(edge.id.as_str()));
        if let Some(link_id) = &stored_id {
            if self.nodes.values().flat_map(|node| node.links.iter()).any(|link| &link.id == link_id) {
                return Err(Error::InvalidLink(format!("link id {} is used by more than one link", link_id)));
            }
        }
        let link_id = self.insert_link(&from, &to, edge.delay, stored_id)?;
        if !edge.label.is_empty() {
            self.set_connection_prop(&link_id, LinkProp::Label(edge.label.clone()))?;
        }
        Ok(())
    }
}
