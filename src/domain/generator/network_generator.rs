use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::domain::generator::network_config::{NetworkGeneratorConfig, TopologyType};
use crate::domain::generator::topology::cluster::ClusterTopology;
use crate::domain::generator::topology::hierarchical::HierarchicalTopology;
use crate::domain::generator::topology::random::RandomTopology;
use crate::domain::generator::topology::star::StarTopology;
use crate::domain::generator::topology::strategy_trait::{TopologyContext, TopologyStrategy};
use crate::domain::network::network::Network;
use crate::domain::network::node::{Node, NodeType};
use crate::domain::position::Position;
use crate::domain::utils::id::NodeId;
use crate::error::Result;

/// Utilization capacities a generated node can get.
pub const UTILIZATION_LEVELS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

pub const MIN_NODE_MEMORY: i64 = 1;
pub const MAX_NODE_MEMORY: i64 = 10;

/// Horizontal placement of each tier, as a share of the viewport width.
const MIST_X_RATIO: f64 = 0.2;
const EDGE_X_RATIO: f64 = 0.5;
const CLOUD_X_RATIO: f64 = 0.8;

const X_JITTER: i64 = 30;

/// Synthesizes mist/edge/cloud networks from a [`NetworkGeneratorConfig`].
#[derive(Debug)]
pub struct NetworkGenerator {
    config: NetworkGeneratorConfig,
    rng: StdRng,
}

impl NetworkGenerator {
    pub fn new(config: NetworkGeneratorConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(NetworkGenerator { config, rng })
    }

    pub fn config(&self) -> &NetworkGeneratorConfig {
        &self.config
    }

    pub fn generate(&mut self) -> Result<Network> {
        let mut used_ids = HashSet::new();
        let mist = self.create_nodes(NodeType::Mist, self.config.mist_count as usize, MIST_X_RATIO, &mut used_ids);
        let edge = self.create_nodes(NodeType::Edge, self.config.edge_count as usize, EDGE_X_RATIO, &mut used_ids);
        let cloud = self.config.include_cloud.then(|| self.create_cloud(&mut used_ids));

        let mist_ids: Vec<NodeId> = mist.iter().map(|node| node.id.clone()).collect();
        let edge_ids: Vec<NodeId> = edge.iter().map(|node| node.id.clone()).collect();
        let cloud_id = cloud.as_ref().map(|node| node.id.clone());

        let mut network = Network::new();
        for node in mist.into_iter().chain(edge).chain(cloud) {
            network.add_node(node)?;
        }

        let mut ctx = TopologyContext {
            network: &mut network,
            mist: &mist_ids,
            edge: &edge_ids,
            cloud: cloud_id.as_ref(),
            config: &self.config,
            rng: &mut self.rng,
        };

        match self.config.topology {
            TopologyType::Star => StarTopology::apply(&mut ctx),
            TopologyType::Random => RandomTopology::apply(&mut ctx),
            TopologyType::Hierarchical => HierarchicalTopology::apply(&mut ctx),
            TopologyType::Cluster => ClusterTopology::apply(&mut ctx),
        }

        log::info!(
            "Generated {:?} network with {} mist, {} edge and {} cloud nodes and {} links.",
            self.config.topology,
            mist_ids.len(),
            edge_ids.len(),
            usize::from(cloud_id.is_some()),
            network.get_connections().len()
        );

        Ok(network)
    }

    fn create_nodes(&mut self, node_type: NodeType, count: usize, x_ratio: f64, used_ids: &mut HashSet<NodeId>) -> Vec<Node> {
        let (width, height) = (self.config.viewport.width, self.config.viewport.height);

        (0..count)
            .map(|i| {
                let jitter = self.rng.random_range(-X_JITTER..=X_JITTER) as f64;
                let position = Position::new((x_ratio * width + jitter).floor(), ((i + 1) as f64 * height / (count + 1) as f64).floor());
                self.random_node(format!("{} {}", node_type, i + 1), node_type, position, used_ids)
            })
            .collect()
    }

    fn create_cloud(&mut self, used_ids: &mut HashSet<NodeId>) -> Node {
        let position = Position::new(self.config.viewport.width * CLOUD_X_RATIO, self.config.viewport.height * 0.5);
        self.random_node("Cloud".to_string(), NodeType::Cloud, position, used_ids)
    }

    fn random_node(&mut self, label: String, node_type: NodeType, position: Position, used_ids: &mut HashSet<NodeId>) -> Node {
        let id = loop {
            let id = NodeId::generate_with(&mut self.rng);
            if used_ids.insert(id.clone()) {
                break id;
            }
        };
        let memory = self.rng.random_range(MIN_NODE_MEMORY..=MAX_NODE_MEMORY);
        let u = UTILIZATION_LEVELS.choose(&mut self.rng).copied().unwrap_or(1.0);

        Node::new(label, node_type).with_id(id).with_capacity(memory, u).with_position(position)
    }
}
