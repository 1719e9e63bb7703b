use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::domain::generator::network_config::NetworkGeneratorConfig;
use crate::domain::network::network::Network;
use crate::domain::utils::id::NodeId;

pub const MIN_LINK_DELAY: i64 = 1;
pub const MAX_LINK_DELAY: i64 = 10;

/// Everything a topology strategy works on: the network with its freshly
/// added nodes, grouped by tier, plus the generator's configuration and RNG.
pub struct TopologyContext<'a> {
    pub network: &'a mut Network,
    pub mist: &'a [NodeId],
    pub edge: &'a [NodeId],
    pub cloud: Option<&'a NodeId>,
    pub config: &'a NetworkGeneratorConfig,
    pub rng: &'a mut StdRng,
}

impl TopologyContext<'_> {
    /// Links `source` to `target` with a random delay. A rejected link is
    /// logged and skipped.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let delay = self.rng.random_range(MIN_LINK_DELAY..=MAX_LINK_DELAY);
        match self.network.connect_nodes(source, target, delay) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Skipping link {} -> {}: {}", source, target, e);
                false
            }
        }
    }

    /// `true` with probability `p`.
    pub fn roll(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    pub fn pick<'n>(&mut self, nodes: &'n [NodeId]) -> Option<&'n NodeId> {
        nodes.choose(&mut *self.rng)
    }
}

/// A network topology. Strategies are stateless; each step is a static
/// function over the shared context and they run in declaration order.
pub trait TopologyStrategy {
    fn connect_mist_to_edge(ctx: &mut TopologyContext<'_>);

    fn connect_edge_to_edge(ctx: &mut TopologyContext<'_>);

    fn connect_edge_to_cloud(ctx: &mut TopologyContext<'_>);

    fn apply(ctx: &mut TopologyContext<'_>) {
        Self::connect_mist_to_edge(ctx);
        Self::connect_edge_to_edge(ctx);
        Self::connect_edge_to_cloud(ctx);
    }
}
