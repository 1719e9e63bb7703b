use crate::domain::generator::topology::strategy_trait::{TopologyContext, TopologyStrategy};

/// Mist nodes spread evenly over a chain (or ring) of edge nodes; a share of
/// the edge nodes act as cloud gateways.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalTopology;

/// Above this density the edge chain is closed into a ring.
pub const RING_DENSITY: f64 = 0.5;

/// Above this density skip links `(i, i + 2)` are rolled.
pub const SKIP_DENSITY: f64 = 0.7;

impl TopologyStrategy for HierarchicalTopology {
    fn connect_mist_to_edge(ctx: &mut TopologyContext<'_>) {
        let (mist, edge) = (ctx.mist, ctx.edge);
        if edge.is_empty() {
            return;
        }

        let mist_per_edge = mist.len().div_ceil(edge.len());
        for (i, m) in mist.iter().enumerate() {
            ctx.connect(m, &edge[(i / mist_per_edge) % edge.len()]);
        }
    }

    fn connect_edge_to_edge(ctx: &mut TopologyContext<'_>) {
        let edge = ctx.edge;
        let density = ctx.config.connection_density;

        for pair in edge.windows(2) {
            ctx.connect(&pair[0], &pair[1]);
        }

        if density > RING_DENSITY && edge.len() > 2 {
            ctx.connect(&edge[edge.len() - 1], &edge[0]);
        }

        if density > SKIP_DENSITY {
            for i in 0..edge.len().saturating_sub(2) {
                if ctx.roll(density) {
                    ctx.connect(&edge[i], &edge[i + 2]);
                }
            }
        }
    }

    fn connect_edge_to_cloud(ctx: &mut TopologyContext<'_>) {
        let Some(cloud) = ctx.cloud else {
            return;
        };
        let edge = ctx.edge;

        let gateways = (edge.len() as f64 * ctx.config.connection_density).ceil() as usize;
        for k in 0..gateways {
            ctx.connect(&edge[k * edge.len() / gateways], cloud);
        }
    }
}
