use crate::domain::generator::topology::strategy_trait::{TopologyContext, TopologyStrategy};
use crate::domain::utils::id::NodeId;

/// Edge nodes grouped into contiguous clusters with dense links inside a
/// cluster, sparse links between clusters and one cloud gateway per cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterTopology;

/// Probability of a link between two edge nodes of the same cluster.
pub const INTRA_CLUSTER_DENSITY: f64 = 0.7;

/// Splits `nodes` into `count` contiguous groups of `ceil(len / count)`.
/// Trailing groups may be empty.
pub fn split(nodes: &[NodeId], count: usize) -> Vec<&[NodeId]> {
    let count = count.max(1);
    let size = nodes.len().div_ceil(count);

    (0..count)
        .map(|i| {
            let start = (i * size).min(nodes.len());
            let end = ((i + 1) * size).min(nodes.len());
            &nodes[start..end]
        })
        .collect()
}

impl TopologyStrategy for ClusterTopology {
    fn connect_mist_to_edge(ctx: &mut TopologyContext<'_>) {
        let count = ctx.config.cluster_count as usize;
        let edge_clusters = split(ctx.edge, count);
        let mist_clusters = split(ctx.mist, count);
        let all_edges = ctx.edge;

        for (mist, edge) in mist_clusters.into_iter().zip(edge_clusters) {
            for m in mist {
                // An empty edge cluster borrows any edge node.
                let candidates = if edge.is_empty() { all_edges } else { edge };
                if let Some(e) = ctx.pick(candidates) {
                    ctx.connect(m, e);
                }
            }
        }
    }

    fn connect_edge_to_edge(ctx: &mut TopologyContext<'_>) {
        let clusters: Vec<&[NodeId]> = split(ctx.edge, ctx.config.cluster_count as usize).into_iter().filter(|c| !c.is_empty()).collect();
        let density = ctx.config.connection_density;

        for cluster in &clusters {
            for (i, a) in cluster.iter().enumerate() {
                for b in &cluster[i + 1..] {
                    if ctx.roll(INTRA_CLUSTER_DENSITY) {
                        ctx.connect(a, b);
                    }
                }
            }
        }

        for (i, first) in clusters.iter().enumerate() {
            for second in &clusters[i + 1..] {
                if ctx.roll(density) {
                    if let (Some(a), Some(b)) = (ctx.pick(first), ctx.pick(second)) {
                        ctx.connect(a, b);
                    }
                }
            }
        }
    }

    fn connect_edge_to_cloud(ctx: &mut TopologyContext<'_>) {
        let Some(cloud) = ctx.cloud else {
            return;
        };

        for cluster in split(ctx.edge, ctx.config.cluster_count as usize) {
            if let Some(gateway) = cluster.first() {
                ctx.connect(gateway, cloud);
            }
        }
    }
}
