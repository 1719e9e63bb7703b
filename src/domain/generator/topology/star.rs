use crate::domain::generator::topology::strategy_trait::{TopologyContext, TopologyStrategy};

/// Every mist node to every edge node, every edge node to the cloud.
#[derive(Debug, Clone, Default)]
pub struct StarTopology;

impl TopologyStrategy for StarTopology {
    fn connect_mist_to_edge(ctx: &mut TopologyContext<'_>) {
        let (mist, edge) = (ctx.mist, ctx.edge);
        for m in mist {
            for e in edge {
                ctx.connect(m, e);
            }
        }
    }

    fn connect_edge_to_edge(_ctx: &mut TopologyContext<'_>) {}

    fn connect_edge_to_cloud(ctx: &mut TopologyContext<'_>) {
        let Some(cloud) = ctx.cloud else {
            return;
        };
        let edge = ctx.edge;
        for e in edge {
            ctx.connect(e, cloud);
        }
    }
}
