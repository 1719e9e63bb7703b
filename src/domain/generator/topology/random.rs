use crate::domain::generator::topology::strategy_trait::{TopologyContext, TopologyStrategy};

/// Probabilistic links at `connectionDensity`, with one guaranteed edge link
/// per mist node and a guaranteed link from the first edge node to the cloud.
#[derive(Debug, Clone, Default)]
pub struct RandomTopology;

impl TopologyStrategy for RandomTopology {
    fn connect_mist_to_edge(ctx: &mut TopologyContext<'_>) {
        let (mist, edge) = (ctx.mist, ctx.edge);
        let density = ctx.config.connection_density;

        for m in mist {
            let Some(guaranteed) = ctx.pick(edge) else {
                return;
            };
            ctx.connect(m, guaranteed);

            for e in edge.iter().filter(|e| *e != guaranteed) {
                if ctx.roll(density) {
                    ctx.connect(m, e);
                }
            }
        }
    }

    fn connect_edge_to_edge(ctx: &mut TopologyContext<'_>) {
        let edge = ctx.edge;
        let density = ctx.config.connection_density;

        for (i, a) in edge.iter().enumerate() {
            for b in &edge[i + 1..] {
                if ctx.roll(density) {
                    ctx.connect(a, b);
                }
            }
        }
    }

    fn connect_edge_to_cloud(ctx: &mut TopologyContext<'_>) {
        let Some(cloud) = ctx.cloud else {
            return;
        };
        let edge = ctx.edge;
        let density = ctx.config.connection_density;

        for (i, e) in edge.iter().enumerate() {
            if i == 0 || ctx.roll(density) {
                ctx.connect(e, cloud);
            }
        }
    }
}
