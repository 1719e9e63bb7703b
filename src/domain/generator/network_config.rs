use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyType {
    Star,
    #[default]
    Random,
    Hierarchical,
    Cluster,
}

/// Drawing area the generated nodes are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 800.0, height: 600.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkGeneratorConfig {
    pub mist_count: i64,
    pub edge_count: i64,
    pub include_cloud: bool,
    pub topology: TopologyType,
    pub connection_density: f64,

    /// Only used by the cluster topology.
    pub cluster_count: i64,

    pub viewport: Viewport,
    pub seed: Option<u64>,
}

impl Default for NetworkGeneratorConfig {
    fn default() -> Self {
        NetworkGeneratorConfig {
            mist_count: 2,
            edge_count: 1,
            include_cloud: true,
            topology: TopologyType::Random,
            connection_density: 0.5,
            cluster_count: 2,
            viewport: Viewport::default(),
            seed: None,
        }
    }
}

impl NetworkGeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mist_count < 0 {
            return Err(Error::ConfigError(format!("mistCount must be an integer >= 0, got {}", self.mist_count)));
        }
        if self.edge_count < 0 {
            return Err(Error::ConfigError(format!("edgeCount must be an integer >= 0, got {}", self.edge_count)));
        }
        if self.cluster_count < 1 {
            return Err(Error::ConfigError(format!("clusterCount must be an integer >= 1, got {}", self.cluster_count)));
        }
        if !(0.0..=1.0).contains(&self.connection_density) {
            return Err(Error::ConfigError(format!("connectionDensity must be in range [0,1], got {}", self.connection_density)));
        }
        if self.mist_count > 0 && self.edge_count == 0 {
            return Err(Error::ConfigError("Mist nodes require at least one Edge node".to_string()));
        }
        if !self.viewport.width.is_finite() || !self.viewport.height.is_finite() || self.viewport.width < 0.0 || self.viewport.height < 0.0 {
            return Err(Error::ConfigError(format!("viewport must have a non-negative size, got {:?}", self.viewport)));
        }
        Ok(())
    }
}
