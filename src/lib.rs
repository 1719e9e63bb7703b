use std::path::Path;

use crate::domain::generator::network_config::NetworkGeneratorConfig;
use crate::domain::generator::network_generator::NetworkGenerator;
use crate::domain::generator::task_config::TaskGeneratorConfig;
use crate::domain::generator::task_generator::TaskGenerator;
use crate::domain::network::network::Network;
use crate::domain::schedule::schedule::Schedule;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod export;
pub mod loader;
pub mod logger;

/// Reads both generator configurations and produces one problem instance.
pub fn generate_instance(task_config_path: impl AsRef<Path>, network_config_path: impl AsRef<Path>) -> Result<(Schedule, Network)> {
    logger::init();
    log::info!("Logger initialized. Starting instance generation.");

    let task_config: TaskGeneratorConfig = parse_json_file(task_config_path)?;
    let network_config: NetworkGeneratorConfig = parse_json_file(network_config_path)?;
    log::info!("Generator configurations parsed successfully.");

    let schedule = TaskGenerator::new(task_config)?.generate()?;
    let network = NetworkGenerator::new(network_config)?.generate()?;
    log::info!("Instance with {} tasks and {} nodes constructed successfully.", schedule.len(), network.len());

    Ok((schedule, network))
}
