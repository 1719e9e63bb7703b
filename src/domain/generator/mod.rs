pub mod network_config;
pub mod network_generator;
pub mod presets;
pub mod sampling;
pub mod task_config;
pub mod task_generator;
pub mod task_topology;
pub mod topology;
