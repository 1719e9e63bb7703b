pub mod allocation;
pub mod generator;
pub mod network;
pub mod position;
pub mod schedule;
pub mod utils;
