pub mod cluster;
pub mod hierarchical;
pub mod random;
pub mod star;
pub mod strategy_trait;
