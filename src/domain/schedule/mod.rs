pub mod schedule;
pub mod task;
