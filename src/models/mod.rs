pub mod agent;
pub mod spawn;
