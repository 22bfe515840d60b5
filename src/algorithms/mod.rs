pub mod avoidance;
pub mod integrator;
pub mod resolver;
pub mod weighting;
