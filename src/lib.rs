//! Flocking core for a school of fish.
//!
//! Each tick every agent scans its peers, weighs them by proximity and
//! velocity similarity, turns the ranked pulls into a steering target, then
//! integrates velocity, position and facing. Rendering is left to the host:
//! it feeds `dt` into [`Flock::tick`] once per frame and reads the agent
//! transforms back.

pub mod algorithms;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use algorithms::avoidance::{AvoidanceParams, PointerRay};
pub use algorithms::integrator::{IntegratorParams, integrate, look_rotation};
pub use algorithms::resolver::{ResolveBreakdown, resolve, resolve_detailed};
pub use algorithms::weighting::{
    CenterParams, VelocityFalloff, WeightParams, center_weight, peer_weight,
};
pub use config::{FlockParams, RankWindow, UpdateOrder};
pub use engine::{Engine, PresetInfo, preset_catalog, preset_params};
pub use error::FlockError;
pub use models::agent::{Agent, AgentId, AgentSet};
pub use models::spawn::{AgentSeed, AgentSpawner, SpawnParams};
pub use sim::{Flock, TickSummary};
