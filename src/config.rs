//! Flock tuning.
//!
//! Every constant the flocking math depends on lives in [`FlockParams`]. The
//! defaults give the classic school of fish; other personalities are in
//! [`crate::engine::preset_catalog`]. Params can be loaded from TOML, where any
//! omitted field falls back to its default.

use crate::algorithms::avoidance::AvoidanceParams;
use crate::algorithms::integrator::IntegratorParams;
use crate::algorithms::weighting::{CenterParams, WeightParams};
use crate::error::{FlockError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_NEIGHBOR_RADIUS: f64 = 40.0;
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.4;
pub const DEFAULT_COHESION_WINDOW: RankWindow = RankWindow { start: 1, end: 30 };
pub const DEFAULT_SEPARATION_WINDOW: RankWindow = RankWindow { start: 170, end: 199 };

/// Half-open range `[start, end)` of 0-based positions in the ranked
/// neighbor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankWindow {
    pub start: usize,
    pub end: usize,
}

impl RankWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The part of `items` covered by this window. Never indexes past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// How a tick orders reads against writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateOrder {
    /// Resolve every agent against the tick-start state, then integrate all.
    #[default]
    Snapshot,
    /// Resolve and integrate one agent at a time in set order; later agents
    /// see earlier agents' updates from the same tick.
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    /// Peers at or beyond this distance are ignored.
    pub neighbor_radius: f64,
    /// Sort weighted displacements by magnitude and apply the cohesion and
    /// separation windows. When false every considered displacement is added.
    pub rank_neighbors: bool,
    /// Each contribution is divided by `considered * damping_factor`.
    pub damping_factor: f64,
    pub update_order: UpdateOrder,
    /// Peer weight shaping.
    pub weighting: WeightParams,
    /// Center weight shaping and the soft clamp constant.
    pub center: CenterParams,
    /// Ranked positions that pull the agent toward its peers.
    pub cohesion_window: RankWindow,
    /// Ranked positions that push the agent away.
    pub separation_window: Option<RankWindow>,
    pub integrator: IntegratorParams,
    pub avoidance: AvoidanceParams,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            neighbor_radius: DEFAULT_NEIGHBOR_RADIUS,
            rank_neighbors: true,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            update_order: UpdateOrder::default(),
            weighting: WeightParams::default(),
            center: CenterParams::default(),
            cohesion_window: DEFAULT_COHESION_WINDOW,
            separation_window: Some(DEFAULT_SEPARATION_WINDOW),
            integrator: IntegratorParams::default(),
            avoidance: AvoidanceParams::default(),
        }
    }
}

impl FlockParams {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let params: FlockParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FlockError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let params = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded flock params");
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        positive("neighbor_radius", self.neighbor_radius)?;
        positive("weighting.peer_scale", self.weighting.peer_scale)?;
        positive("weighting.min_distance", self.weighting.min_distance)?;
        non_negative("center.exponent", self.center.exponent)?;
        non_negative("center.comfortable_radius", self.center.comfortable_radius)?;
        positive("center.center_scale", self.center.center_scale)?;
        positive("center.center_damping", self.center.center_damping)?;
        positive("damping_factor", self.damping_factor)?;
        non_negative("integrator.rate_constant", self.integrator.rate_constant)?;
        non_negative("avoidance.trigger_distance", self.avoidance.trigger_distance)?;
        positive("avoidance.min_distance", self.avoidance.min_distance)?;
        if !self.avoidance.strength.is_finite() {
            return Err(FlockError::InvalidParams(
                "avoidance.strength must be finite".to_string(),
            ));
        }
        ordered("cohesion_window", &self.cohesion_window)?;
        if let Some(window) = &self.separation_window {
            ordered("separation_window", window)?;
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlockError::InvalidParams(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FlockError::InvalidParams(format!(
            "{} must be finite and >= 0, got {}",
            name, value
        )))
    }
}

fn ordered(name: &str, window: &RankWindow) -> Result<()> {
    if window.start <= window.end {
        Ok(())
    } else {
        Err(FlockError::InvalidParams(format!(
            "{} start {} is past end {}",
            name, window.start, window.end
        )))
    }
}
