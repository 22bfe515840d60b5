use crate::error::{FlockError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRIGGER_DISTANCE: f64 = 5.0;
pub const DEFAULT_AVOIDANCE_STRENGTH: f64 = 1.0;
pub const DEFAULT_AVOIDANCE_MIN_DISTANCE: f64 = 1.0e-3;

/// World-space pointer ray, e.g. unprojected from the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRay {
    origin: Vector3<f64>,
    direction: Vector3<f64>,
}

impl PointerRay {
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Result<Self> {
        let len = direction.norm();
        if !len.is_finite() || len <= 0.0 || !origin.iter().all(|c| c.is_finite()) {
            return Err(FlockError::DegenerateRay);
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    pub fn origin(&self) -> &Vector3<f64> { &self.origin }

    pub fn direction(&self) -> &Vector3<f64> { &self.direction }

    /// Closest point on the ray (not the infinite line) to `p`.
    pub fn closest_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let t = (p - self.origin).dot(&self.direction).max(0.0);
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceParams {
    pub enabled: bool,
    /// Agents farther than this from the ray ignore it.
    pub trigger_distance: f64,
    pub strength: f64,
    /// Floor on the agent-to-ray distance in the inverse-square weight.
    pub min_distance: f64,
}

impl Default for AvoidanceParams {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_distance: DEFAULT_TRIGGER_DISTANCE,
            strength: DEFAULT_AVOIDANCE_STRENGTH,
            min_distance: DEFAULT_AVOIDANCE_MIN_DISTANCE,
        }
    }
}

/// Offset toward the ray, weighted by inverse square distance. The resolver
/// subtracts it so the agent is pushed away from the pointer.
pub fn avoidance_offset(
    pos: &Vector3<f64>,
    ray: &PointerRay,
    params: &AvoidanceParams,
) -> Vector3<f64> {
    if !params.enabled {
        return Vector3::zeros();
    }
    let toward = ray.closest_point(pos) - pos;
    let dist = toward.norm();
    if dist >= params.trigger_distance {
        return Vector3::zeros();
    }
    let d = dist.max(params.min_distance);
    toward * (params.strength / (d * d))
}
