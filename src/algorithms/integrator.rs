use crate::models::agent::Agent;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

pub const DEFAULT_RATE_CONSTANT: f64 = 40.0;

const PARALLEL_EPS: f64 = 1.0e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorParams {
    /// `animation_rate = |velocity| * rate_constant`.
    pub rate_constant: f64,
}

impl Default for IntegratorParams {
    fn default() -> Self {
        Self {
            rate_constant: DEFAULT_RATE_CONSTANT,
        }
    }
}

/// Advance one agent toward `desired`.
///
/// The steering term is added to velocity unscaled and position advances by
/// one whole velocity per call, so motion is per frame rather than per
/// second. `dt` only feeds animation timing upstream. Returns false when the
/// step would produce a non-finite state, in which case the agent is left
/// untouched.
pub fn integrate(agent: &mut Agent, desired: &Vector3<f64>, _dt: f64, params: &IntegratorParams) -> bool {
    let velocity = agent.velocity + (desired - agent.position);
    let position = agent.position + velocity;
    if !velocity.iter().chain(position.iter()).all(|c| c.is_finite()) {
        tracing::warn!(agent = %agent.id(), "integration produced non-finite state, skipping");
        return false;
    }

    agent.velocity = velocity;
    agent.animation_rate = velocity.norm() * params.rate_constant;
    agent.position = position;
    if let Some(q) = look_rotation(&velocity) {
        agent.orientation = q;
    }
    true
}

/// Rotation taking local `+Z` onto `dir`, keeping local `+Y` as close to
/// world up as possible. `None` for a zero or non-finite direction.
pub fn look_rotation(dir: &Vector3<f64>) -> Option<UnitQuaternion<f64>> {
    let len = dir.norm();
    if !len.is_finite() || len <= 0.0 {
        return None;
    }
    let forward = dir / len;
    let up = Vector3::y();
    if forward.cross(&up).norm_squared() > PARALLEL_EPS {
        return Some(UnitQuaternion::face_towards(&forward, &up));
    }
    // Straight up or down: pure pitch about +X.
    let angle = if forward.y > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    Some(UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle))
}
