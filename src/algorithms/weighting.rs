use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PEER_SCALE: f64 = 1.0e-5;
pub const DEFAULT_MIN_DISTANCE: f64 = 1.0e-6;
pub const DEFAULT_CENTER_EXPONENT: f64 = 2.0;
pub const DEFAULT_CENTER_SCALE: f64 = 1.0;
pub const DEFAULT_CENTER_DAMPING: f64 = 1.0e8;

/// Shape `f` applied to the relative-velocity distance in [`peer_weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VelocityFalloff {
    Linear,
    Sqrt,
    #[default]
    Square,
}

impl VelocityFalloff {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            VelocityFalloff::Linear => x,
            VelocityFalloff::Sqrt => x.sqrt(),
            VelocityFalloff::Square => x * x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightParams {
    pub velocity_falloff: VelocityFalloff,
    /// Multiplier on the inverse distance product.
    pub peer_scale: f64,
    /// Floor for both positional and velocity distances. Coincident agents
    /// would otherwise divide by zero.
    pub min_distance: f64,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            velocity_falloff: VelocityFalloff::default(),
            peer_scale: DEFAULT_PEER_SCALE,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterParams {
    /// Power `p` applied to the distance past `comfortable_radius`.
    pub exponent: f64,
    /// Distance from the origin inside which the center term stays zero.
    pub comfortable_radius: f64,
    /// Divisor on the raised distance.
    pub center_scale: f64,
    /// `C` in the soft clamp `target / (center_weight / C + 1)`.
    pub center_damping: f64,
}

impl Default for CenterParams {
    fn default() -> Self {
        Self {
            exponent: DEFAULT_CENTER_EXPONENT,
            comfortable_radius: 0.0,
            center_scale: DEFAULT_CENTER_SCALE,
            center_damping: DEFAULT_CENTER_DAMPING,
        }
    }
}

/// Influence of peer `b` on agent `a`. Decreases with both positional distance
/// and relative-velocity magnitude:
///
/// `1 / (sqrt(|pa - pb|) * f(|va - vb|)) * peer_scale`
pub fn peer_weight(
    pos_a: &Vector3<f64>,
    pos_b: &Vector3<f64>,
    vel_a: &Vector3<f64>,
    vel_b: &Vector3<f64>,
    params: &WeightParams,
) -> f64 {
    let floor = params.min_distance;
    let dist = (pos_a - pos_b).norm().max(floor);
    let rel_speed = (vel_a - vel_b).norm().max(floor);
    let denom = dist.sqrt() * params.velocity_falloff.apply(rel_speed);
    let weight = params.peer_scale / denom;
    if weight.is_finite() { weight } else { f64::MAX }
}

/// Grows with the distance from the world origin past the comfortable radius.
/// Always finite and non-negative.
pub fn center_weight(pos: &Vector3<f64>, params: &CenterParams) -> f64 {
    let excess = (pos.norm() - params.comfortable_radius).max(0.0);
    let weight = excess.powf(params.exponent) / params.center_scale;
    if weight.is_finite() { weight } else { f64::MAX }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero() -> Vector3<f64> {
        Vector3::zeros()
    }

    #[test]
    fn peer_weight_matches_formula() {
        let params = WeightParams::default();
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(4.0, 0.0, 0.0);
        let va = Vector3::new(0.5, 0.0, 0.0);
        let vb = Vector3::new(0.0, 0.0, 0.0);
        let w = peer_weight(&a, &b, &va, &vb, &params);
        let expected = 1.0 / (2.0 * 0.25) * 1.0e-5;
        assert!((w - expected).abs() < 1e-15);
    }

    #[test]
    fn falloff_variants() {
        assert_eq!(VelocityFalloff::Linear.apply(4.0), 4.0);
        assert_eq!(VelocityFalloff::Sqrt.apply(4.0), 2.0);
        assert_eq!(VelocityFalloff::Square.apply(4.0), 16.0);
    }

    #[test]
    fn peer_weight_decreases_with_distance_and_relative_speed() {
        let params = WeightParams {
            velocity_falloff: VelocityFalloff::Linear,
            ..WeightParams::default()
        };
        let v1 = Vector3::new(0.1, 0.0, 0.0);
        let near = peer_weight(&zero(), &Vector3::new(1.0, 0.0, 0.0), &v1, &zero(), &params);
        let far = peer_weight(&zero(), &Vector3::new(9.0, 0.0, 0.0), &v1, &zero(), &params);
        assert!(near > far);

        let v2 = Vector3::new(0.3, 0.0, 0.0);
        let similar = peer_weight(&zero(), &Vector3::new(1.0, 0.0, 0.0), &v1, &zero(), &params);
        let different = peer_weight(&zero(), &Vector3::new(1.0, 0.0, 0.0), &v2, &zero(), &params);
        assert!(similar > different);
    }

    #[test]
    fn coincident_agents_stay_finite() {
        for falloff in [VelocityFalloff::Linear, VelocityFalloff::Sqrt, VelocityFalloff::Square] {
            let params = WeightParams {
                velocity_falloff: falloff,
                ..WeightParams::default()
            };
            let w = peer_weight(&zero(), &zero(), &zero(), &zero(), &params);
            assert!(w.is_finite());
            assert!(w > 0.0);
        }
    }

    #[test]
    fn center_weight_grows_outward() {
        let params = CenterParams::default();
        assert_eq!(center_weight(&zero(), &params), 0.0);
        assert!((center_weight(&Vector3::new(3.0, 4.0, 0.0), &params) - 25.0).abs() < 1e-9);
        let inner = center_weight(&Vector3::new(10.0, 0.0, 0.0), &params);
        let outer = center_weight(&Vector3::new(20.0, 0.0, 0.0), &params);
        assert!(outer > inner);
    }

    #[test]
    fn center_weight_is_zero_inside_comfortable_radius() {
        let params = CenterParams {
            exponent: 9.0,
            comfortable_radius: 20.0,
            ..CenterParams::default()
        };
        assert_eq!(center_weight(&Vector3::new(15.0, 0.0, 0.0), &params), 0.0);
        assert!((center_weight(&Vector3::new(22.0, 0.0, 0.0), &params) - 512.0).abs() < 1e-9);
    }

    #[test]
    fn center_weight_saturates() {
        let params = CenterParams {
            exponent: 9.0,
            ..CenterParams::default()
        };
        let w = center_weight(&Vector3::new(1.0e300, 0.0, 0.0), &params);
        assert_eq!(w, f64::MAX);
    }
}
