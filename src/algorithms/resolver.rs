use crate::algorithms::avoidance::{PointerRay, avoidance_offset};
use crate::algorithms::weighting::{center_weight, peer_weight};
use crate::config::FlockParams;
use crate::models::agent::Agent;
use nalgebra::Vector3;

/// Intermediate terms of one [`resolve_detailed`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveBreakdown {
    /// Peers inside the neighbor radius.
    pub considered: usize,
    /// Sum of the cohesion window, already divided by `considered * damping`.
    pub cohesion: Vector3<f64>,
    /// Sum of the separation window, already divided (subtracted from target).
    pub separation: Vector3<f64>,
    /// `center_weight / C + 1`.
    pub center_divisor: f64,
    /// Avoidance offset subtracted after the center clamp.
    pub avoidance: Vector3<f64>,
    pub desired: Vector3<f64>,
}

/// Desired position of `agent` given every agent in the flock.
pub fn resolve(
    agent: &Agent,
    agents: &[Agent],
    params: &FlockParams,
    ray: Option<&PointerRay>,
) -> Vector3<f64> {
    resolve_detailed(agent, agents, params, ray).desired
}

pub fn resolve_detailed(
    agent: &Agent,
    agents: &[Agent],
    params: &FlockParams,
    ray: Option<&PointerRay>,
) -> ResolveBreakdown {
    let pos = agent.position();
    let vel = agent.velocity();

    let mut pulls: Vec<Vector3<f64>> = Vec::new();
    for peer in agents {
        if peer.id() == agent.id() {
            continue;
        }
        let relative = peer.position() - pos;
        if relative.norm() >= params.neighbor_radius {
            continue;
        }
        let weight = peer_weight(pos, peer.position(), vel, peer.velocity(), &params.weighting);
        pulls.push(relative * weight);
    }

    let considered = pulls.len();
    let mut cohesion = Vector3::zeros();
    let mut separation = Vector3::zeros();
    if considered > 0 {
        let scale = 1.0 / (considered as f64 * params.damping_factor);
        if params.rank_neighbors {
            pulls.sort_by(|a, b| a.norm().total_cmp(&b.norm()));
            for v in params.cohesion_window.slice(&pulls) {
                cohesion += v * scale;
            }
            if let Some(window) = &params.separation_window {
                for v in window.slice(&pulls) {
                    separation += v * scale;
                }
            }
        } else {
            for v in &pulls {
                cohesion += v * scale;
            }
        }
    }

    let center_divisor = center_weight(pos, &params.center) / params.center.center_damping + 1.0;
    let mut desired = (pos + cohesion - separation) / center_divisor;

    let avoidance = match ray {
        Some(ray) => avoidance_offset(pos, ray, &params.avoidance),
        None => Vector3::zeros(),
    };
    desired -= avoidance;

    if !desired.iter().all(|c| c.is_finite()) {
        tracing::warn!(agent = %agent.id(), considered, "non-finite target, keeping center term only");
        desired = pos / center_divisor;
        if !desired.iter().all(|c| c.is_finite()) {
            desired = *pos;
        }
    }

    ResolveBreakdown {
        considered,
        cohesion,
        separation,
        center_divisor,
        avoidance,
        desired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::avoidance::AvoidanceParams;
    use crate::algorithms::weighting::VelocityFalloff;
    use crate::config::RankWindow;
    use crate::models::agent::AgentSet;

    fn set_of(points: &[([f64; 3], [f64; 3])]) -> AgentSet {
        let mut set = AgentSet::new();
        for (p, v) in points {
            set.push(Vector3::from(*p), Vector3::from(*v));
        }
        set
    }

    #[test]
    fn lone_agent_at_origin_stays_put() {
        let set = set_of(&[([0.0; 3], [0.1, 0.0, 0.0])]);
        let params = FlockParams::default();
        let b = resolve_detailed(&set.as_slice()[0], set.as_slice(), &params, None);
        assert_eq!(b.considered, 0);
        assert_eq!(b.desired, Vector3::zeros());
        assert_eq!(b.center_divisor, 1.0);
    }

    #[test]
    fn radius_boundary_is_exclusive() {
        let set = set_of(&[
            ([0.0; 3], [0.0; 3]),
            ([8.0, 0.0, 0.0], [0.1, 0.0, 0.0]),
            ([0.0, 7.999, 0.0], [0.1, 0.0, 0.0]),
        ]);
        let params = FlockParams {
            neighbor_radius: 8.0,
            ..FlockParams::default()
        };
        let b = resolve_detailed(&set.as_slice()[0], set.as_slice(), &params, None);
        assert_eq!(b.considered, 1);
    }

    #[test]
    fn unranked_adds_every_pull() {
        let set = set_of(&[
            ([0.0; 3], [0.0; 3]),
            ([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, 4.0, 0.0], [1.0, 0.0, 0.0]),
        ]);
        let params = FlockParams {
            rank_neighbors: false,
            weighting: crate::algorithms::weighting::WeightParams {
                velocity_falloff: VelocityFalloff::Linear,
                peer_scale: 1.0,
                ..Default::default()
            },
            damping_factor: 1.0,
            ..FlockParams::default()
        };
        let b = resolve_detailed(&set.as_slice()[0], set.as_slice(), &params, None);
        // weights: 1/(1*1) and 1/(2*1); each divided by 2 peers.
        let expected = Vector3::new(0.5, 1.0, 0.0);
        assert!((b.cohesion - expected).norm() < 1e-12);
        assert_eq!(b.separation, Vector3::zeros());
    }

    #[test]
    fn window_past_the_end_is_ignored() {
        let set = set_of(&[([0.0; 3], [0.0; 3]), ([1.0, 0.0, 0.0], [0.5, 0.0, 0.0])]);
        let params = FlockParams {
            cohesion_window: RankWindow::new(1, 30),
            separation_window: Some(RankWindow::new(170, 199)),
            ..FlockParams::default()
        };
        let b = resolve_detailed(&set.as_slice()[0], set.as_slice(), &params, None);
        assert_eq!(b.considered, 1);
        assert_eq!(b.cohesion, Vector3::zeros());
        assert_eq!(b.separation, Vector3::zeros());
    }

    #[test]
    fn pointer_ray_pushes_agent_away() {
        let set = set_of(&[([2.0, 0.0, 0.0], [0.0; 3])]);
        let params = FlockParams {
            avoidance: AvoidanceParams {
                enabled: true,
                ..AvoidanceParams::default()
            },
            ..FlockParams::default()
        };
        let ray = PointerRay::new(Vector3::new(0.0, 0.0, -10.0), Vector3::z()).unwrap();
        let desired = resolve(&set.as_slice()[0], set.as_slice(), &params, Some(&ray));
        assert!(desired.x > 2.0);
        let without = resolve(&set.as_slice()[0], set.as_slice(), &params, None);
        assert!(without.x < desired.x);
    }

    #[test]
    fn saturated_pull_keeps_the_center_clamp() {
        let set = set_of(&[([2.0, 0.0, 0.0], [0.0; 3]), ([0.0; 3], [0.0; 3])]);
        let params = FlockParams {
            cohesion_window: RankWindow::new(0, 30),
            separation_window: None,
            weighting: crate::algorithms::weighting::WeightParams {
                peer_scale: 1.0e308,
                ..Default::default()
            },
            ..FlockParams::default()
        };
        let b = resolve_detailed(&set.as_slice()[0], set.as_slice(), &params, None);
        assert_eq!(b.considered, 1);
        assert!(!b.cohesion.x.is_finite());
        assert!(b.center_divisor > 1.0);
        assert_eq!(b.desired, set.as_slice()[0].position() / b.center_divisor);
        assert!(b.desired.x < 2.0);
    }
}
