use crate::error::{FlockError, Result};
use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, channel};

pub const DEFAULT_POSITION_SPREAD: f64 = 10.0;
pub const DEFAULT_VELOCITY_SPREAD: f64 = 0.1;

/// Initial state of an agent that has not joined the flock yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSeed {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl AgentSeed {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Result<Self> {
        let finite = position.iter().chain(velocity.iter()).all(|c| c.is_finite());
        if !finite {
            return Err(FlockError::NonFiniteSeed {
                position: position.into(),
                velocity: velocity.into(),
            });
        }
        Ok(Self { position, velocity })
    }

    /// Skewed uniform spawn: each position component is
    /// `u1 * s - u2 * 2s`, each velocity component `u1 * v / 2 - u2 * v`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, params: &SpawnParams) -> Self {
        let s = params.position_spread;
        let v = params.velocity_spread;
        let mut axis = |a: f64, b: f64| rng.gen_range(0.0..1.0) * a - rng.gen_range(0.0..1.0) * b;
        let position = Vector3::new(axis(s, 2.0 * s), axis(s, 2.0 * s), axis(s, 2.0 * s));
        let velocity = Vector3::new(axis(v * 0.5, v), axis(v * 0.5, v), axis(v * 0.5, v));
        Self { position, velocity }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub position_spread: f64,
    pub velocity_spread: f64,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            position_spread: DEFAULT_POSITION_SPREAD,
            velocity_spread: DEFAULT_VELOCITY_SPREAD,
        }
    }
}

/// Cloneable handle for asynchronous producers (asset loaders and the like).
/// Seeds wait in a queue until the flock drains it between ticks.
#[derive(Debug, Clone)]
pub struct AgentSpawner {
    tx: Sender<AgentSeed>,
}

impl AgentSpawner {
    pub fn spawn(&self, position: Vector3<f64>, velocity: Vector3<f64>) -> Result<()> {
        self.send(AgentSeed::new(position, velocity)?)
    }

    pub fn spawn_random<R: Rng + ?Sized>(&self, rng: &mut R, params: &SpawnParams) -> Result<()> {
        self.send(AgentSeed::random(rng, params))
    }

    pub fn send(&self, seed: AgentSeed) -> Result<()> {
        self.tx.send(seed).map_err(|_| FlockError::FlockClosed)
    }
}

/// Receiving end held by the flock.
#[derive(Debug)]
pub(crate) struct SpawnQueue {
    tx: Sender<AgentSeed>,
    rx: Receiver<AgentSeed>,
}

impl SpawnQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    pub(crate) fn handle(&self) -> AgentSpawner {
        AgentSpawner { tx: self.tx.clone() }
    }

    /// Everything enqueued so far, in arrival order.
    pub(crate) fn drain(&self) -> Vec<AgentSeed> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn random_seeds_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let params = SpawnParams::default();
        for _ in 0..500 {
            let seed = AgentSeed::random(&mut rng, &params);
            for c in seed.position.iter() {
                assert!(*c > -20.0 && *c < 10.0);
            }
            for c in seed.velocity.iter() {
                assert!(*c > -0.1 && *c < 0.05);
            }
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let params = SpawnParams::default();
        let a = AgentSeed::random(&mut SmallRng::seed_from_u64(3), &params);
        let b = AgentSeed::random(&mut SmallRng::seed_from_u64(3), &params);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_finite_seed() {
        let queue = SpawnQueue::new();
        let err = queue
            .handle()
            .spawn(Vector3::new(f64::INFINITY, 0.0, 0.0), Vector3::zeros());
        assert!(matches!(err, Err(FlockError::NonFiniteSeed { .. })));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn queue_preserves_arrival_order_across_threads() {
        let queue = SpawnQueue::new();
        let spawner = queue.handle();
        std::thread::spawn(move || {
            for i in 0..3 {
                spawner.spawn(Vector3::new(i as f64, 0.0, 0.0), Vector3::zeros()).unwrap();
            }
        })
        .join()
        .unwrap();
        let xs: Vec<f64> = queue.drain().iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert!(queue.drain().is_empty());
    }
}
