use crate::algorithms::avoidance::PointerRay;
use crate::algorithms::integrator::integrate;
use crate::algorithms::resolver::resolve;
use crate::config::{FlockParams, UpdateOrder};
use crate::error::Result;
use crate::models::agent::{AgentId, AgentSet};
use crate::models::spawn::{AgentSeed, AgentSpawner, SpawnQueue};
use nalgebra::Vector3;

/// What one [`Flock::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: u64,
    pub agents: usize,
    /// Agents that joined from the spawn queue right before this tick.
    pub spawned: usize,
    /// Agents whose update was dropped to keep the state finite.
    pub held: usize,
}

/// The simulation step. Owns the agent set; new agents only join between
/// ticks through the spawn queue.
#[derive(Debug)]
pub struct Flock {
    agents: AgentSet,
    params: FlockParams,
    ray: Option<PointerRay>,
    queue: SpawnQueue,
    tick: u64,
    time: f64,
    // Reused across ticks so the snapshot pass does not allocate.
    desired: Vec<Vector3<f64>>,
}

impl Flock {
    pub fn new(params: FlockParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            agents: AgentSet::new(),
            params,
            ray: None,
            queue: SpawnQueue::new(),
            tick: 0,
            time: 0.0,
            desired: Vec::new(),
        })
    }

    pub fn agents(&self) -> &AgentSet { &self.agents }

    pub fn len(&self) -> usize { self.agents.len() }

    pub fn is_empty(&self) -> bool { self.agents.is_empty() }

    pub fn params(&self) -> &FlockParams { &self.params }

    pub fn set_params(&mut self, params: FlockParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 { self.tick }

    /// Sum of every `dt` handed to [`Flock::tick`].
    pub fn time(&self) -> f64 { self.time }

    pub fn pointer_ray(&self) -> Option<&PointerRay> { self.ray.as_ref() }

    pub fn set_pointer_ray(&mut self, ray: Option<PointerRay>) { self.ray = ray; }

    /// Handle for producers on other threads or callbacks.
    pub fn spawner(&self) -> AgentSpawner { self.queue.handle() }

    /// Add an agent immediately. Only possible between ticks since the tick
    /// holds `&mut self`.
    pub fn insert(&mut self, position: Vector3<f64>, velocity: Vector3<f64>) -> Result<AgentId> {
        let seed = AgentSeed::new(position, velocity)?;
        Ok(self.agents.push(seed.position, seed.velocity))
    }

    /// Advance every agent once. Pending spawns join first.
    pub fn tick(&mut self, dt: f64) -> TickSummary {
        let spawned = self.drain_spawns();
        let held = match self.params.update_order {
            UpdateOrder::Snapshot => self.step_snapshot(dt),
            UpdateOrder::Sequential => self.step_sequential(dt),
        };
        self.tick += 1;
        if dt.is_finite() {
            self.time += dt;
        }

        let summary = TickSummary {
            tick: self.tick,
            agents: self.agents.len(),
            spawned,
            held,
        };
        tracing::trace!(?summary, "flock tick");
        summary
    }

    fn drain_spawns(&mut self) -> usize {
        let seeds = self.queue.drain();
        for seed in &seeds {
            self.agents.push(seed.position, seed.velocity);
        }
        if !seeds.is_empty() {
            tracing::debug!(count = seeds.len(), total = self.agents.len(), "agents joined flock");
        }
        seeds.len()
    }

    /// Resolve all against the tick-start state, then integrate all.
    fn step_snapshot(&mut self, dt: f64) -> usize {
        let snapshot = self.agents.as_slice();
        let params = &self.params;
        let ray = self.ray.as_ref();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            snapshot
                .par_iter()
                .map(|a| resolve(a, snapshot, params, ray))
                .collect_into_vec(&mut self.desired);
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.desired.clear();
            self.desired
                .extend(snapshot.iter().map(|a| resolve(a, snapshot, params, ray)));
        }

        let mut held = 0;
        for (agent, desired) in self.agents.as_mut_slice().iter_mut().zip(&self.desired) {
            if !integrate(agent, desired, dt, &self.params.integrator) {
                held += 1;
            }
        }
        held
    }

    /// Resolve-then-integrate per agent in set order.
    fn step_sequential(&mut self, dt: f64) -> usize {
        let mut held = 0;
        for i in 0..self.agents.len() {
            let agents = self.agents.as_slice();
            let desired = resolve(&agents[i], agents, &self.params, self.ray.as_ref());
            let agent = &mut self.agents.as_mut_slice()[i];
            if !integrate(agent, &desired, dt, &self.params.integrator) {
                held += 1;
            }
        }
        held
    }
}
