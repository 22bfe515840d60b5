use nalgebra::{UnitQuaternion, Vector3};
use std::fmt;

/// Stable identity of an agent. Only used to skip self when scanning peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fish#{}", self.0)
    }
}

/// One fish. Position and velocity change only through the integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    pub(crate) position: Vector3<f64>,
    pub(crate) velocity: Vector3<f64>,
    pub(crate) orientation: UnitQuaternion<f64>,
    pub(crate) animation_rate: f64,
}

impl Agent {
    pub(crate) fn new(id: AgentId, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self {
            id,
            position,
            velocity,
            orientation: UnitQuaternion::identity(),
            animation_rate: 0.0,
        }
    }

    pub fn id(&self) -> AgentId { self.id }

    pub fn position(&self) -> &Vector3<f64> { &self.position }

    pub fn velocity(&self) -> &Vector3<f64> { &self.velocity }

    /// Facing derived from the last integrated velocity.
    pub fn orientation(&self) -> &UnitQuaternion<f64> { &self.orientation }

    /// Playback-speed hint for the swim animation.
    pub fn animation_rate(&self) -> f64 { self.animation_rate }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}

/// Ordered, append-only collection of agents.
#[derive(Debug, Clone, Default)]
pub struct AgentSet {
    agents: Vec<Agent>,
    next_id: u64,
}

impl AgentSet {
    pub fn new() -> Self { Self::default() }

    /// Append a new agent and hand back its freshly minted id.
    pub fn push(&mut self, position: Vector3<f64>, velocity: Vector3<f64>) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.push(Agent::new(id, position, velocity));
        id
    }

    pub fn len(&self) -> usize { self.agents.len() }

    pub fn is_empty(&self) -> bool { self.agents.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> { self.agents.iter() }

    pub fn as_slice(&self) -> &[Agent] { &self.agents }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Agent] { &mut self.agents }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Positions packed as `[x, y, z]*` for a renderer.
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.agents.len() * 3);
        for a in &self.agents {
            out.push(a.position.x as f32);
            out.push(a.position.y as f32);
            out.push(a.position.z as f32);
        }
        out
    }

    /// Orientations packed as quaternions `[i, j, k, w]*`.
    pub fn orientations_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.agents.len() * 4);
        for a in &self.agents {
            let q = a.orientation.quaternion();
            out.push(q.i as f32);
            out.push(q.j as f32);
            out.push(q.k as f32);
            out.push(q.w as f32);
        }
        out
    }

    pub fn animation_rates(&self) -> Vec<f32> {
        self.agents.iter().map(|a| a.animation_rate as f32).collect()
    }
}

impl<'a> IntoIterator for &'a AgentSet {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
