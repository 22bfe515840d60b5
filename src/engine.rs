use crate::algorithms::avoidance::PointerRay;
use crate::algorithms::weighting::{CenterParams, VelocityFalloff, WeightParams};
use crate::config::{FlockParams, RankWindow};
use crate::error::{FlockError, Result};
use crate::models::spawn::{AgentSeed, SpawnParams};
use crate::sim::{Flock, TickSummary};
use nalgebra::Vector3;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const PRESET_SCHOOL: &str = "school";
pub const PRESET_TIGHT_SCHOOL: &str = "tight-school";
pub const PRESET_WANDERERS: &str = "wanderers";

pub const DEMO_COUNT: usize = 200;
pub const DEMO_DT: f64 = 1.0 / 60.0;

pub struct PresetInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn preset_catalog() -> &'static [PresetInfo] {
    &[
        PresetInfo {
            id: PRESET_SCHOOL,
            name: "School",
            description: "Wide 40-unit awareness, squared velocity falloff, loose center pull.",
        },
        PresetInfo {
            id: PRESET_TIGHT_SCHOOL,
            name: "Tight school",
            description: "Linear velocity falloff with heavier damping and an earlier separation window.",
        },
        PresetInfo {
            id: PRESET_WANDERERS,
            name: "Wanderers",
            description: "Short-sighted fish that roam freely until they stray past a comfortable radius.",
        },
    ]
}

pub fn preset_params(id: &str) -> Result<FlockParams> {
    match id {
        PRESET_SCHOOL => Ok(FlockParams::default()),
        PRESET_TIGHT_SCHOOL => Ok(FlockParams {
            weighting: WeightParams {
                velocity_falloff: VelocityFalloff::Linear,
                peer_scale: 1.0e-4,
                ..WeightParams::default()
            },
            center: CenterParams {
                center_damping: 1.0e7,
                ..CenterParams::default()
            },
            damping_factor: 0.8,
            separation_window: Some(RankWindow::new(120, 149)),
            ..FlockParams::default()
        }),
        PRESET_WANDERERS => Ok(FlockParams {
            neighbor_radius: 8.0,
            weighting: WeightParams {
                velocity_falloff: VelocityFalloff::Sqrt,
                peer_scale: 1.0e-6,
                ..WeightParams::default()
            },
            center: CenterParams {
                exponent: 9.0,
                comfortable_radius: 20.0,
                ..CenterParams::default()
            },
            separation_window: None,
            ..FlockParams::default()
        }),
        other => Err(FlockError::UnknownPreset(other.to_string())),
    }
}

/// Flock plus the seeded randomness used to populate it. This is what the
/// demo binary and the wasm bindings drive.
pub struct Engine {
    preset_id: Option<&'static str>,
    flock: Flock,
    rng: SmallRng,
    spawn: SpawnParams,
}

impl Engine {
    pub fn new_preset(preset_id: &str, seed: u64) -> Result<Self> {
        let id = normalize_preset_id(preset_id)
            .ok_or_else(|| FlockError::UnknownPreset(preset_id.to_string()))?;
        let mut engine = Self::with_params(preset_params(id)?, seed)?;
        engine.preset_id = Some(id);
        Ok(engine)
    }

    pub fn with_params(params: FlockParams, seed: u64) -> Result<Self> {
        Ok(Self {
            preset_id: None,
            flock: Flock::new(params)?,
            rng: SmallRng::seed_from_u64(seed),
            spawn: SpawnParams::default(),
        })
    }

    /// `None` once custom params replaced the preset.
    pub fn preset_id(&self) -> Option<&'static str> { self.preset_id }

    pub fn flock(&self) -> &Flock { &self.flock }

    pub fn len(&self) -> usize { self.flock.len() }

    pub fn is_empty(&self) -> bool { self.flock.is_empty() }

    pub fn set_spawn_params(&mut self, spawn: SpawnParams) { self.spawn = spawn; }

    /// Queue `count` randomly seeded agents; they join on the next tick.
    pub fn spawn_random(&mut self, count: usize) -> Result<()> {
        let spawner = self.flock.spawner();
        for _ in 0..count {
            spawner.send(AgentSeed::random(&mut self.rng, &self.spawn))?;
        }
        Ok(())
    }

    pub fn tick(&mut self, dt: f64) -> TickSummary { self.flock.tick(dt) }

    pub fn set_params(&mut self, params: FlockParams) -> Result<()> {
        self.flock.set_params(params)?;
        self.preset_id = None;
        Ok(())
    }

    pub fn set_preset(&mut self, preset_id: &str) -> Result<()> {
        let id = normalize_preset_id(preset_id)
            .ok_or_else(|| FlockError::UnknownPreset(preset_id.to_string()))?;
        self.flock.set_params(preset_params(id)?)?;
        self.preset_id = Some(id);
        tracing::info!(preset = id, "switched flock preset");
        Ok(())
    }

    pub fn set_pointer_ray(&mut self, origin: Vector3<f64>, direction: Vector3<f64>) -> Result<()> {
        let ray = PointerRay::new(origin, direction)?;
        self.flock.set_pointer_ray(Some(ray));
        Ok(())
    }

    pub fn clear_pointer_ray(&mut self) { self.flock.set_pointer_ray(None); }

    pub fn positions_flat(&self) -> Vec<f32> { self.flock.agents().positions_flat() }

    pub fn orientations_flat(&self) -> Vec<f32> { self.flock.agents().orientations_flat() }

    pub fn animation_rates(&self) -> Vec<f32> { self.flock.agents().animation_rates() }
}

fn normalize_preset_id(id: &str) -> Option<&'static str> {
    preset_catalog().iter().find(|p| p.id == id).map(|p| p.id)
}
