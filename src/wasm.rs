#![cfg(target_arch = "wasm32")]

use crate::config::FlockParams;
use crate::engine::{DEMO_COUNT, Engine, PRESET_SCHOOL, PresetInfo, preset_catalog};
use crate::models::spawn::SpawnParams;
use nalgebra::Vector3;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn available_presets() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in preset_catalog() {
        out.push(&preset_info_to_js(info));
    }
    out
}

#[wasm_bindgen]
pub fn flock_defaults() -> JsValue {
    let params = FlockParams::default();
    serde_wasm_bindgen::to_value(&params).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn spawn_defaults() -> JsValue {
    let params = SpawnParams::default();
    serde_wasm_bindgen::to_value(&params).unwrap_or(JsValue::NULL)
}

fn preset_info_to_js(info: &PresetInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    JsValue::from(obj)
}

fn js_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
        | (((js_sys::Math::random() * u32::MAX as f64) as u64) << 32)
}

fn to_js_err(e: crate::FlockError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browser-facing flock. The renderer calls `tick(dt)` from its animation
/// frame, then reads positions, orientations and animation rates to pose each
/// fish avatar. `spawn` is meant for model-load callbacks.
#[wasm_bindgen]
pub struct WasmFlock {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmFlock {
    #[wasm_bindgen(constructor)]
    pub fn new(preset_id: &str) -> Result<WasmFlock, JsValue> {
        let engine = Engine::new_preset(preset_id, js_seed()).map_err(to_js_err)?;
        Ok(WasmFlock { engine })
    }

    #[wasm_bindgen(js_name = "newWithSeed")]
    pub fn new_with_seed(preset_id: &str, seed: u64) -> Result<WasmFlock, JsValue> {
        let engine = Engine::new_preset(preset_id, seed).map_err(to_js_err)?;
        Ok(WasmFlock { engine })
    }

    #[wasm_bindgen(js_name = "newFromParams")]
    pub fn new_from_params(params: JsValue) -> Result<WasmFlock, JsValue> {
        let params: FlockParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("invalid flock params: {}", e)))?;
        let engine = Engine::with_params(params, js_seed()).map_err(to_js_err)?;
        Ok(WasmFlock { engine })
    }

    pub fn new_demo() -> Result<WasmFlock, JsValue> {
        let mut engine = Engine::new_preset(PRESET_SCHOOL, js_seed()).map_err(to_js_err)?;
        engine.spawn_random(DEMO_COUNT).map_err(to_js_err)?;
        Ok(WasmFlock { engine })
    }

    pub fn len(&self) -> usize { self.engine.len() }

    pub fn tick(&mut self, dt: f64) -> usize { self.engine.tick(dt).spawned }

    /// Queue one fish at an explicit state.
    pub fn spawn(&mut self, px: f64, py: f64, pz: f64, vx: f64, vy: f64, vz: f64) -> Result<(), JsValue> {
        self.engine
            .flock()
            .spawner()
            .spawn(Vector3::new(px, py, pz), Vector3::new(vx, vy, vz))
            .map_err(to_js_err)
    }

    pub fn spawn_random(&mut self, count: usize) -> Result<(), JsValue> {
        self.engine.spawn_random(count).map_err(to_js_err)
    }

    pub fn set_spawn_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: SpawnParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("invalid spawn params: {}", e)))?;
        self.engine.set_spawn_params(params);
        Ok(())
    }

    pub fn set_flock_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: FlockParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("invalid flock params: {}", e)))?;
        self.engine.set_params(params).map_err(to_js_err)
    }

    pub fn flock_params(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.engine.flock().params()).unwrap_or(JsValue::NULL)
    }

    pub fn set_preset(&mut self, preset_id: &str) -> Result<(), JsValue> {
        self.engine.set_preset(preset_id).map_err(to_js_err)
    }

    pub fn set_pointer_ray(
        &mut self,
        ox: f64,
        oy: f64,
        oz: f64,
        dx: f64,
        dy: f64,
        dz: f64,
    ) -> Result<(), JsValue> {
        self.engine
            .set_pointer_ray(Vector3::new(ox, oy, oz), Vector3::new(dx, dy, dz))
            .map_err(to_js_err)
    }

    pub fn clear_pointer_ray(&mut self) { self.engine.clear_pointer_ray(); }

    pub fn positions(&self) -> Vec<f32> { self.engine.positions_flat() }

    /// Quaternions packed `[x, y, z, w]` per fish, matching three.js order.
    pub fn orientations(&self) -> Vec<f32> { self.engine.orientations_flat() }

    pub fn animation_rates(&self) -> Vec<f32> { self.engine.animation_rates() }
}
