use shoal::engine::{PRESET_TIGHT_SCHOOL, preset_params};
use shoal::{Engine, FlockError, FlockParams, UpdateOrder, VelocityFalloff};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_params_from_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flock.toml");
    fs::write(
        &path,
        r#"
neighbor_radius = 12.5
damping_factor = 0.8
update_order = "sequential"

[weighting]
velocity_falloff = "linear"
peer_scale = 1e-4

[center]
exponent = 9.0
comfortable_radius = 15.0

[separation_window]
start = 120
end = 149
"#,
    )
    .unwrap();

    let params = FlockParams::load(&path).unwrap();
    assert_eq!(params.neighbor_radius, 12.5);
    assert_eq!(params.damping_factor, 0.8);
    assert_eq!(params.update_order, UpdateOrder::Sequential);
    assert_eq!(params.weighting.velocity_falloff, VelocityFalloff::Linear);
    assert_eq!(params.center.exponent, 9.0);
    assert_eq!(params.center.center_damping, FlockParams::default().center.center_damping);
    assert_eq!(params.separation_window.map(|w| (w.start, w.end)), Some((120, 149)));

    let mut engine = Engine::with_params(params, 3).unwrap();
    engine.spawn_random(12).unwrap();
    assert_eq!(engine.tick(1.0 / 60.0).agents, 12);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = FlockParams::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, FlockError::ConfigIo { .. }));
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "neighbor_radius = -3.0\n").unwrap();
    assert!(matches!(
        FlockParams::load(&path),
        Err(FlockError::InvalidParams(_))
    ));
}

#[test]
fn presets_survive_a_toml_round_trip() {
    let params = preset_params(PRESET_TIGHT_SCHOOL).unwrap();
    let text = toml::to_string(&params).unwrap();
    let back = FlockParams::from_toml_str(&text).unwrap();
    assert_eq!(back, params);
}
