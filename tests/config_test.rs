//! Configuration loading, saving and validation

use face_runner::{
    config::{Config, EXAMPLE_CONFIG},
    constants::MAX_TIMING_MS,
    game::ControlMode,
    spawner::ObstacleKind,
    Error,
};
use std::time::Duration;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("face_runner_{}_{}.yaml", name, std::process::id()))
}

#[test]
fn test_example_config_is_valid() {
    let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
    assert_eq!(config.control.mode, ControlMode::Face);
    assert_eq!(config.obstacles.types, vec![ObstacleKind::Broccoli, ObstacleKind::Milk]);
}

#[test]
fn test_save_and_load() {
    let path = temp_path("config_roundtrip");
    let mut config = Config::default();
    config.control.mode = ControlMode::Touch;
    config.timing.jump_debounce_ms = 200;
    config.obstacles.types = vec![ObstacleKind::Milk];
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.control.mode, ControlMode::Touch);
    assert_eq!(loaded.timing.jump_debounce_ms, 200);
    assert_eq!(loaded.obstacles.types, vec![ObstacleKind::Milk]);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does_not_exist"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let path = temp_path("config_malformed");
    std::fs::write(&path, "physics: [1, 2\n").unwrap();
    assert!(matches!(Config::from_file(&path), Err(Error::ConfigError(_))));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_game_settings_follow_config() {
    let mut config = Config::default();
    config.timing.countdown_seconds = 1;
    config.timing.go_grace_ms = 250;
    config.physics.jump_force = 500.0;
    config.physics.run_speed = 300.0;
    config.world.width = 800.0;

    let settings = config.game_settings();
    assert_eq!(settings.countdown_seconds, 1);
    assert_eq!(settings.go_grace, Duration::from_millis(250));
    assert_eq!(settings.jump_force, 500.0);
    assert_eq!(settings.jump_debounce, Duration::from_millis(150));
    assert_eq!(settings.game_over_delay, Duration::from_millis(1000));
    assert_eq!(settings.spawn.run_speed, 300.0);
    assert_eq!(settings.spawn.world_width, 800.0);
    assert_eq!(settings.spawn.min_gap, Duration::from_millis(1500));
}

#[test]
fn test_filter_selection() {
    let mut config = Config::default();
    assert_eq!(config.detection.filter_spec(), "moving_average:3");
    assert_eq!(config.create_filter().unwrap().name(), "MovingAverageFilter");

    config.detection.smoothing = "none".to_string();
    assert_eq!(config.create_filter().unwrap().name(), "NoFilter");

    config.detection.smoothing = "moving_average:5".to_string();
    assert_eq!(config.detection.filter_spec(), "moving_average:5");
}

#[test]
fn test_validation_errors() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c: &mut Config| c.detection.mouth_open_threshold = 0.0),
        Box::new(|c: &mut Config| c.detection.eye_closed_threshold = f64::NAN),
        Box::new(|c: &mut Config| c.obstacles.min_gap_ms = 0),
        Box::new(|c: &mut Config| c.physics.gravity = -1.0),
        Box::new(|c: &mut Config| c.world.ground_height = 700.0),
        Box::new(|c: &mut Config| c.control.tick_ms = 0),
        Box::new(|c: &mut Config| c.control.frame_ms = 0),
        Box::new(|c: &mut Config| c.timing.game_over_delay_ms = u64::MAX),
        Box::new(|c: &mut Config| c.timing.countdown_seconds = u32::MAX),
        Box::new(|c: &mut Config| c.obstacles.max_gap_ms = MAX_TIMING_MS + 1),
    ];

    for mutate in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }
}
