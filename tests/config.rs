use mapper::config::{ConfigError, EditorConfig};
use mapper::input::Modifier;

#[test]
fn test_defaults() {
    let c = EditorConfig::default();
    assert_eq!(c.sprite_size, 16);
    assert_eq!(c.scale_factor, 4);
    assert_eq!(c.display_size(), 64);
    assert_eq!(c.world_offset, 512);
    assert_eq!((c.viewport_width, c.viewport_height), (1024, 768));
    assert_eq!(c.pan_modifier, Modifier::Ctrl);
    assert!(c.validate().is_ok());
}

#[test]
fn test_partial_json_fills_defaults() {
    let c = EditorConfig::from_json(r#"{ "scale_factor": 2, "pan_modifier": "alt" }"#).unwrap();
    assert_eq!(c.display_size(), 32);
    assert_eq!(c.pan_modifier, Modifier::Alt);
    assert_eq!(c.sprite_size, 16);
}

#[test]
fn test_load_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(&path, r#"{ "world_offset": 0 }"#).unwrap();
    assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Invalid(_))));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse { .. })));

    let missing = dir.path().join("missing.json");
    assert!(matches!(EditorConfig::load(&missing), Err(ConfigError::Read { .. })));

    std::fs::write(&path, r#"{ "viewport_width": 640, "viewport_height": 480 }"#).unwrap();
    let c = EditorConfig::load(&path).unwrap();
    assert_eq!((c.viewport_width, c.viewport_height), (640, 480));
}

#[test]
fn test_world_too_large_for_i32_pixels_is_rejected() {
    let c = EditorConfig::from_json(r#"{ "world_offset": 20000000 }"#).unwrap();
    assert!(matches!(c.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("world_offset")));

    let c = EditorConfig::from_json(r#"{ "sprite_size": 65536, "scale_factor": 65536 }"#).unwrap();
    assert!(matches!(c.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("scale_factor")));

    let c = EditorConfig::from_json(r#"{ "viewport_width": 4294967295 }"#).unwrap();
    assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

    // The largest world that still fits is accepted.
    let c = EditorConfig { world_offset: i32::MAX / 128, ..EditorConfig::default() };
    assert!(c.validate().is_ok());
}
