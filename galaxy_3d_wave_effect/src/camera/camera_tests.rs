use glam::Vec3;
use crate::settings::CameraTypes;
use super::*;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_data_new() {
    let camera = CameraData::new(CameraType::Game);
    assert_eq!(camera.camera_type(), CameraType::Game);
    assert_eq!(camera.position(), Vec3::ZERO);
}

#[test]
fn test_camera_data_with_position() {
    let mut camera = CameraData::new(CameraType::SceneView).with_position(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));

    camera.set_position(Vec3::X);
    assert_eq!(camera.position(), Vec3::X);
}

// ============================================================================
// Eligibility flags
// ============================================================================

#[test]
fn test_camera_type_flags_are_distinct() {
    let all = [
        CameraType::Game,
        CameraType::SceneView,
        CameraType::Preview,
        CameraType::VR,
        CameraType::Reflection,
    ];
    let mut union = CameraTypes::empty();
    for camera_type in all {
        assert!(!union.intersects(camera_type.flag()));
        union |= camera_type.flag();
    }
    assert_eq!(union, CameraTypes::all());
}

#[test]
fn test_camera_is_in() {
    let game = CameraData::new(CameraType::Game);
    let reflection = CameraData::new(CameraType::Reflection);

    assert!(game.is_in(CameraTypes::GAME));
    assert!(!reflection.is_in(CameraTypes::GAME));
    assert!(reflection.is_in(CameraTypes::GAME | CameraTypes::REFLECTION));
    assert!(!game.is_in(CameraTypes::empty()));
}
