/// Tests for MaterialManager

use std::sync::Arc;
use super::*;
use crate::error::Error;
use crate::renderer::mock_renderer::MockRenderer;

const SHADER: &str = "Hidden/WavePostEffectShader";

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_manager_starts_uncreated() {
    let manager = MaterialManager::new(SHADER);
    assert_eq!(manager.shader_name(), SHADER);
    assert!(!manager.is_created());
    assert!(!manager.is_disposed());
    assert!(manager.material().is_none());
}

#[test]
fn test_get_or_create_returns_same_instance() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut manager = MaterialManager::new(SHADER);

    let first = manager.get_or_create(&mut renderer).unwrap().uniform_buffer().clone();
    let second = manager.get_or_create(&mut renderer).unwrap().uniform_buffer().clone();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(renderer.stats().shaders_loaded, 1);
    assert_eq!(renderer.stats().buffers_created, 1);
    assert!(manager.is_created());
}

#[test]
fn test_failed_creation_retries() {
    let mut renderer = MockRenderer::new();
    let mut manager = MaterialManager::new(SHADER);

    assert!(matches!(manager.get_or_create(&mut renderer), Err(Error::InitializationFailed(_))));
    assert!(!manager.is_created());

    renderer.register_shader(SHADER, 1);
    assert!(manager.get_or_create(&mut renderer).is_ok());
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_releases_material() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut manager = MaterialManager::new(SHADER);
    manager.get_or_create(&mut renderer).unwrap();
    assert_eq!(renderer.live_buffers(), 1);

    manager.dispose().unwrap();

    assert!(manager.is_disposed());
    assert!(manager.material().is_none());
    assert_eq!(renderer.live_buffers(), 0);
}

#[test]
fn test_dispose_twice_is_caught() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut manager = MaterialManager::new(SHADER);
    manager.get_or_create(&mut renderer).unwrap();
    manager.dispose().unwrap();

    assert!(matches!(manager.dispose(), Err(Error::UseAfterDispose(_))));
    assert!(manager.is_disposed());
    assert_eq!(renderer.live_buffers(), 0);
}

#[test]
fn test_dispose_before_creation() {
    let mut manager = MaterialManager::new(SHADER);
    manager.dispose().unwrap();
    assert!(manager.is_disposed());
}

#[test]
fn test_use_after_dispose_fails() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut manager = MaterialManager::new(SHADER);
    manager.dispose().unwrap();

    assert!(matches!(manager.get_or_create(&mut renderer), Err(Error::UseAfterDispose(_))));
    assert_eq!(renderer.stats().buffers_created, 0);
}
