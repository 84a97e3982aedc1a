/// Tests for EffectMaterial and its uniform identifiers

use glam::Vec2;
use super::*;
use crate::error::Error;
use crate::renderer::mock_renderer::MockRenderer;

const SHADER: &str = "Hidden/WavePostEffectShader";

fn create_material(renderer: &mut MockRenderer) -> EffectMaterial {
    EffectMaterial::new(renderer, SHADER).unwrap()
}

// ============================================================================
// Uniform identifiers
// ============================================================================

#[test]
fn test_uniform_names() {
    let names: Vec<&str> = UniformId::ALL.iter().map(|id| id.name()).collect();
    assert_eq!(names, vec!["_NeedsEffect", "_Wave", "_Speed", "_Intensity", "_Offset"]);
}

#[test]
fn test_uniform_from_name() {
    for id in UniformId::ALL {
        assert_eq!(UniformId::from_name(id.name()), Some(id));
    }
    assert_eq!(UniformId::from_name("_Unknown"), None);
}

#[test]
fn test_uniform_kinds() {
    assert_eq!(UniformId::NeedsEffect.kind(), UniformKind::Int);
    assert_eq!(UniformId::Speed.kind(), UniformKind::Float);
    assert_eq!(UniformId::Offset.kind(), UniformKind::Vec2);
}

#[test]
fn test_wave_uniforms_layout() {
    assert_eq!(std::mem::size_of::<WaveUniforms>(), 32);
    let uniforms = WaveUniforms { needs_effect: 1, ..Default::default() };
    let bytes = bytemuck::bytes_of(&uniforms);
    assert_eq!(&bytes[20..24], &1i32.to_ne_bytes());
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_material_new() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let material = create_material(&mut renderer);

    assert_eq!(material.shader().name(), SHADER);
    assert_eq!(material.uniform_buffer().size(), 32);
    assert_eq!(material.uniforms(), &WaveUniforms::default());
    assert!(material.is_dirty());
    assert_eq!(renderer.stats().buffers_created, 1);
}

#[test]
fn test_material_missing_shader_fails() {
    let mut renderer = MockRenderer::new();
    let result = EffectMaterial::new(&mut renderer, SHADER);
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_material_shader_without_pass_fails() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 0);
    let result = EffectMaterial::new(&mut renderer, SHADER);
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert_eq!(renderer.stats().buffers_created, 0);
}

// ============================================================================
// Uniform access
// ============================================================================

#[test]
fn test_typed_setters_and_getters() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut material = create_material(&mut renderer);

    material.set_int(UniformId::NeedsEffect, 1).unwrap();
    material.set_float(UniformId::Wave, 4.0).unwrap();
    material.set_vector(UniformId::Offset, Vec2::new(0.5, 0.25)).unwrap();

    assert_eq!(material.get_int(UniformId::NeedsEffect).unwrap(), 1);
    assert_eq!(material.get_float(UniformId::Wave).unwrap(), 4.0);
    assert_eq!(material.get_vector(UniformId::Offset).unwrap(), Vec2::new(0.5, 0.25));
    assert_eq!(material.get(UniformId::Speed), UniformValue::Float(0.0));
}

#[test]
fn test_kind_mismatch_fails() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut material = create_material(&mut renderer);

    assert!(matches!(material.set_float(UniformId::NeedsEffect, 1.0), Err(Error::InvalidResource(_))));
    assert!(matches!(material.set_int(UniformId::Offset, 3), Err(Error::InvalidResource(_))));
    assert!(matches!(material.get_vector(UniformId::Wave), Err(Error::InvalidResource(_))));
    assert_eq!(material.uniforms(), &WaveUniforms::default());
}

#[test]
fn test_apply_parameters_and_readback() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut material = create_material(&mut renderer);
    let params = EffectParameterSet {
        wave: 3.0,
        speed: 1.5,
        intensity: 0.2,
        offset: Vec2::new(0.1, 0.2),
        enabled: true,
    };

    material.apply_parameters(&params);

    assert_eq!(material.get_int(UniformId::NeedsEffect).unwrap(), 1);
    assert_eq!(material.get_float(UniformId::Speed).unwrap(), 1.5);
    assert_eq!(material.parameters(), params);
}

// ============================================================================
// Upload
// ============================================================================

#[test]
fn test_upload_writes_uniform_block() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 1);
    let mut material = create_material(&mut renderer);
    material.set_float(UniformId::Intensity, 0.75).unwrap();

    material.upload().unwrap();

    assert!(!material.is_dirty());
    let contents = renderer.created_buffers()[0].contents();
    assert_eq!(contents.as_slice(), bytemuck::bytes_of(material.uniforms()));
}

#[test]
fn test_binding_uses_first_pass() {
    let mut renderer = MockRenderer::new().with_shader(SHADER, 2);
    let material = create_material(&mut renderer);
    let binding = material.binding();

    assert_eq!(binding.pass_index, 0);
    assert_eq!(binding.shader.name(), SHADER);
    assert!(Arc::ptr_eq(&binding.uniforms, material.uniform_buffer()));
}
