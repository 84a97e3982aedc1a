/// Effect material - the shader program plus its uniform block.
///
/// The material owns a CPU copy of the wave uniforms and a GPU uniform
/// buffer. Uniforms are addressed by fixed identifiers matching the names
/// the shader declares (`_NeedsEffect`, `_Wave`, `_Speed`, `_Intensity`,
/// `_Offset`) and are pushed to the GPU with `upload()`.

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use crate::error::Result;
use crate::engine_bail;
use crate::renderer::{Buffer, BufferDesc, BufferUsage, Renderer, Shader};
use super::parameters::EffectParameterSet;

// ===== UNIFORM IDENTIFIERS =====

/// Type of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Int,
    Float,
    Vec2,
}

/// Fixed uniform identifiers of the wave shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformId {
    /// `_NeedsEffect` (int, 0 or 1)
    NeedsEffect,
    /// `_Wave` (float)
    Wave,
    /// `_Speed` (float)
    Speed,
    /// `_Intensity` (float)
    Intensity,
    /// `_Offset` (vec2)
    Offset,
}

impl UniformId {
    pub const ALL: [UniformId; 5] = [
        UniformId::NeedsEffect,
        UniformId::Wave,
        UniformId::Speed,
        UniformId::Intensity,
        UniformId::Offset,
    ];

    /// Name of the uniform in the shader
    pub fn name(&self) -> &'static str {
        match self {
            UniformId::NeedsEffect => "_NeedsEffect",
            UniformId::Wave => "_Wave",
            UniformId::Speed => "_Speed",
            UniformId::Intensity => "_Intensity",
            UniformId::Offset => "_Offset",
        }
    }

    pub fn from_name(name: &str) -> Option<UniformId> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn kind(&self) -> UniformKind {
        match self {
            UniformId::NeedsEffect => UniformKind::Int,
            UniformId::Wave | UniformId::Speed | UniformId::Intensity => UniformKind::Float,
            UniformId::Offset => UniformKind::Vec2,
        }
    }
}

/// A typed uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
        }
    }
}

// ===== GPU LAYOUT =====

/// Uniform block as laid out in GPU memory (32 bytes, std140 compatible)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct WaveUniforms {
    pub offset: [f32; 2],
    pub wave: f32,
    pub speed: f32,
    pub intensity: f32,
    pub needs_effect: i32,
    pub _padding: [f32; 2],
}

// ===== MATERIAL BINDING =====

/// What a pass needs to draw with the material
///
/// Cheap to clone; the recording callback of a pass owns one.
#[derive(Clone)]
pub struct MaterialBinding {
    pub shader: Arc<dyn Shader>,
    pub uniforms: Arc<dyn Buffer>,
    /// Shader pass used for the full-screen draw
    pub pass_index: u32,
    /// Uniform values at the time the binding was taken; written into
    /// `uniforms` when the pass records
    pub values: WaveUniforms,
}

// ===== EFFECT MATERIAL =====

/// Wave effect material
///
/// Created by `MaterialManager`; never shared outside its feature.
pub struct EffectMaterial {
    shader: Arc<dyn Shader>,
    buffer: Arc<dyn Buffer>,
    uniforms: WaveUniforms,
    dirty: bool,
}

impl EffectMaterial {
    /// Shader pass used by full-screen draws
    pub const PASS_INDEX: u32 = 0;

    /// Look up the shader and create the uniform buffer
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the shader is missing or exposes no pass;
    /// buffer creation errors are propagated.
    pub(crate) fn new(renderer: &mut dyn Renderer, shader_name: &str) -> Result<Self> {
        let shader = renderer.find_shader(shader_name)?;
        if shader.pass_count() == 0 {
            engine_bail!(InitializationFailed; "galaxy3d::EffectMaterial",
                "Shader '{}' has no pass", shader_name);
        }

        let buffer = renderer.create_buffer(BufferDesc {
            label: format!("{}/Uniforms", shader_name),
            size: std::mem::size_of::<WaveUniforms>() as u64,
            usage: BufferUsage::Uniform,
        })?;

        Ok(Self {
            shader,
            buffer,
            uniforms: WaveUniforms::default(),
            dirty: true,
        })
    }

    // ===== ACCESSORS =====

    pub fn shader(&self) -> &Arc<dyn Shader> {
        &self.shader
    }

    pub fn uniform_buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// CPU copy of the uniform block
    pub fn uniforms(&self) -> &WaveUniforms {
        &self.uniforms
    }

    /// Returns true if uniforms changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn binding(&self) -> MaterialBinding {
        MaterialBinding {
            shader: self.shader.clone(),
            uniforms: self.buffer.clone(),
            pass_index: Self::PASS_INDEX,
            values: self.uniforms,
        }
    }

    // ===== UNIFORMS =====

    /// Current value of a uniform
    pub fn get(&self, id: UniformId) -> UniformValue {
        match id {
            UniformId::NeedsEffect => UniformValue::Int(self.uniforms.needs_effect),
            UniformId::Wave => UniformValue::Float(self.uniforms.wave),
            UniformId::Speed => UniformValue::Float(self.uniforms.speed),
            UniformId::Intensity => UniformValue::Float(self.uniforms.intensity),
            UniformId::Offset => UniformValue::Vec2(Vec2::from_array(self.uniforms.offset)),
        }
    }

    /// Set a uniform
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the value's type does not match the uniform.
    pub fn set(&mut self, id: UniformId, value: UniformValue) -> Result<()> {
        match (id, value) {
            (UniformId::NeedsEffect, UniformValue::Int(v)) => self.uniforms.needs_effect = v,
            (UniformId::Wave, UniformValue::Float(v)) => self.uniforms.wave = v,
            (UniformId::Speed, UniformValue::Float(v)) => self.uniforms.speed = v,
            (UniformId::Intensity, UniformValue::Float(v)) => self.uniforms.intensity = v,
            (UniformId::Offset, UniformValue::Vec2(v)) => self.uniforms.offset = v.to_array(),
            _ => engine_bail!(InvalidResource; "galaxy3d::EffectMaterial",
                "Uniform '{}' is {:?}, got {:?}", id.name(), id.kind(), value.kind()),
        }
        self.dirty = true;
        Ok(())
    }

    pub fn set_int(&mut self, id: UniformId, value: i32) -> Result<()> {
        self.set(id, UniformValue::Int(value))
    }

    pub fn set_float(&mut self, id: UniformId, value: f32) -> Result<()> {
        self.set(id, UniformValue::Float(value))
    }

    pub fn set_vector(&mut self, id: UniformId, value: Vec2) -> Result<()> {
        self.set(id, UniformValue::Vec2(value))
    }

    pub fn get_int(&self, id: UniformId) -> Result<i32> {
        match self.get(id) {
            UniformValue::Int(v) => Ok(v),
            other => engine_bail!(InvalidResource; "galaxy3d::EffectMaterial",
                "Uniform '{}' is {:?}, not Int", id.name(), other.kind()),
        }
    }

    pub fn get_float(&self, id: UniformId) -> Result<f32> {
        match self.get(id) {
            UniformValue::Float(v) => Ok(v),
            other => engine_bail!(InvalidResource; "galaxy3d::EffectMaterial",
                "Uniform '{}' is {:?}, not Float", id.name(), other.kind()),
        }
    }

    pub fn get_vector(&self, id: UniformId) -> Result<Vec2> {
        match self.get(id) {
            UniformValue::Vec2(v) => Ok(v),
            other => engine_bail!(InvalidResource; "galaxy3d::EffectMaterial",
                "Uniform '{}' is {:?}, not Vec2", id.name(), other.kind()),
        }
    }

    /// Write every uniform from a resolved parameter set
    pub fn apply_parameters(&mut self, params: &EffectParameterSet) {
        self.uniforms = WaveUniforms {
            offset: params.offset.to_array(),
            wave: params.wave,
            speed: params.speed,
            intensity: params.intensity,
            needs_effect: params.needs_effect(),
            _padding: [0.0; 2],
        };
        self.dirty = true;
    }

    /// Read the uniforms back as a parameter set (e.g. to initialise UI sliders)
    pub fn parameters(&self) -> EffectParameterSet {
        EffectParameterSet {
            wave: self.uniforms.wave,
            speed: self.uniforms.speed,
            intensity: self.uniforms.intensity,
            offset: Vec2::from_array(self.uniforms.offset),
            enabled: self.uniforms.needs_effect != 0,
        }
    }

    /// Copy the uniform block into the GPU buffer
    pub fn upload(&mut self) -> Result<()> {
        self.buffer.update(0, bytemuck::bytes_of(&self.uniforms))?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
