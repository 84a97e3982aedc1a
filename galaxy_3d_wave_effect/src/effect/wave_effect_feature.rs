/// Wave effect feature - per-frame orchestration of the effect.
///
/// Once per camera and frame the host calls `add_render_passes()`. The
/// feature checks the camera, resolves the parameter stack, pushes the
/// result into the material's uniforms and registers the post-effect pass.
///
/// Disabling the effect is a parameter change: with the default
/// `DisabledPolicy::SampleUniform` the pass stays registered and the shader
/// reads `_NeedsEffect = 0`.

use glam::Vec2;
use crate::error::Result;
use crate::{engine_bail, engine_info, engine_trace, engine_warn};
use crate::camera::{CameraData, FrameResources};
use crate::render_graph::{RenderGraph, TextureHandle};
use crate::renderer::Renderer;
use crate::settings::{DisabledPolicy, WaveEffectSettings};
use super::material::EffectMaterial;
use super::material_manager::MaterialManager;
use super::parameters::EffectParameterSet;
use super::post_effect_pass::{PassOutcome, WavePostEffectPass};
use super::volume_stack::{ParameterEdit, ParameterStack};

/// What `add_render_passes()` did for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureOutcome {
    /// Camera not eligible; nothing was resolved or registered
    Ineligible,
    /// Material unavailable (missing shader, ...); the frame is drawn without the effect
    Misconfigured,
    /// Effect disabled under `DisabledPolicy::SkipPass`; nothing registered
    Disabled,
    /// Passes registered with these parameters uploaded
    Recorded {
        output: TextureHandle,
        parameters: EffectParameterSet,
    },
}

/// The wave effect, as plugged into a host renderer
pub struct WaveEffectFeature {
    settings: WaveEffectSettings,
    stack: ParameterStack,
    materials: MaterialManager,
    pass: WavePostEffectPass,
    disposed: bool,
}

impl WaveEffectFeature {
    /// Create the feature. No GPU resource is created until the first frame.
    pub fn new(settings: WaveEffectSettings) -> Self {
        let materials = MaterialManager::new(&settings.shader_name);
        let pass = WavePostEffectPass::new(&settings);
        Self {
            settings,
            stack: ParameterStack::new(),
            materials,
            pass,
            disposed: false,
        }
    }

    pub fn settings(&self) -> &WaveEffectSettings {
        &self.settings
    }

    pub fn parameter_stack(&self) -> &ParameterStack {
        &self.stack
    }

    /// Register / unregister override volumes here
    pub fn parameter_stack_mut(&mut self) -> &mut ParameterStack {
        &mut self.stack
    }

    /// The material, once the first eligible frame created it
    pub fn material(&self) -> Option<&EffectMaterial> {
        self.materials.material()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ===== UI SETTERS (local volume) =====

    pub fn set_wave(&mut self, wave: f32) {
        self.stack.apply_edit(ParameterEdit::Wave(wave));
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.stack.apply_edit(ParameterEdit::Speed(speed));
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.stack.apply_edit(ParameterEdit::Intensity(intensity));
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.stack.apply_edit(ParameterEdit::Offset(offset));
    }

    pub fn set_offset_x(&mut self, x: f32) {
        self.stack.apply_edit(ParameterEdit::OffsetX(x));
    }

    pub fn set_offset_y(&mut self, y: f32) {
        self.stack.apply_edit(ParameterEdit::OffsetY(y));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.stack.apply_edit(ParameterEdit::Enabled(enabled));
    }

    /// Same as `set_enabled(true)`
    pub fn play(&mut self) {
        self.set_enabled(true);
    }

    /// Same as `set_enabled(false)`
    pub fn stop(&mut self) {
        self.set_enabled(false);
    }

    /// Forget every UI edit; volumes below take over again
    pub fn clear_local_overrides(&mut self) {
        self.stack.apply_edit(ParameterEdit::ClearOverrides);
    }

    /// Queue an edit, applied at the start of the next frame
    pub fn queue_edit(&mut self, edit: ParameterEdit) {
        self.stack.queue_edit(edit);
    }

    // ===== PER FRAME =====

    /// Returns true if the effect applies to this camera
    pub fn is_eligible(&self, camera: &CameraData) -> bool {
        camera.is_in(self.settings.eligible_cameras)
    }

    /// Effective parameters for a camera (no side effect)
    pub fn resolve_parameters(&self, camera: &CameraData) -> EffectParameterSet {
        self.stack.resolve(camera.position())
    }

    /// Insert the effect into the frame's graph
    ///
    /// # Errors
    ///
    /// - `UseAfterDispose` after `dispose()`
    /// - graph-contract violations and uniform upload failures
    ///
    /// A missing or broken material is not an error: the outcome is
    /// `Misconfigured` and a warning is logged.
    pub fn add_render_passes(
        &mut self,
        graph: &mut RenderGraph,
        renderer: &mut dyn Renderer,
        frame: &FrameResources,
    ) -> Result<FeatureOutcome> {
        if self.disposed {
            engine_bail!(UseAfterDispose; "galaxy3d::WaveEffectFeature",
                "add_render_passes() called on a disposed feature");
        }
        if !self.is_eligible(&frame.camera) {
            engine_trace!("galaxy3d::WaveEffectFeature",
                "{:?} camera is not eligible", frame.camera.camera_type());
            return Ok(FeatureOutcome::Ineligible);
        }

        self.stack.apply_edits();
        let parameters = self.stack.resolve(frame.camera.position());
        if !parameters.enabled && self.settings.disabled_policy == DisabledPolicy::SkipPass {
            self.pass.setup(None);
            return Ok(FeatureOutcome::Disabled);
        }

        let material = match self.materials.get_or_create(renderer) {
            Ok(material) => material,
            Err(error) if error.is_contract_violation() => return Err(error),
            Err(error) => {
                engine_warn!("galaxy3d::WaveEffectFeature",
                    "Wave effect skipped this frame: {}", error);
                self.pass.setup(None);
                return Ok(FeatureOutcome::Misconfigured);
            }
        };
        material.apply_parameters(&parameters);
        // The binding snapshots these values; the pass writes them again when it records
        material.upload()?;
        self.pass.setup(Some(material.binding()));

        match self.pass.add_to_graph(graph, frame)? {
            PassOutcome::Registered { output } => Ok(FeatureOutcome::Recorded { output, parameters }),
            PassOutcome::Skipped => Ok(FeatureOutcome::Misconfigured),
        }
    }

    // ===== TEARDOWN =====

    /// Release the material. Runs on drop if not called explicitly.
    ///
    /// # Errors
    ///
    /// `UseAfterDispose` on a second call; nothing is released twice.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            engine_bail!(UseAfterDispose; "galaxy3d::WaveEffectFeature",
                "Wave effect feature disposed twice");
        }
        self.pass.setup(None);
        self.materials.dispose()?;
        self.disposed = true;
        engine_info!("galaxy3d::WaveEffectFeature", "Wave effect feature disposed");
        Ok(())
    }
}

impl Drop for WaveEffectFeature {
    fn drop(&mut self) {
        if !self.disposed {
            // Errors are already logged by dispose()
            let _ = self.dispose();
        }
    }
}

#[cfg(test)]
#[path = "wave_effect_feature_tests.rs"]
mod tests;
