/// Wave post-effect pass.
///
/// Reads the camera color, draws the wave material full-screen into an
/// intermediate target shaped like the camera color, then copies the
/// intermediate target back into the camera color.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crate::error::Result;
use crate::{engine_trace, engine_warn};
use crate::camera::FrameResources;
use crate::render_graph::{
    AccessFlags, RenderGraph, RenderPassEvent, TextureDescriptor, TextureHandle,
};
use crate::renderer::MsaaSamples;
use crate::settings::WaveEffectSettings;
use super::material::MaterialBinding;

/// Per-frame state of the pass
///
/// `setup()` starts every frame over at `Unbound` or `Bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// No material; the pass records nothing
    Unbound,
    /// Material bound, nothing declared yet this frame
    Bound,
    /// Draw and copy-back registered into this frame's graph
    Declared,
    /// The draw was recorded by the graph
    Done,
}

/// Result of `WavePostEffectPass::add_to_graph()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No material was bound; nothing was registered
    Skipped,
    /// Both passes were registered; `output` is the intermediate target
    Registered { output: TextureHandle },
}

/// Full-screen wave distortion pass
pub struct WavePostEffectPass {
    pass_name: String,
    copy_pass_name: String,
    output_name: String,
    event: RenderPassEvent,
    material: Option<MaterialBinding>,
    state: PassState,
    /// Set by the recording callback of the current frame
    recorded: Arc<AtomicBool>,
}

impl WavePostEffectPass {
    pub fn new(settings: &WaveEffectSettings) -> Self {
        Self {
            pass_name: settings.pass_name.clone(),
            copy_pass_name: settings.copy_pass_name.clone(),
            output_name: settings.output_texture_name.clone(),
            event: settings.event,
            material: None,
            state: PassState::Unbound,
            recorded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> PassState {
        if self.state == PassState::Declared && self.recorded.load(Ordering::Acquire) {
            PassState::Done
        } else {
            self.state
        }
    }

    pub fn event(&self) -> RenderPassEvent {
        self.event
    }

    /// Bind the material for the coming frame (None unbinds)
    ///
    /// Resets the per-frame state; call once per camera per frame before
    /// `add_to_graph()`. The binding's uniform values are the ones the
    /// draw will use.
    pub fn setup(&mut self, material: Option<MaterialBinding>) {
        self.recorded = Arc::new(AtomicBool::new(false));
        self.state = if material.is_some() { PassState::Bound } else { PassState::Unbound };
        self.material = material;
    }

    /// Descriptor of the intermediate target
    ///
    /// Same extent and format as the camera color, single-sampled, no
    /// depth, not cleared (every pixel is overwritten by the draw).
    pub fn output_descriptor(name: &str, camera_color: &TextureDescriptor) -> TextureDescriptor {
        camera_color
            .derive(name)
            .with_samples(MsaaSamples::None)
            .with_depth_bits(0)
            .without_clear()
    }

    /// Register the draw and the copy-back into `graph`
    ///
    /// Without a bound material nothing is registered and `Skipped` is
    /// returned.
    pub fn add_to_graph(&mut self, graph: &mut RenderGraph, frame: &FrameResources) -> Result<PassOutcome> {
        let Some(binding) = self.material.clone() else {
            engine_warn!("galaxy3d::WavePostEffectPass",
                "Pass '{}' has no material, skipped", self.pass_name);
            return Ok(PassOutcome::Skipped);
        };

        let source = frame.camera_color;
        let desc = Self::output_descriptor(&self.output_name, graph.texture_desc(source)?);
        let output = graph.create_texture(desc)?;
        let recorded = self.recorded.clone();

        graph.add_pass(&self.pass_name, self.event,
            |builder| {
                builder.set_render_attachment(output, 0, AccessFlags::WRITE)?;
                builder.use_texture(source, AccessFlags::READ)?;
                builder.allow_culling(false);
                Ok(())
            },
            move |ctx| {
                let source = ctx.texture(source)?;
                // The buffer is shared by every camera using the material
                binding.uniforms.update(0, bytemuck::bytes_of(&binding.values))?;
                let cmd = ctx.cmd();
                cmd.bind_shader(&binding.shader, binding.pass_index)?;
                cmd.bind_uniform_buffer(0, &binding.uniforms)?;
                cmd.bind_texture(0, &source)?;
                cmd.draw(3, 0)?;
                recorded.store(true, Ordering::Release);
                Ok(())
            },
        )?;
        graph.add_copy_pass(&self.copy_pass_name, output, source, self.event)?;

        self.state = PassState::Declared;
        engine_trace!("galaxy3d::WavePostEffectPass",
            "Pass '{}' registered for frame {}", self.pass_name, graph.frame_index());
        Ok(PassOutcome::Registered { output })
    }
}

#[cfg(test)]
#[path = "post_effect_pass_tests.rs"]
mod tests;
