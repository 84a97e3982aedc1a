/// Configuration of the wave post-effect feature.
///
/// `WaveEffectSettings` is handed to `WaveEffectFeature::new()` and stays
/// immutable for the feature's lifetime.

use bitflags::bitflags;
use crate::render_graph::RenderPassEvent;

bitflags! {
    /// Set of camera kinds the effect is applied to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CameraTypes: u32 {
        /// Primary game view
        const GAME = 1 << 0;
        /// Editor scene view
        const SCENE_VIEW = 1 << 1;
        /// Editor asset preview
        const PREVIEW = 1 << 2;
        /// VR eye cameras
        const VR = 1 << 3;
        /// Reflection probes
        const REFLECTION = 1 << 4;
    }
}

/// What a frame does when the resolved parameters say "disabled"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisabledPolicy {
    /// Keep the pass registered and upload `_NeedsEffect = 0`; the shader
    /// passes the source color through. The graph topology never changes.
    #[default]
    SampleUniform,
    /// Register nothing for the frame
    SkipPass,
}

/// Wave effect feature configuration
#[derive(Debug, Clone)]
pub struct WaveEffectSettings {
    /// Shader program looked up through `Renderer::find_shader()`
    pub shader_name: String,
    /// Pipeline insertion point of the effect pass and its copy-back
    pub event: RenderPassEvent,
    /// Camera kinds that receive the effect
    pub eligible_cameras: CameraTypes,
    pub disabled_policy: DisabledPolicy,
    /// Name of the full-screen distortion pass
    pub pass_name: String,
    /// Name of the intermediate color target
    pub output_texture_name: String,
    /// Name of the copy pass writing back into the camera color
    pub copy_pass_name: String,
}

impl Default for WaveEffectSettings {
    fn default() -> Self {
        Self {
            shader_name: "Hidden/WavePostEffectShader".to_string(),
            event: RenderPassEvent::AfterRenderingPostProcessing,
            eligible_cameras: CameraTypes::GAME,
            disabled_policy: DisabledPolicy::SampleUniform,
            pass_name: "WavePostEffectRenderPass".to_string(),
            output_texture_name: "WavePostEffectTexture".to_string(),
            copy_pass_name: "BlitWavePostEffectTextureToCameraColor".to_string(),
        }
    }
}
