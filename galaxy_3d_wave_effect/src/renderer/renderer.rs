/// Renderer trait - GPU resource factory interface

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{Buffer, BufferDesc, Shader, Texture, TextureDesc};

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Textures created since the renderer was built
    pub textures_created: u32,
    /// Buffers created since the renderer was built
    pub buffers_created: u32,
    /// Shader lookups that succeeded
    pub shaders_loaded: u32,
}

/// Main renderer trait
///
/// This is the factory interface the effect uses to obtain GPU resources.
/// It is provided by the host engine's backend; this crate never talks to
/// a GPU API directly.
pub trait Renderer: Send + Sync {
    /// Create a texture
    ///
    /// # Arguments
    ///
    /// * `desc` - Texture descriptor
    ///
    /// # Returns
    ///
    /// A shared pointer to the created texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Look up a compiled shader program by identifier
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if no shader is registered under `name`.
    fn find_shader(&mut self, name: &str) -> Result<Arc<dyn Shader>>;

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;
}
