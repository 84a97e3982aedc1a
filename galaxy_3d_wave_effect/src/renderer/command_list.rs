/// CommandList trait - for recording rendering commands

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{Buffer, Shader, Texture};

/// Command list for recording rendering commands
///
/// The render graph drives one command list per frame: it opens a render
/// pass on each pass's attachment, hands the list to the pass's recording
/// callback, and closes the render pass afterwards.
pub trait CommandList: Send + Sync {
    /// Begin a render pass targeting a single color attachment
    ///
    /// # Arguments
    ///
    /// * `target` - The attachment written by the pass
    /// * `label` - Pass name (debug markers)
    fn begin_render_pass(&mut self, target: &Arc<dyn Texture>, label: &str) -> Result<()>;

    /// End the current render pass
    fn end_render_pass(&mut self) -> Result<()>;

    /// Clear a whole texture to a color
    fn clear_texture(&mut self, texture: &Arc<dyn Texture>, color: [f32; 4]) -> Result<()>;

    /// Bind a shader program and select one of its passes
    fn bind_shader(&mut self, shader: &Arc<dyn Shader>, pass_index: u32) -> Result<()>;

    /// Bind a uniform buffer to a slot
    fn bind_uniform_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind a texture for sampling to a slot
    fn bind_texture(&mut self, slot: u32, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Draw vertices
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - Number of vertices to draw
    /// * `first_vertex` - Index of first vertex
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Copy the full contents of one texture into another of the same extent
    fn copy_texture(&mut self, src: &Arc<dyn Texture>, dst: &Arc<dyn Texture>) -> Result<()>;
}
