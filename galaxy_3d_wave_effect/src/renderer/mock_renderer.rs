/// Mock Renderer (no GPU required)
///
/// Headless implementation of the renderer traits. It lets the render graph,
/// the material lifecycle and the effect orchestrator run in tests and in
/// headless hosts, and records every command as a readable string.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::renderer::{
    Renderer, RendererStats, Buffer, BufferDesc, Shader, Texture, TextureDesc,
    TextureInfo, TextureFormat, TextureUsage, MsaaSamples, CommandList,
};
use crate::error::Result;
use crate::engine_bail;

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub label: String,
}

impl MockTexture {
    pub fn new(label: &str, info: TextureInfo) -> Self {
        Self { info, label: label.to_string() }
    }

    /// Sampled + renderable RGBA8 color buffer, as a camera would own
    pub fn color_target(label: &str, width: u32, height: u32) -> Self {
        Self::new(label, TextureInfo {
            width,
            height,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TextureUsage::SampledAndRenderTarget,
            samples: MsaaSamples::None,
            depth_bits: 0,
        })
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub label: String,
    data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn new(label: &str, size: u64) -> Self {
        Self {
            label: label.to_string(),
            data: Mutex::new(vec![0; size as usize]),
        }
    }

    /// Snapshot of the buffer contents
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().map(|data| data.clone()).unwrap_or_default()
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, bytes: &[u8]) -> Result<()> {
        let mut data = match self.data.lock() {
            Ok(data) => data,
            Err(_) => engine_bail!("galaxy3d::mock", "Buffer '{}' lock poisoned", self.label),
        };
        let start = offset as usize;
        let end = start + bytes.len();
        if end > data.len() {
            engine_bail!(InvalidResource; "galaxy3d::mock",
                "Write of {} bytes at offset {} overflows buffer '{}' ({} bytes)",
                bytes.len(), offset, self.label, data.len());
        }
        data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().map(|data| data.len() as u64).unwrap_or(0)
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub name: String,
    pub passes: u32,
}

impl MockShader {
    pub fn new(name: &str, passes: u32) -> Self {
        Self { name: name.to_string(), passes }
    }
}

impl Shader for MockShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn pass_count(&self) -> u32 {
        self.passes
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

/// Command list that records each command as a string
/// (e.g. `"bind_texture:0:CameraColor"`, `"copy_texture:A->B"`).
#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl CommandList for MockCommandList {
    fn begin_render_pass(&mut self, target: &Arc<dyn Texture>, label: &str) -> Result<()> {
        self.commands.push(format!("begin_render_pass:{}:{}", label, target.label()));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.commands.push("end_render_pass".to_string());
        Ok(())
    }

    fn clear_texture(&mut self, texture: &Arc<dyn Texture>, _color: [f32; 4]) -> Result<()> {
        self.commands.push(format!("clear_texture:{}", texture.label()));
        Ok(())
    }

    fn bind_shader(&mut self, shader: &Arc<dyn Shader>, pass_index: u32) -> Result<()> {
        self.commands.push(format!("bind_shader:{}#{}", shader.name(), pass_index));
        Ok(())
    }

    fn bind_uniform_buffer(&mut self, slot: u32, _buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.commands.push(format!("bind_uniform_buffer:{}", slot));
        Ok(())
    }

    fn bind_texture(&mut self, slot: u32, texture: &Arc<dyn Texture>) -> Result<()> {
        self.commands.push(format!("bind_texture:{}:{}", slot, texture.label()));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.commands.push(format!("draw:{}", vertex_count));
        Ok(())
    }

    fn copy_texture(&mut self, src: &Arc<dyn Texture>, dst: &Arc<dyn Texture>) -> Result<()> {
        self.commands.push(format!("copy_texture:{}->{}", src.label(), dst.label()));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Mock Renderer that tracks created resources without GPU
///
/// Created resources are kept alive by the mock so tests can observe them;
/// a resource is "live" while somebody other than the mock still holds it.
#[derive(Default)]
pub struct MockRenderer {
    shaders: FxHashMap<String, u32>,
    textures: Vec<Arc<MockTexture>>,
    buffers: Vec<Arc<MockBuffer>>,
    stats: RendererStats,
    /// When set, create_texture fails with OutOfMemory
    pub fail_texture_creation: bool,
}

impl MockRenderer {
    /// Create a new mock renderer with no shaders registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shader program that find_shader() will return
    pub fn register_shader(&mut self, name: &str, passes: u32) {
        self.shaders.insert(name.to_string(), passes);
    }

    /// Builder form of register_shader()
    pub fn with_shader(mut self, name: &str, passes: u32) -> Self {
        self.register_shader(name, passes);
        self
    }

    /// Labels of every texture created so far, in creation order
    pub fn created_textures(&self) -> Vec<String> {
        self.textures.iter().map(|t| t.label.clone()).collect()
    }

    /// Most recently created texture with this label
    pub fn created_texture(&self, label: &str) -> Option<&MockTexture> {
        self.textures.iter().rev().find(|t| t.label == label).map(|t| t.as_ref())
    }

    /// Textures still referenced outside the mock
    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|t| Arc::strong_count(t) > 1).count()
    }

    /// Every buffer created so far
    pub fn created_buffers(&self) -> &[Arc<MockBuffer>] {
        &self.buffers
    }

    /// Buffers still referenced outside the mock
    pub fn live_buffers(&self) -> usize {
        self.buffers.iter().filter(|b| Arc::strong_count(b) > 1).count()
    }
}

impl Renderer for MockRenderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if self.fail_texture_creation {
            crate::engine_error!("galaxy3d::mock", "Texture '{}' allocation failed", desc.label);
            return Err(crate::error::Error::OutOfMemory);
        }
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(InvalidResource; "galaxy3d::mock",
                "Texture '{}' has a zero extent ({}x{})", desc.label, desc.width, desc.height);
        }

        let texture = Arc::new(MockTexture::new(&desc.label, TextureInfo {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            samples: desc.samples,
            depth_bits: desc.depth_bits,
        }));
        self.textures.push(texture.clone());
        self.stats.textures_created += 1;
        Ok(texture)
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let buffer = Arc::new(MockBuffer::new(&desc.label, desc.size));
        self.buffers.push(buffer.clone());
        self.stats.buffers_created += 1;
        Ok(buffer)
    }

    fn find_shader(&mut self, name: &str) -> Result<Arc<dyn Shader>> {
        match self.shaders.get(name) {
            Some(&passes) => {
                self.stats.shaders_loaded += 1;
                Ok(Arc::new(MockShader::new(name, passes)))
            }
            None => engine_bail!(InitializationFailed; "galaxy3d::mock",
                "Shader '{}' not found", name),
        }
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
