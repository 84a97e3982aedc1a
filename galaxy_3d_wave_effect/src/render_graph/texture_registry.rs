/// Texture resource registry - per-frame logical textures.
///
/// The registry stores texture *descriptors* behind opaque handles while the
/// graph is being built, and only turns them into GPU textures during
/// execution, right before the first pass that consumes them runs.
/// Everything is discarded when the frame ends.

use std::sync::Arc;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use crate::renderer::{
    CommandList, MsaaSamples, Renderer, Texture, TextureDesc, TextureFormat, TextureInfo,
    TextureUsage,
};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Generation-checked slot of a logical texture within one frame.
    pub struct TextureKey;
}

/// Opaque handle to a logical texture of the current frame
///
/// Two handles are equal only if they name the same slot of the same frame.
/// A handle is rejected once its frame has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    key: TextureKey,
    frame: u64,
}

impl TextureHandle {
    /// Frame index the handle was issued in
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

// ===== TEXTURE DESCRIPTOR =====

/// Description of a logical texture. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    /// Debug name (also the label of the GPU texture)
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub samples: MsaaSamples,
    /// Bits of the depth buffer allocated with the texture (0 = color only).
    /// Depth formats start at the format's own depth size.
    pub depth_bits: u32,
    /// Clear the texture to `clear_color` right after allocation
    pub clear_buffer: bool,
    pub clear_color: [f32; 4],
}

impl TextureDescriptor {
    /// Single-sampled color descriptor, not cleared on allocation
    pub fn new(name: &str, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            format,
            samples: MsaaSamples::None,
            depth_bits: format.depth_bits(),
            clear_buffer: false,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Descriptor matching an existing texture
    pub fn from_texture_info(name: &str, info: &TextureInfo) -> Self {
        Self {
            samples: info.samples,
            depth_bits: info.depth_bits,
            ..Self::new(name, info.width, info.height, info.format)
        }
    }

    /// Copy of this descriptor under another name
    pub fn derive(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_samples(mut self, samples: MsaaSamples) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_depth_bits(mut self, depth_bits: u32) -> Self {
        self.depth_bits = depth_bits;
        self
    }

    /// Request a clear to `color` when the texture is allocated
    pub fn with_clear(mut self, color: [f32; 4]) -> Self {
        self.clear_buffer = true;
        self.clear_color = color;
        self
    }

    pub fn without_clear(mut self) -> Self {
        self.clear_buffer = false;
        self
    }

    /// Returns true if both descriptors have the same pixel extent
    pub fn same_extent(&self, other: &TextureDescriptor) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub(crate) fn to_texture_desc(&self) -> TextureDesc {
        let usage = if self.format.is_depth() {
            TextureUsage::DepthStencil
        } else {
            TextureUsage::SampledAndRenderTarget
        };
        TextureDesc {
            label: self.name.clone(),
            width: self.width,
            height: self.height,
            format: self.format,
            usage,
            samples: self.samples,
            depth_bits: self.depth_bits,
        }
    }
}

// ===== GRAPH PHASE =====

/// Lifecycle phase of the frame's graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphPhase {
    /// No frame in progress
    Idle,
    /// Passes and textures are being declared
    Building,
    /// Passes are recording; handles may be resolved
    Executing,
}

// ===== REGISTRY =====

struct TextureEntry {
    desc: TextureDescriptor,
    /// Externally owned texture (never allocated nor released here)
    imported: Option<Arc<dyn Texture>>,
    /// GPU texture, present once a scheduled pass consumed the handle
    resource: Option<Arc<dyn Texture>>,
}

/// Per-frame registry of logical textures
pub struct TextureRegistry {
    textures: SlotMap<TextureKey, TextureEntry>,
    frame: u64,
    phase: GraphPhase,
    allocated: u32,
    released: u32,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: SlotMap::with_key(),
            frame: 0,
            phase: GraphPhase::Idle,
            allocated: 0,
            released: 0,
        }
    }

    /// Start a new frame. Handles from earlier frames become invalid.
    ///
    /// Returns the new frame index.
    pub fn begin_frame(&mut self) -> u64 {
        if self.phase != GraphPhase::Idle {
            self.end_frame();
        }
        self.frame += 1;
        self.phase = GraphPhase::Building;
        self.allocated = 0;
        self.released = 0;
        self.frame
    }

    /// Index of the current (or last) frame
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    pub fn phase(&self) -> GraphPhase {
        self.phase
    }

    /// Register a transient texture. No memory is allocated here.
    ///
    /// # Errors
    ///
    /// - `ResourceNotReady` outside the building phase
    /// - `InvalidResource` if the descriptor has a zero extent
    pub fn create(&mut self, desc: TextureDescriptor) -> Result<TextureHandle> {
        self.check_building(&desc.name)?;
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(InvalidResource; "galaxy3d::TextureRegistry",
                "Texture '{}' has a zero extent ({}x{})", desc.name, desc.width, desc.height);
        }

        let key = self.textures.insert(TextureEntry {
            desc,
            imported: None,
            resource: None,
        });
        Ok(TextureHandle { key, frame: self.frame })
    }

    /// Register an externally owned texture (e.g. the camera color buffer)
    ///
    /// The descriptor is derived from the texture's info.
    pub fn import(&mut self, name: &str, texture: Arc<dyn Texture>) -> Result<TextureHandle> {
        self.check_building(name)?;
        let desc = TextureDescriptor::from_texture_info(name, texture.info());
        let key = self.textures.insert(TextureEntry {
            desc,
            imported: Some(texture),
            resource: None,
        });
        Ok(TextureHandle { key, frame: self.frame })
    }

    /// Descriptor the handle was created with
    pub fn descriptor(&self, handle: TextureHandle) -> Result<&TextureDescriptor> {
        Ok(&self.entry(handle)?.desc)
    }

    /// Returns true if the handle names an imported texture
    pub fn is_imported(&self, handle: TextureHandle) -> Result<bool> {
        Ok(self.entry(handle)?.imported.is_some())
    }

    /// Returns true if the handle is valid in the current frame
    pub fn contains(&self, handle: TextureHandle) -> bool {
        handle.frame == self.frame && self.textures.contains_key(handle.key)
    }

    /// Number of logical textures registered this frame
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Concrete GPU texture behind a handle
    ///
    /// # Errors
    ///
    /// - `InvalidResource` for a handle of another frame
    /// - `ResourceNotReady` outside the execution phase, or if no scheduled
    ///   pass consumed the handle
    pub fn resolve(&self, handle: TextureHandle) -> Result<Arc<dyn Texture>> {
        let entry = self.entry(handle)?;
        if self.phase != GraphPhase::Executing {
            engine_bail!(ResourceNotReady; "galaxy3d::TextureRegistry",
                "Texture '{}' resolved during {:?} phase", entry.desc.name, self.phase);
        }
        match &entry.resource {
            Some(texture) => Ok(texture.clone()),
            None => engine_bail!(ResourceNotReady; "galaxy3d::TextureRegistry",
                "Texture '{}' is not consumed by any scheduled pass", entry.desc.name),
        }
    }

    /// Textures allocated since the frame began
    pub fn textures_allocated(&self) -> u32 {
        self.allocated
    }

    /// Textures released by the last end_frame()
    pub fn textures_released(&self) -> u32 {
        self.released
    }

    // ===== EXECUTION (render graph only) =====

    pub(crate) fn begin_execution(&mut self) {
        self.phase = GraphPhase::Executing;
    }

    /// Back a handle with a GPU texture, once per handle and frame
    ///
    /// Transient textures are created through the renderer and cleared if
    /// their descriptor asks for it.
    pub(crate) fn realize(
        &mut self,
        handle: TextureHandle,
        renderer: &mut dyn Renderer,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        if self.phase != GraphPhase::Executing {
            engine_bail!(ResourceNotReady; "galaxy3d::TextureRegistry",
                "Textures can only be allocated while executing (phase {:?})", self.phase);
        }
        let frame = self.frame;
        let entry = match self.textures.get_mut(handle.key) {
            Some(entry) if handle.frame == frame => entry,
            _ => engine_bail!(InvalidResource; "galaxy3d::TextureRegistry",
                "Texture handle from frame {} is not valid in frame {}", handle.frame, frame),
        };
        if entry.resource.is_some() {
            return Ok(());
        }

        if let Some(texture) = &entry.imported {
            entry.resource = Some(texture.clone());
            return Ok(());
        }

        let texture = renderer.create_texture(entry.desc.to_texture_desc())?;
        if entry.desc.clear_buffer {
            cmd.clear_texture(&texture, entry.desc.clear_color)?;
        }
        entry.resource = Some(texture);
        self.allocated += 1;
        Ok(())
    }

    /// Drop every texture of the frame and return to Idle
    ///
    /// Returns the number of transient GPU textures released.
    pub(crate) fn end_frame(&mut self) -> u32 {
        let released = self.textures
            .values()
            .filter(|entry| entry.imported.is_none() && entry.resource.is_some())
            .count() as u32;
        self.textures.clear();
        self.phase = GraphPhase::Idle;
        self.released = released;
        released
    }

    // ===== INTERNAL =====

    fn entry(&self, handle: TextureHandle) -> Result<&TextureEntry> {
        if handle.frame != self.frame {
            engine_bail!(InvalidResource; "galaxy3d::TextureRegistry",
                "Texture handle from frame {} is not valid in frame {}", handle.frame, self.frame);
        }
        match self.textures.get(handle.key) {
            Some(entry) => Ok(entry),
            None => engine_bail!(InvalidResource; "galaxy3d::TextureRegistry",
                "Texture handle does not exist in frame {}", self.frame),
        }
    }

    fn check_building(&self, name: &str) -> Result<()> {
        if self.phase != GraphPhase::Building {
            engine_bail!(ResourceNotReady; "galaxy3d::TextureRegistry",
                "Texture '{}' registered during {:?} phase", name, self.phase);
        }
        Ok(())
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "texture_registry_tests.rs"]
mod tests;
