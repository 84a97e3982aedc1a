/// Pass declaration and recording contexts.
///
/// A pass is declared through a `PassBuilder`, a scoped declaration context
/// that registers the pass into its graph when it goes out of scope. A pass
/// records through a `PassContext`, which only hands out the textures the
/// pass declared.

use std::sync::Arc;
use bitflags::bitflags;
use crate::error::{Error, Result};
use crate::{engine_bail, engine_err, engine_warn};
use crate::renderer::{CommandList, Texture};
use super::render_graph::RenderGraph;
use super::texture_registry::{GraphPhase, TextureHandle, TextureRegistry};

// ===== INSERTION POINTS =====

/// Pipeline insertion point of a pass
///
/// Passes execute ordered by event, then by the order they were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPassEvent {
    BeforeRendering,
    AfterRenderingOpaques,
    AfterRenderingTransparents,
    BeforeRenderingPostProcessing,
    /// After tone mapping and color grading
    AfterRenderingPostProcessing,
    AfterRendering,
}

bitflags! {
    /// How a pass accesses a texture
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// One declared texture access of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureAccess {
    pub handle: TextureHandle,
    pub access: AccessFlags,
}

/// Recording callback of a raster pass
pub type RenderFunc = Box<dyn FnOnce(&mut PassContext<'_>) -> Result<()> + Send>;

pub(crate) enum PassKind {
    Raster(RenderFunc),
    Copy { src: TextureHandle, dst: TextureHandle },
}

/// A fully declared pass, owned by the graph until it executes
pub(crate) struct PassNode {
    pub name: String,
    pub event: RenderPassEvent,
    /// Render attachment (slot 0)
    pub attachment: Option<TextureAccess>,
    /// Sampled / copied textures
    pub textures: Vec<TextureAccess>,
    pub allow_culling: bool,
    pub kind: PassKind,
}

impl PassNode {
    /// Every declared access, attachment first
    pub fn accesses(&self) -> impl Iterator<Item = &TextureAccess> {
        self.attachment.iter().chain(self.textures.iter())
    }

    pub fn reads(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.accesses()
            .filter(|a| a.access.contains(AccessFlags::READ))
            .map(|a| a.handle)
    }

    pub fn writes(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.accesses()
            .filter(|a| a.access.contains(AccessFlags::WRITE))
            .map(|a| a.handle)
    }
}

// ===== PASS BUILDER =====

/// Scoped declaration context of one raster pass
///
/// Obtained from `RenderGraph::add_raster_pass()`. The pass is registered
/// when the builder is dropped. A builder whose declaration failed, or that
/// never received a render function, registers nothing.
///
/// # Example
///
/// ```ignore
/// {
///     let mut builder = graph.add_raster_pass("Tint", RenderPassEvent::AfterRendering);
///     builder.set_render_attachment(output, 0, AccessFlags::WRITE)?;
///     builder.use_texture(source, AccessFlags::READ)?;
///     builder.set_render_func(move |ctx| ctx.cmd().draw(3, 0));
/// } // registered here
/// ```
pub struct PassBuilder<'a> {
    graph: &'a mut RenderGraph,
    name: String,
    event: RenderPassEvent,
    attachment: Option<TextureAccess>,
    textures: Vec<TextureAccess>,
    allow_culling: bool,
    render_func: Option<RenderFunc>,
    error: Option<Error>,
}

impl<'a> PassBuilder<'a> {
    pub(crate) fn new(graph: &'a mut RenderGraph, name: &str, event: RenderPassEvent) -> Self {
        let error = if graph.phase() != GraphPhase::Building {
            Some(engine_err!(ResourceNotReady; "galaxy3d::RenderGraph",
                "Pass '{}' added during {:?} phase", name, graph.phase()))
        } else {
            None
        };
        Self {
            graph,
            name: name.to_string(),
            event,
            attachment: None,
            textures: Vec::new(),
            allow_culling: true,
            render_func: None,
            error,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the texture the pass renders to
    ///
    /// # Errors
    ///
    /// - `InvalidResource` for an unknown handle, an index other than 0, an
    ///   empty access, or a texture the pass already samples
    /// - `DuplicateWrite` if slot 0 is already declared with write access
    pub fn set_render_attachment(
        &mut self,
        handle: TextureHandle,
        index: u32,
        access: AccessFlags,
    ) -> Result<()> {
        let result = self.try_set_render_attachment(handle, index, access);
        self.record(result)
    }

    /// Declare a texture the pass samples (READ) or otherwise touches
    ///
    /// # Errors
    ///
    /// - `InvalidResource` for an unknown handle, an empty access, or the
    ///   pass's own render attachment
    /// - `DuplicateWrite` if the texture is already declared with write access
    pub fn use_texture(&mut self, handle: TextureHandle, access: AccessFlags) -> Result<()> {
        let result = self.try_use_texture(handle, access);
        self.record(result)
    }

    /// Allow the graph to cull the pass when nothing consumes its output (default true)
    pub fn allow_culling(&mut self, allow: bool) {
        self.allow_culling = allow;
    }

    /// Set the recording callback
    pub fn set_render_func<F>(&mut self, func: F)
    where
        F: FnOnce(&mut PassContext<'_>) -> Result<()> + Send + 'static,
    {
        self.render_func = Some(Box::new(func));
    }

    /// Error of the first failed declaration, if any
    pub fn status(&self) -> Result<()> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    /// Mark the declaration as failed; the pass will be discarded
    pub(crate) fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    // ===== INTERNAL =====

    fn try_set_render_attachment(
        &mut self,
        handle: TextureHandle,
        index: u32,
        access: AccessFlags,
    ) -> Result<()> {
        self.check_usable(handle, access)?;
        if index != 0 {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Pass '{}': attachment index {} out of range (single render target)", self.name, index);
        }
        if self.textures.iter().any(|t| t.handle == handle) {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Pass '{}' cannot render to a texture it samples", self.name);
        }

        if let Some(existing) = self.attachment {
            if (existing.access | access).contains(AccessFlags::WRITE) {
                engine_bail!(DuplicateWrite; "galaxy3d::RenderGraph",
                    "Pass '{}': attachment slot 0 declared twice with write access", self.name);
            }
            if existing.handle != handle {
                engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                    "Pass '{}': attachment slot 0 already bound to another texture", self.name);
            }
            return Ok(());
        }
        self.attachment = Some(TextureAccess { handle, access });
        Ok(())
    }

    fn try_use_texture(&mut self, handle: TextureHandle, access: AccessFlags) -> Result<()> {
        self.check_usable(handle, access)?;
        if self.attachment.is_some_and(|a| a.handle == handle) {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Pass '{}' cannot sample its own render attachment", self.name);
        }

        match self.textures.iter_mut().find(|t| t.handle == handle) {
            Some(existing) => {
                if existing.access.contains(AccessFlags::WRITE) && access.contains(AccessFlags::WRITE) {
                    engine_bail!(DuplicateWrite; "galaxy3d::RenderGraph",
                        "Pass '{}': texture '{}' declared twice with write access",
                        self.name, self.graph.registry().descriptor(handle)?.name);
                }
                existing.access |= access;
            }
            None => self.textures.push(TextureAccess { handle, access }),
        }
        Ok(())
    }

    fn check_usable(&self, handle: TextureHandle, access: AccessFlags) -> Result<()> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if access.is_empty() {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Pass '{}' declared a texture with no access", self.name);
        }
        self.graph.registry().descriptor(handle)?;
        Ok(())
    }

    fn record(&mut self, result: Result<()>) -> Result<()> {
        if let Err(error) = &result {
            self.fail(error.clone());
        }
        result
    }
}

impl Drop for PassBuilder<'_> {
    fn drop(&mut self) {
        if let Some(error) = self.error.take() {
            engine_warn!("galaxy3d::RenderGraph",
                "Pass '{}' discarded: {}", self.name, error);
            return;
        }
        let Some(func) = self.render_func.take() else {
            engine_warn!("galaxy3d::RenderGraph",
                "Pass '{}' discarded: no render function", self.name);
            return;
        };

        let node = PassNode {
            name: std::mem::take(&mut self.name),
            event: self.event,
            attachment: self.attachment.take(),
            textures: std::mem::take(&mut self.textures),
            allow_culling: self.allow_culling,
            kind: PassKind::Raster(func),
        };
        self.graph.push_pass(node);
    }
}

// ===== PASS CONTEXT =====

/// Recording context handed to a pass's render function
///
/// Every declared texture is already backed by a GPU texture.
pub struct PassContext<'a> {
    pass_name: &'a str,
    registry: &'a TextureRegistry,
    attachment: Option<TextureAccess>,
    textures: &'a [TextureAccess],
    cmd: &'a mut dyn CommandList,
}

impl<'a> PassContext<'a> {
    pub(crate) fn new(
        pass_name: &'a str,
        registry: &'a TextureRegistry,
        attachment: Option<TextureAccess>,
        textures: &'a [TextureAccess],
        cmd: &'a mut dyn CommandList,
    ) -> Self {
        Self { pass_name, registry, attachment, textures, cmd }
    }

    pub fn pass_name(&self) -> &str {
        self.pass_name
    }

    /// GPU texture behind a handle this pass declared
    ///
    /// # Errors
    ///
    /// `UndeclaredResourceAccess` if the pass never declared the handle.
    pub fn texture(&self, handle: TextureHandle) -> Result<Arc<dyn Texture>> {
        let declared = self.attachment.is_some_and(|a| a.handle == handle)
            || self.textures.iter().any(|t| t.handle == handle);
        if !declared {
            let name = self.registry
                .descriptor(handle)
                .map(|desc| desc.name.clone())
                .unwrap_or_else(|_| "<invalid>".to_string());
            engine_bail!(UndeclaredResourceAccess; "galaxy3d::RenderGraph",
                "Pass '{}' accessed undeclared texture '{}'", self.pass_name, name);
        }
        self.registry.resolve(handle)
    }

    /// GPU texture bound to attachment slot 0
    pub fn render_target(&self) -> Result<Arc<dyn Texture>> {
        match self.attachment {
            Some(attachment) => self.registry.resolve(attachment.handle),
            None => engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Pass '{}' has no render attachment", self.pass_name),
        }
    }

    /// Command list the pass records into
    pub fn cmd(&mut self) -> &mut dyn CommandList {
        &mut *self.cmd
    }
}
