/// Render graph - the passes and textures of one frame.
///
/// Passes declare which textures they read and write; the graph orders them
/// by insertion point and add order, culls passes whose output nobody
/// consumes, allocates transient textures right before their first use and
/// releases everything when the frame ends.
///
/// Frame lifecycle:
/// 1. `begin_frame()`
/// 2. `import_texture()` / `create_texture()` / `add_raster_pass()` / `add_pass()` / `add_copy_pass()`
/// 3. `execute()`

use std::sync::Arc;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::renderer::{CommandList, Renderer, Texture};
use super::pass::{
    AccessFlags, PassBuilder, PassContext, PassKind, PassNode, RenderPassEvent, TextureAccess,
};
use super::texture_registry::{GraphPhase, TextureDescriptor, TextureHandle, TextureRegistry};

// ===== COMPILED GRAPH =====

/// First and last use of a texture, as positions in the execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureLifetime {
    pub first_pass: usize,
    pub last_pass: usize,
}

/// Result of `RenderGraph::compile()`
#[derive(Debug, Clone, Default)]
pub struct CompiledGraph {
    order: Vec<usize>,
    names: Vec<String>,
    culled: Vec<String>,
    lifetimes: FxHashMap<TextureHandle, TextureLifetime>,
}

impl CompiledGraph {
    /// Names of the passes that will execute, in execution order
    pub fn execution_order(&self) -> &[String] {
        &self.names
    }

    /// Names of the culled passes, in add order
    pub fn culled_passes(&self) -> &[String] {
        &self.culled
    }

    /// Lifetime of a texture used by at least one executed pass
    pub fn lifetime(&self, handle: TextureHandle) -> Option<TextureLifetime> {
        self.lifetimes.get(&handle).copied()
    }
}

/// Statistics of one executed frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub passes_executed: u32,
    pub passes_culled: u32,
    pub textures_allocated: u32,
    pub textures_released: u32,
}

// ===== RENDER GRAPH =====

/// Per-frame pass graph and its texture registry
pub struct RenderGraph {
    registry: TextureRegistry,
    passes: Vec<PassNode>,
}

impl RenderGraph {
    /// Create an idle render graph
    pub fn new() -> Self {
        Self {
            registry: TextureRegistry::new(),
            passes: Vec::new(),
        }
    }

    /// Start building a new frame
    ///
    /// Passes left over from a frame that was never executed are dropped.
    /// Returns the new frame index.
    pub fn begin_frame(&mut self) -> u64 {
        if !self.passes.is_empty() {
            engine_debug!("galaxy3d::RenderGraph",
                "Dropping {} passes of an unexecuted frame", self.passes.len());
            self.passes.clear();
        }
        self.registry.begin_frame()
    }

    pub fn frame_index(&self) -> u64 {
        self.registry.frame_index()
    }

    pub fn phase(&self) -> GraphPhase {
        self.registry.phase()
    }

    /// Texture registry of the current frame
    pub fn registry(&self) -> &TextureRegistry {
        &self.registry
    }

    // ===== TEXTURES =====

    /// Register an externally owned texture for this frame
    pub fn import_texture(&mut self, name: &str, texture: Arc<dyn Texture>) -> Result<TextureHandle> {
        self.registry.import(name, texture)
    }

    /// Register a transient texture for this frame (allocated lazily)
    pub fn create_texture(&mut self, desc: TextureDescriptor) -> Result<TextureHandle> {
        self.registry.create(desc)
    }

    /// Descriptor of a texture of this frame
    pub fn texture_desc(&self, handle: TextureHandle) -> Result<&TextureDescriptor> {
        self.registry.descriptor(handle)
    }

    // ===== PASSES =====

    /// Start declaring a raster pass; it is registered when the builder drops
    pub fn add_raster_pass(&mut self, name: &str, event: RenderPassEvent) -> PassBuilder<'_> {
        PassBuilder::new(self, name, event)
    }

    /// Declare and register a raster pass in one call
    ///
    /// `declare` receives the pass builder; `record` becomes the pass's
    /// render function. If `declare` fails, nothing is registered and the
    /// error is returned.
    pub fn add_pass<D, R>(
        &mut self,
        name: &str,
        event: RenderPassEvent,
        declare: D,
        record: R,
    ) -> Result<()>
    where
        D: FnOnce(&mut PassBuilder<'_>) -> Result<()>,
        R: FnOnce(&mut PassContext<'_>) -> Result<()> + Send + 'static,
    {
        let mut builder = self.add_raster_pass(name, event);
        if let Err(error) = declare(&mut builder).and_then(|()| builder.status()) {
            builder.fail(error.clone());
            return Err(error);
        }
        builder.set_render_func(record);
        Ok(())
    }

    /// Register a pass copying `src` fully into `dst`
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if `src == dst` or the extents differ
    /// - `ResourceNotReady` outside the building phase
    pub fn add_copy_pass(
        &mut self,
        name: &str,
        src: TextureHandle,
        dst: TextureHandle,
        event: RenderPassEvent,
    ) -> Result<()> {
        if self.registry.phase() != GraphPhase::Building {
            engine_bail!(ResourceNotReady; "galaxy3d::RenderGraph",
                "Copy pass '{}' added during {:?} phase", name, self.registry.phase());
        }
        if src == dst {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Copy pass '{}' copies a texture onto itself", name);
        }
        let src_desc = self.registry.descriptor(src)?;
        let dst_desc = self.registry.descriptor(dst)?;
        if !src_desc.same_extent(dst_desc) {
            engine_bail!(InvalidResource; "galaxy3d::RenderGraph",
                "Copy pass '{}': extent mismatch {}x{} -> {}x{}",
                name, src_desc.width, src_desc.height, dst_desc.width, dst_desc.height);
        }

        self.push_pass(PassNode {
            name: name.to_string(),
            event,
            attachment: None,
            textures: vec![
                TextureAccess { handle: src, access: AccessFlags::READ },
                TextureAccess { handle: dst, access: AccessFlags::WRITE },
            ],
            allow_culling: true,
            kind: PassKind::Copy { src, dst },
        });
        Ok(())
    }

    /// Number of passes registered this frame
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Names of the registered passes, in add order
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name.as_str()).collect()
    }

    pub(crate) fn push_pass(&mut self, node: PassNode) {
        self.passes.push(node);
    }

    // ===== COMPILE =====

    /// Compute the execution order, the culled passes and texture lifetimes
    ///
    /// Order is stable by (event, add order). Walking that order backwards,
    /// a pass that allows culling is kept only if it writes an imported
    /// texture or a texture a later kept pass reads. Passes that write
    /// nothing are always kept.
    ///
    /// # Errors
    ///
    /// `ResourceNotReady` if a pass reads a transient texture whose writers
    /// were all added before it but are all scheduled after it.
    pub fn compile(&self) -> Result<CompiledGraph> {
        let mut sorted: Vec<usize> = (0..self.passes.len()).collect();
        sorted.sort_by_key(|&index| self.passes[index].event);
        self.check_read_after_write(&sorted)?;

        let mut needed: FxHashSet<TextureHandle> = FxHashSet::default();
        let mut kept = vec![false; self.passes.len()];
        for &index in sorted.iter().rev() {
            let pass = &self.passes[index];
            let mut writes = pass.writes().peekable();
            let keep = !pass.allow_culling
                || writes.peek().is_none()
                || writes.any(|handle| {
                    needed.contains(&handle) || self.registry.is_imported(handle).unwrap_or(false)
                });
            if keep {
                kept[index] = true;
                needed.extend(pass.reads());
            }
        }

        let order: Vec<usize> = sorted.into_iter().filter(|&index| kept[index]).collect();
        let mut lifetimes: FxHashMap<TextureHandle, TextureLifetime> = FxHashMap::default();
        for (position, &index) in order.iter().enumerate() {
            for access in self.passes[index].accesses() {
                lifetimes
                    .entry(access.handle)
                    .and_modify(|lifetime| lifetime.last_pass = position)
                    .or_insert(TextureLifetime { first_pass: position, last_pass: position });
            }
        }

        Ok(CompiledGraph {
            names: order.iter().map(|&index| self.passes[index].name.clone()).collect(),
            culled: (0..self.passes.len())
                .filter(|&index| !kept[index])
                .map(|index| self.passes[index].name.clone())
                .collect(),
            order,
            lifetimes,
        })
    }

    /// Reject reads that the event order would move ahead of their writer
    ///
    /// Only writers added before the reader count: a writer added later is
    /// not a dependency of the reader in add order.
    fn check_read_after_write(&self, sorted: &[usize]) -> Result<()> {
        let mut position = vec![0; self.passes.len()];
        for (rank, &index) in sorted.iter().enumerate() {
            position[index] = rank;
        }

        for (reader_index, reader) in self.passes.iter().enumerate() {
            for handle in reader.reads() {
                if self.registry.is_imported(handle)? {
                    continue;
                }
                let writers: Vec<usize> = (0..reader_index)
                    .filter(|&index| self.passes[index].writes().any(|written| written == handle))
                    .collect();
                let Some(&writer_index) = writers.first() else {
                    continue;
                };
                if writers.iter().all(|&index| position[index] > position[reader_index]) {
                    let writer = &self.passes[writer_index];
                    let texture = &self.registry.descriptor(handle)?.name;
                    engine_bail!(ResourceNotReady; "galaxy3d::RenderGraph",
                        "Pass '{}' ({:?}) reads '{}' before its writer '{}' ({:?}) runs",
                        reader.name, reader.event, texture, writer.name, writer.event);
                }
            }
        }
        Ok(())
    }

    // ===== EXECUTE =====

    /// Execute the frame
    ///
    /// Each scheduled pass gets its declared textures allocated (first use
    /// only), then records into `cmd`. Raster passes with an attachment are
    /// wrapped in begin/end render pass. The frame's passes and textures are
    /// discarded afterwards, also when a pass fails.
    ///
    /// # Errors
    ///
    /// `ResourceNotReady` if no frame is being built or `compile()` rejects
    /// the frame (nothing is recorded then); otherwise the first error
    /// raised by an allocation or a pass.
    pub fn execute(
        &mut self,
        renderer: &mut dyn Renderer,
        cmd: &mut dyn CommandList,
    ) -> Result<ExecutionStats> {
        if self.registry.phase() != GraphPhase::Building {
            engine_bail!(ResourceNotReady; "galaxy3d::RenderGraph",
                "execute() called during {:?} phase", self.registry.phase());
        }

        let compiled = match self.compile() {
            Ok(compiled) => compiled,
            Err(error) => {
                self.passes.clear();
                self.registry.end_frame();
                return Err(error);
            }
        };
        if !compiled.culled.is_empty() {
            engine_debug!("galaxy3d::RenderGraph",
                "Culled passes: {}", compiled.culled.join(", "));
        }

        let mut nodes: Vec<Option<PassNode>> = std::mem::take(&mut self.passes)
            .into_iter()
            .map(Some)
            .collect();

        self.registry.begin_execution();
        let mut result = Ok(());
        for &index in &compiled.order {
            let Some(node) = nodes[index].take() else {
                continue;
            };
            result = Self::execute_pass(&mut self.registry, node, renderer, cmd);
            if result.is_err() {
                break;
            }
        }

        let textures_allocated = self.registry.textures_allocated();
        let textures_released = self.registry.end_frame();
        result?;

        Ok(ExecutionStats {
            passes_executed: compiled.order.len() as u32,
            passes_culled: compiled.culled.len() as u32,
            textures_allocated,
            textures_released,
        })
    }

    fn execute_pass(
        registry: &mut TextureRegistry,
        node: PassNode,
        renderer: &mut dyn Renderer,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        for access in node.accesses() {
            registry.realize(access.handle, renderer, cmd)?;
        }
        let registry: &TextureRegistry = registry;

        match node.kind {
            PassKind::Copy { src, dst } => {
                let src = registry.resolve(src)?;
                let dst = registry.resolve(dst)?;
                cmd.copy_texture(&src, &dst)
            }
            PassKind::Raster(func) => {
                let target = match node.attachment {
                    Some(attachment) => Some(registry.resolve(attachment.handle)?),
                    None => None,
                };
                if let Some(target) = &target {
                    cmd.begin_render_pass(target, &node.name)?;
                }

                let recorded = {
                    let mut ctx = PassContext::new(
                        &node.name,
                        registry,
                        node.attachment,
                        &node.textures,
                        &mut *cmd,
                    );
                    func(&mut ctx)
                };

                if target.is_some() {
                    cmd.end_render_pass()?;
                }
                recorded
            }
        }
    }
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "render_graph_tests.rs"]
mod tests;
