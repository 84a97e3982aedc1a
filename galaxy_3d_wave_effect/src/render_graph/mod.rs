//! Render graph module
//!
//! Per-frame description of how the effect's frame is rendered: logical
//! textures declared through a registry, passes declaring what they read
//! and write, and an executor that allocates textures lazily, records the
//! passes in order and frees everything at the end of the frame.

mod texture_registry;
mod pass;
mod render_graph;

pub use texture_registry::{
    TextureRegistry, TextureDescriptor, TextureHandle, TextureKey, GraphPhase,
};
pub use pass::{
    RenderPassEvent, AccessFlags, TextureAccess, PassBuilder, PassContext, RenderFunc,
};
pub use render_graph::{RenderGraph, CompiledGraph, TextureLifetime, ExecutionStats};
