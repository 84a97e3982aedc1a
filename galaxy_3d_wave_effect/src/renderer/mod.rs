/// Renderer module - GPU abstraction consumed by the effect

// Module declarations
pub mod renderer;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod command_list;
pub mod mock_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use command_list::*;
