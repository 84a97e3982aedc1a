/*!
# Galaxy 3D Wave Effect

Full-screen wave distortion post effect for the Galaxy 3D renderer.

The crate does not talk to a GPU API itself: it consumes one through the
`Renderer` / `CommandList` traits, and ships a headless mock backend used by
its tests.

## Architecture

- **TextureRegistry**: per-frame logical textures behind generation-checked handles,
  allocated only when a scheduled pass consumes them
- **RenderGraph**: passes declaring reads/writes, ordered by insertion point, culled,
  executed, and discarded at the end of the frame
- **ParameterStack**: override volumes resolved field by field into the frame's
  `EffectParameterSet`
- **MaterialManager**: lazy creation and single disposal of the effect material
- **WavePostEffectPass**: full-screen draw into an intermediate target + copy-back
- **WaveEffectFeature**: per-camera, per-frame orchestration

## Frame

```ignore
graph.begin_frame();
let camera_color = graph.import_texture("CameraColor", camera_texture)?;
let frame = FrameResources::new(camera, camera_color);
feature.add_render_passes(&mut graph, &mut renderer, &frame)?;
graph.execute(&mut renderer, &mut cmd)?;
```
*/

// Internal modules
mod error;
pub mod log;
pub mod settings;
pub mod camera;
pub mod renderer;
pub mod render_graph;
pub mod effect;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::settings::{WaveEffectSettings, CameraTypes, DisabledPolicy};

    // Host frame context
    pub use crate::camera::{CameraType, CameraData, FrameResources};

    // Effect entry point
    pub use crate::effect::WaveEffectFeature;

    // Logging sub-module (types and slot functions; engine_* macros stay at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Render sub-module with the GPU abstraction and the mock backend
    pub mod render {
        pub use crate::renderer::*;
        pub use crate::renderer::mock_renderer::{
            MockRenderer, MockTexture, MockBuffer, MockShader, MockCommandList,
        };
    }

    // Render graph sub-module
    pub mod graph {
        pub use crate::render_graph::*;
    }

    // Effect sub-module
    pub mod effect {
        pub use crate::effect::*;
    }
}

// Re-export math library at crate root
pub use glam;
