//! Camera module - per-frame camera context handed in by the host.
//!
//! Passive data containers: the host decides when a frame begins and
//! which cameras render. The effect only reads them.

mod camera;
mod frame_resources;

pub use camera::{CameraType, CameraData};
pub use frame_resources::FrameResources;
