/// Resource context of the frame being built for one camera.

use crate::render_graph::TextureHandle;
use super::camera::CameraData;

/// What the host hands to the effect for one camera and one frame
///
/// `camera_color` is the camera color buffer, imported into the frame's
/// render graph by the host before the effect runs.
#[derive(Debug, Clone, Copy)]
pub struct FrameResources {
    pub camera: CameraData,
    pub camera_color: TextureHandle,
}

impl FrameResources {
    pub fn new(camera: CameraData, camera_color: TextureHandle) -> Self {
        Self { camera, camera_color }
    }
}
