/// Camera description used to decide effect eligibility.
///
/// The host computes everything; the effect reads the kind of camera and
/// its world position (used to rank local override volumes).

use glam::Vec3;
use crate::settings::CameraTypes;

/// Kind of camera rendering the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraType {
    /// Primary game view
    Game,
    /// Editor scene view
    SceneView,
    /// Editor asset preview
    Preview,
    /// VR eye camera
    VR,
    /// Reflection probe capture
    Reflection,
}

impl CameraType {
    /// The `CameraTypes` flag matching this camera kind
    pub fn flag(&self) -> CameraTypes {
        match self {
            CameraType::Game => CameraTypes::GAME,
            CameraType::SceneView => CameraTypes::SCENE_VIEW,
            CameraType::Preview => CameraTypes::PREVIEW,
            CameraType::VR => CameraTypes::VR,
            CameraType::Reflection => CameraTypes::REFLECTION,
        }
    }
}

/// Camera data for one frame. A passive data container.
#[derive(Debug, Clone, Copy)]
pub struct CameraData {
    camera_type: CameraType,
    position: Vec3,
}

impl CameraData {
    /// Create camera data at the world origin
    pub fn new(camera_type: CameraType) -> Self {
        Self { camera_type, position: Vec3::ZERO }
    }

    /// Builder form: set the world position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    // ===== GETTERS =====

    pub fn camera_type(&self) -> CameraType {
        self.camera_type
    }

    /// World-space position, the point override volumes are evaluated at
    pub fn position(&self) -> Vec3 {
        self.position
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Returns true if this camera is part of `types`
    pub fn is_in(&self, types: CameraTypes) -> bool {
        types.contains(self.camera_type.flag())
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
