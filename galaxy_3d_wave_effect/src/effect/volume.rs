/// Parameter override volumes.
///
/// A volume holds its own overridable copy of every effect parameter, a
/// priority, a weight, and a shape deciding where in the world it applies.

use glam::{Vec2, Vec3};
use super::parameters::Overridable;

/// Where a volume applies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeShape {
    /// Everywhere
    Global,
    Sphere { center: Vec3, radius: f32 },
    Box { center: Vec3, half_extents: Vec3 },
}

impl VolumeShape {
    pub fn is_global(&self) -> bool {
        matches!(self, VolumeShape::Global)
    }

    /// Returns true if `point` lies inside the shape (boundary included)
    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            VolumeShape::Global => true,
            VolumeShape::Sphere { center, radius } => point.distance(center) <= radius,
            VolumeShape::Box { center, half_extents } => {
                let d = (point - center).abs();
                d.x <= half_extents.x && d.y <= half_extents.y && d.z <= half_extents.z
            }
        }
    }

    /// Distance from `point` to the shape's center (0 for global volumes)
    pub fn distance(&self, point: Vec3) -> f32 {
        match *self {
            VolumeShape::Global => 0.0,
            VolumeShape::Sphere { center, .. } | VolumeShape::Box { center, .. } => {
                point.distance(center)
            }
        }
    }
}

/// A prioritizable contributor of effect parameters
///
/// Owned by the scene/profile layer and registered into a `ParameterStack`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterOverrideVolume {
    name: String,
    priority: f32,
    weight: f32,
    active: bool,
    shape: VolumeShape,

    pub wave: Overridable<f32>,
    pub speed: Overridable<f32>,
    pub intensity: Overridable<f32>,
    pub offset: Overridable<Vec2>,
    pub enabled: Overridable<bool>,
}

impl ParameterOverrideVolume {
    /// Active global volume, priority 0, weight 1, no overrides
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            priority: 0.0,
            weight: 1.0,
            active: true,
            shape: VolumeShape::Global,
            wave: Overridable::new(0.0),
            speed: Overridable::new(0.0),
            intensity: Overridable::new(0.0),
            offset: Overridable::new(Vec2::ZERO),
            enabled: Overridable::new(false),
        }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_shape(mut self, shape: VolumeShape) -> Self {
        self.shape = shape;
        self
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    // ===== SETTERS =====

    pub fn set_priority(&mut self, priority: f32) {
        self.priority = priority;
    }

    /// Weights of 0 or less remove the volume's influence
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_shape(&mut self, shape: VolumeShape) {
        self.shape = shape;
    }

    // ===== OVERRIDES =====

    /// Returns true if the volume contributes at `point`
    pub fn influences(&self, point: Vec3) -> bool {
        self.active && self.weight > 0.0 && self.shape.contains(point)
    }

    /// Returns true if at least one parameter is overridden
    pub fn has_overrides(&self) -> bool {
        self.wave.is_overridden()
            || self.speed.is_overridden()
            || self.intensity.is_overridden()
            || self.offset.is_overridden()
            || self.enabled.is_overridden()
    }

    /// Stop overriding every parameter
    pub fn clear_overrides(&mut self) {
        self.wave.clear();
        self.speed.clear();
        self.intensity.clear();
        self.offset.clear();
        self.enabled.clear();
    }
}
