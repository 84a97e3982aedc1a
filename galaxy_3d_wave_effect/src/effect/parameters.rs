/// Effect parameter set and overridable parameter values.

use glam::Vec2;

/// The effective tunables of the wave effect for one frame
///
/// `Default` is the global default: every scalar 0, offset zero, disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectParameterSet {
    /// Number of waves across the screen
    pub wave: f32,
    /// Wave scroll speed
    pub speed: f32,
    /// Distortion strength
    pub intensity: f32,
    /// UV offset of the wave pattern
    pub offset: Vec2,
    pub enabled: bool,
}

impl EffectParameterSet {
    /// Value of the `_NeedsEffect` uniform (1 when enabled)
    pub fn needs_effect(&self) -> i32 {
        if self.enabled { 1 } else { 0 }
    }
}

/// A volume parameter: a value plus its override state
///
/// Only overridden parameters take part in resolution; the value of a
/// parameter that is not overridden is kept but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overridable<T> {
    value: T,
    overridden: bool,
}

impl<T: Copy> Overridable<T> {
    /// A non-overridden parameter holding `value`
    pub fn new(value: T) -> Self {
        Self { value, overridden: false }
    }

    /// An overridden parameter holding `value`
    pub fn overriding(value: T) -> Self {
        Self { value, overridden: true }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// The value, if overridden
    pub fn get(&self) -> Option<T> {
        self.overridden.then_some(self.value)
    }

    /// Store `value` and mark the parameter overridden
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.overridden = true;
    }

    pub fn set_overridden(&mut self, overridden: bool) {
        self.overridden = overridden;
    }

    /// Stop overriding, keeping the stored value
    pub fn clear(&mut self) {
        self.overridden = false;
    }
}
