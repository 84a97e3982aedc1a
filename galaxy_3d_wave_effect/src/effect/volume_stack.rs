/// Parameter stack - resolves the effective parameter set of a frame.
///
/// The stack holds every registered override volume plus a built-in
/// "Local" volume that UI edits write into. Resolution is per field: for
/// each parameter, the highest-ranked influencing volume that overrides it
/// supplies the value, otherwise the global default applies.

use std::cmp::Ordering;
use glam::{Vec2, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use super::parameters::EffectParameterSet;
use super::volume::ParameterOverrideVolume;

/// Name of the built-in volume written by UI edits
pub const LOCAL_VOLUME_NAME: &str = "Local";

new_key_type! {
    /// Stable key of a volume registered in a ParameterStack
    pub struct VolumeKey;
}

// ===== EDITS =====

/// A single edit coming from the UI layer, applied to the local volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterEdit {
    Wave(f32),
    Speed(f32),
    Intensity(f32),
    Offset(Vec2),
    /// Horizontal offset slider (keeps the current Y)
    OffsetX(f32),
    /// Vertical offset slider (keeps the current X)
    OffsetY(f32),
    Enabled(bool),
    /// Drop every local override
    ClearOverrides,
}

impl ParameterEdit {
    /// Write the edit into a volume
    pub fn apply(self, volume: &mut ParameterOverrideVolume) {
        match self {
            ParameterEdit::Wave(value) => volume.wave.set(value),
            ParameterEdit::Speed(value) => volume.speed.set(value),
            ParameterEdit::Intensity(value) => volume.intensity.set(value),
            ParameterEdit::Offset(value) => volume.offset.set(value),
            ParameterEdit::OffsetX(x) => {
                let offset = volume.offset.value();
                volume.offset.set(Vec2::new(x, offset.y));
            }
            ParameterEdit::OffsetY(y) => {
                let offset = volume.offset.value();
                volume.offset.set(Vec2::new(offset.x, y));
            }
            ParameterEdit::Enabled(value) => volume.enabled.set(value),
            ParameterEdit::ClearOverrides => volume.clear_overrides(),
        }
    }
}

// ===== STACK =====

struct VolumeSlot {
    volume: ParameterOverrideVolume,
    /// Registration order (later wins ties)
    sequence: u64,
}

/// Ordered set of override volumes and the local UI volume
pub struct ParameterStack {
    volumes: SlotMap<VolumeKey, VolumeSlot>,
    local: VolumeKey,
    next_sequence: u64,
    pending: Vec<ParameterEdit>,
}

impl ParameterStack {
    /// Create a stack holding only the (empty) local volume
    pub fn new() -> Self {
        let mut volumes = SlotMap::with_key();
        let local = volumes.insert(VolumeSlot {
            volume: ParameterOverrideVolume::new(LOCAL_VOLUME_NAME).with_priority(f32::MAX),
            sequence: 0,
        });
        Self {
            volumes,
            local,
            next_sequence: 1,
            pending: Vec::new(),
        }
    }

    // ===== VOLUMES =====

    /// Register a volume
    pub fn add_volume(&mut self, volume: ParameterOverrideVolume) -> VolumeKey {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.volumes.insert(VolumeSlot { volume, sequence })
    }

    /// Unregister a volume and give it back
    ///
    /// # Errors
    ///
    /// `InvalidResource` for the local volume or an unknown key.
    pub fn remove_volume(&mut self, key: VolumeKey) -> Result<ParameterOverrideVolume> {
        if key == self.local {
            engine_bail!(InvalidResource; "galaxy3d::ParameterStack",
                "The local volume cannot be removed");
        }
        match self.volumes.remove(key) {
            Some(slot) => Ok(slot.volume),
            None => engine_bail!(InvalidResource; "galaxy3d::ParameterStack",
                "Volume key does not exist"),
        }
    }

    pub fn volume(&self, key: VolumeKey) -> Option<&ParameterOverrideVolume> {
        self.volumes.get(key).map(|slot| &slot.volume)
    }

    pub fn volume_mut(&mut self, key: VolumeKey) -> Option<&mut ParameterOverrideVolume> {
        self.volumes.get_mut(key).map(|slot| &mut slot.volume)
    }

    /// Number of volumes, the local volume included
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn local_key(&self) -> VolumeKey {
        self.local
    }

    /// The local volume written by UI edits
    pub fn local(&self) -> &ParameterOverrideVolume {
        &self.volumes[self.local].volume
    }

    /// Mutable access to the local volume
    ///
    /// Only its parameter fields matter: the local volume influences every
    /// point whatever its activity, weight or shape.
    pub fn local_mut(&mut self) -> &mut ParameterOverrideVolume {
        &mut self.volumes[self.local].volume
    }

    // ===== EDITS =====

    /// Apply an edit to the local volume immediately
    pub fn apply_edit(&mut self, edit: ParameterEdit) {
        edit.apply(self.local_mut());
    }

    /// Queue an edit; queued edits are applied by apply_edits()
    pub fn queue_edit(&mut self, edit: ParameterEdit) {
        self.pending.push(edit);
    }

    pub fn pending_edits(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued edits in order, returning how many were applied
    pub fn apply_edits(&mut self) -> usize {
        let edits = std::mem::take(&mut self.pending);
        let count = edits.len();
        for edit in edits {
            self.apply_edit(edit);
        }
        count
    }

    // ===== RESOLUTION =====

    /// Volumes influencing `point`, highest rank first
    ///
    /// The local volume always influences and ranks first. Then: higher
    /// priority first;
    /// on equal priority local shapes before global ones and the closer
    /// center first; on a full tie the later registered volume first.
    pub fn ranked_volumes(&self, point: Vec3) -> Vec<&ParameterOverrideVolume> {
        let mut slots: Vec<(VolumeKey, &VolumeSlot)> = self.volumes
            .iter()
            .filter(|(key, slot)| *key == self.local || slot.volume.influences(point))
            .collect();

        slots.sort_by(|(a_key, a), (b_key, b)| {
            let a_local = *a_key == self.local;
            let b_local = *b_key == self.local;
            b_local.cmp(&a_local)
                .then_with(|| b.volume.priority().total_cmp(&a.volume.priority()))
                .then_with(|| a.volume.shape().is_global().cmp(&b.volume.shape().is_global()))
                .then_with(|| {
                    a.volume.shape().distance(point)
                        .partial_cmp(&b.volume.shape().distance(point))
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| b.sequence.cmp(&a.sequence))
        });

        slots.into_iter().map(|(_, slot)| &slot.volume).collect()
    }

    /// Effective parameters at `point`
    ///
    /// Each field independently takes the value of the first ranked volume
    /// overriding it, or the default. Never fails; an empty stack yields
    /// `EffectParameterSet::default()`.
    pub fn resolve(&self, point: Vec3) -> EffectParameterSet {
        let ranked = self.ranked_volumes(point);
        let defaults = EffectParameterSet::default();

        EffectParameterSet {
            wave: ranked.iter().find_map(|v| v.wave.get()).unwrap_or(defaults.wave),
            speed: ranked.iter().find_map(|v| v.speed.get()).unwrap_or(defaults.speed),
            intensity: ranked.iter().find_map(|v| v.intensity.get()).unwrap_or(defaults.intensity),
            offset: ranked.iter().find_map(|v| v.offset.get()).unwrap_or(defaults.offset),
            enabled: ranked.iter().find_map(|v| v.enabled.get()).unwrap_or(defaults.enabled),
        }
    }
}

impl Default for ParameterStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "volume_stack_tests.rs"]
mod tests;
