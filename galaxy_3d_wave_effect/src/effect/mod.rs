//! Wave effect module
//!
//! Parameter resolution (override volumes and the parameter stack), the
//! effect material and its lifecycle, the full-screen post-effect pass,
//! and the feature that ties them together once per camera and frame.

mod parameters;
mod volume;
mod volume_stack;
mod material;
mod material_manager;
mod post_effect_pass;
mod wave_effect_feature;

pub use parameters::{EffectParameterSet, Overridable};
pub use volume::{ParameterOverrideVolume, VolumeShape};
pub use volume_stack::{ParameterStack, ParameterEdit, VolumeKey, LOCAL_VOLUME_NAME};
pub use material::{
    EffectMaterial, MaterialBinding, UniformId, UniformKind, UniformValue, WaveUniforms,
};
pub use material_manager::MaterialManager;
pub use post_effect_pass::{WavePostEffectPass, PassState, PassOutcome};
pub use wave_effect_feature::{WaveEffectFeature, FeatureOutcome};
