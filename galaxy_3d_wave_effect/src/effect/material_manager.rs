/// Material lifecycle - lazy creation, single disposal.

use crate::error::Result;
use crate::{engine_bail, engine_info};
use crate::renderer::Renderer;
use super::material::EffectMaterial;

enum MaterialState {
    Uncreated,
    Live(EffectMaterial),
    Disposed,
}

/// Owner of the feature's single EffectMaterial
///
/// The material is created from the shader on first use and released by
/// `dispose()`, exactly once. Any use after disposal is `UseAfterDispose`.
pub struct MaterialManager {
    shader_name: String,
    state: MaterialState,
}

impl MaterialManager {
    pub fn new(shader_name: &str) -> Self {
        Self {
            shader_name: shader_name.to_string(),
            state: MaterialState::Uncreated,
        }
    }

    pub fn shader_name(&self) -> &str {
        &self.shader_name
    }

    /// The material, created on the first call
    ///
    /// A failed creation leaves the manager uncreated, so the next call
    /// retries.
    ///
    /// # Errors
    ///
    /// - `UseAfterDispose` once disposed
    /// - shader lookup / buffer creation errors
    pub fn get_or_create(&mut self, renderer: &mut dyn Renderer) -> Result<&mut EffectMaterial> {
        match self.state {
            MaterialState::Disposed => {
                engine_bail!(UseAfterDispose; "galaxy3d::MaterialManager",
                    "Material '{}' used after dispose", self.shader_name);
            }
            MaterialState::Uncreated => {
                let material = EffectMaterial::new(renderer, &self.shader_name)?;
                engine_info!("galaxy3d::MaterialManager",
                    "Material '{}' created", self.shader_name);
                self.state = MaterialState::Live(material);
            }
            MaterialState::Live(_) => {}
        }

        match &mut self.state {
            MaterialState::Live(material) => Ok(material),
            _ => engine_bail!(InitializationFailed; "galaxy3d::MaterialManager",
                "Material '{}' is unavailable", self.shader_name),
        }
    }

    /// The material if it exists
    pub fn material(&self) -> Option<&EffectMaterial> {
        match &self.state {
            MaterialState::Live(material) => Some(material),
            _ => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.state, MaterialState::Live(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, MaterialState::Disposed)
    }

    /// Release the material's GPU resources
    ///
    /// Disposing a manager whose material was never created is allowed.
    ///
    /// # Errors
    ///
    /// `UseAfterDispose` on a second call; the state is left untouched.
    pub fn dispose(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, MaterialState::Disposed) {
            MaterialState::Live(material) => {
                drop(material);
                engine_info!("galaxy3d::MaterialManager",
                    "Material '{}' disposed", self.shader_name);
                Ok(())
            }
            MaterialState::Uncreated => Ok(()),
            MaterialState::Disposed => {
                engine_bail!(UseAfterDispose; "galaxy3d::MaterialManager",
                    "Material '{}' disposed twice", self.shader_name);
            }
        }
    }
}

#[cfg(test)]
#[path = "material_manager_tests.rs"]
mod tests;
