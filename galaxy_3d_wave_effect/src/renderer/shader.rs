/// Shader trait

/// Compiled shader program resource
///
/// Implemented by backend-specific shader types. A shader exposes one or
/// more passes (techniques); full-screen effects use pass 0.
/// The shader is automatically destroyed when dropped.
pub trait Shader: Send + Sync {
    /// Identifier the shader was looked up with (e.g. "Hidden/WavePostEffectShader")
    fn name(&self) -> &str;

    /// Number of passes the program exposes
    fn pass_count(&self) -> u32;
}
