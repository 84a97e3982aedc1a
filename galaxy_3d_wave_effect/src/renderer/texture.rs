/// Texture trait, texture descriptor, and texture info

/// Texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R11G11B10_UFLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

impl TextureFormat {
    /// Number of depth bits carried by this format (0 for color formats)
    pub fn depth_bits(&self) -> u32 {
        match self {
            TextureFormat::D16_UNORM => 16,
            TextureFormat::D24_UNORM_S8_UINT => 24,
            TextureFormat::D32_FLOAT => 32,
            _ => 0,
        }
    }

    /// Returns true for depth or depth/stencil formats
    pub fn is_depth(&self) -> bool {
        self.depth_bits() > 0
    }
}

/// Texture usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Texture can be sampled in shaders
    Sampled,
    /// Texture can be used as render target
    RenderTarget,
    /// Texture can be used for both
    SampledAndRenderTarget,
    /// Texture can be used as depth/stencil attachment
    DepthStencil,
}

/// Multisample count of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MsaaSamples {
    /// Single sample (no MSAA)
    #[default]
    None,
    X2,
    X4,
    X8,
}

impl MsaaSamples {
    /// Samples per pixel
    pub fn count(&self) -> u32 {
        match self {
            MsaaSamples::None => 1,
            MsaaSamples::X2 => 2,
            MsaaSamples::X4 => 4,
            MsaaSamples::X8 => 8,
        }
    }
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a GPU texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug label
    pub label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Multisample count
    pub samples: MsaaSamples,
    /// Bits of the depth buffer attached to the texture (0 = none)
    pub depth_bits: u32,
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()` to query texture properties
/// without exposing backend-specific details.
#[derive(Debug, Clone)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Multisample count
    pub samples: MsaaSamples,
    /// Bits of the attached depth buffer (0 = none)
    pub depth_bits: u32,
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
/// The texture is automatically destroyed when dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Debug label given at creation
    fn label(&self) -> &str;
}
