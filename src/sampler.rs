//! Texture sampling parameters.

use crate::gl;

/// Texture filtering mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Filter {
    /// Nearest texel.
    Nearest,

    /// Linear filter.
    Linear,

    /// Linear filter across the two nearest mip levels.
    LinearMipmapLinear,

    /// Nearest texel, linear across the two nearest mip levels.
    NearestMipmapLinear,
}

impl Filter {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Filter::Nearest => gl::NEAREST,
            Filter::Linear => gl::LINEAR,
            Filter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
            Filter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
        }
    }
}

/// Texture co-ordinate wrapping mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
    /// Co-ordinates outside `[0, 1]` sample the border color.
    ClampToBorder,

    /// Repeat.
    Repeat,
}

impl Wrap {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Wrap::ClampToBorder => gl::CLAMP_TO_BORDER,
            Wrap::Repeat => gl::REPEAT,
        }
    }
}

/// Sampling properties for a 2D texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler2 {
    /// Specifies the magnification filter.
    ///
    /// Default: `Nearest`.
    pub mag_filter: Filter,

    /// Specifies the minification filter.
    ///
    /// Default: `LinearMipmapLinear`.
    pub min_filter: Filter,

    /// Specifies the wrapping mode for the S axis.
    ///
    /// Default: `ClampToBorder`.
    pub wrap_s: Wrap,

    /// Specifies the wrapping mode for the T axis.
    ///
    /// Default: `ClampToBorder`.
    pub wrap_t: Wrap,
}

impl Default for Sampler2 {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Nearest,
            min_filter: Filter::LinearMipmapLinear,
            wrap_s: Wrap::ClampToBorder,
            wrap_t: Wrap::ClampToBorder,
        }
    }
}
