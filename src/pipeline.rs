//! Fixed-function pipeline state.

use crate::gl;

/// Color blending mode.
///
/// Setting a mode replaces the previous one wholesale; modes never
/// combine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Blend {
    /// No blending: source pixels overwrite the target.
    Default,

    /// Standard source-over blending on the source alpha.
    Alpha,

    /// Source-over blending for pre-multiplied source colors.
    PremultipliedAlpha,

    /// Additive blending.
    Additive,
}

impl Default for Blend {
    fn default() -> Self {
        Blend::Default
    }
}

impl Blend {
    /// Returns `(source factor, destination factor)` when blending is
    /// enabled, `None` to disable blending. The blend equation is
    /// always `GL_FUNC_ADD`.
    pub(crate) fn as_gl_enums_if_enabled(self) -> Option<(u32, u32)> {
        match self {
            Blend::Default => None,
            Blend::Alpha => Some((gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA)),
            Blend::PremultipliedAlpha => Some((gl::ONE, gl::ONE_MINUS_SRC_ALPHA)),
            Blend::Additive => Some((gl::ONE, gl::ONE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gl;
    use super::Blend;

    #[test]
    fn default_mode_disables_blending() {
        assert_eq!(None, Blend::Default.as_gl_enums_if_enabled());
        assert_eq!(Blend::Default, Blend::default());
    }

    #[test]
    fn enabled_modes_fix_their_factor_pairs() {
        assert_eq!(
            Some((gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA)),
            Blend::Alpha.as_gl_enums_if_enabled(),
        );
        assert_eq!(
            Some((gl::ONE, gl::ONE_MINUS_SRC_ALPHA)),
            Blend::PremultipliedAlpha.as_gl_enums_if_enabled(),
        );
        assert_eq!(
            Some((gl::ONE, gl::ONE)),
            Blend::Additive.as_gl_enums_if_enabled(),
        );
    }
}
