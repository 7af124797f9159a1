//! Error reporting.

use std::path;

use crate::program::Stage;

/// Crate result type.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors surfaced by resource construction.
///
/// Every variant is fatal for the resource being built; there is no
/// internal retry. Precondition violations such as out-of-range buffer
/// writes or out-of-bounds pixel access panic instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The window surface or its GL context could not be created.
    #[error("window creation failed: {0}")]
    Window(String),

    /// A shader stage failed to compile.
    ///
    /// `log` holds the driver's diagnostic text verbatim.
    #[error("{stage} shader compilation failed:\n{log}")]
    Compile {
        /// Which stage failed.
        stage: Stage,

        /// The driver info log.
        log: String,
    },

    /// The program failed to link.
    #[error("program linking failed:\n{log}")]
    Link {
        /// The driver info log.
        log: String,
    },

    /// A uniform/attribute name was never declared to the program.
    #[error("shader variable `{0}` was not declared to the program")]
    UnknownVariable(String),

    /// An image file could not be decoded.
    #[error("failed to decode image `{}`: {source}", path.display())]
    Decode {
        /// The path that failed to load.
        path: path::PathBuf,

        /// The decoder's error.
        source: image::ImageError,
    },
}
