// error.rs - Error taxonomy for the scan -> model pipeline
//
// Input errors (decode), I/O errors (artifacts), compiler errors and
// configuration errors. Compiler failures get their own type so the
// MeshCompiler capability can report them without knowing about the rest.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting an image into a model.
#[derive(Debug, Error)]
pub enum Error {
    /// Image missing or not decodable.
    #[error("cannot read image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel array has a channel layout the surface generator cannot use.
    #[error("unsupported pixel layout: {0} channels")]
    Channels(usize),

    /// Reading or writing an artifact failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Decoded buffer does not match the image dimensions.
    #[error("pixel buffer shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Surface file could not be parsed back.
    #[error("malformed surface data at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Scale or slab parameter out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn invalid_parameter(details: impl Into<String>) -> Self {
        Self::InvalidParameter(details.into())
    }

    pub(crate) fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }
}

/// Errors reported by an external mesh compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The compiler ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The compiler reported success but left no mesh behind.
    #[error("compiler produced no mesh at {}", .0.display())]
    MissingOutput(PathBuf),
}
