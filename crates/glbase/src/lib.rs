//! Thin wrappers over OpenGL objects: buffers, vertex arrays, textures,
//! shader programs.
//!
//! Every operation forwards near 1:1 into the driver; the wrappers only keep
//! the bookkeeping the driver does not (object id, bind target, source file
//! timestamps for hot-reload).
//!
//! # Invariants
//! - An object id is valid only after successful creation.
//! - All calls assume a current OpenGL context on the calling thread.
//! - Objects are never deleted by the wrappers, except an old shader program
//!   replaced by a successful hot-reload.

pub mod buffer;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use buffer::{Buffer, buffer_data};
pub use shader::{Shader, Stage};
pub use texture::Texture;
pub use vertex_array::VertexArray;

use std::ffi::CStr;
use std::path::PathBuf;

/// Errors from GL wrapper operations.
#[derive(Debug, thiserror::Error)]
pub enum GlError {
    #[error("failed to read shader source {path:?}: {source}")]
    ShaderRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to stat shader source {path:?}: {source}")]
    ShaderStat {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: shader::Stage, log: String },
    #[error("failed to link shader program: {log}")]
    Link { log: String },
    #[error("failed to decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("unsupported stride, only 32-bit colors supported")]
    UnsupportedStride,
    #[error("texture not bound")]
    TextureNotBound,
}

/// Driver version string, from `glGetString(GL_VERSION)`.
///
/// Returns `None` when the driver reports nothing (typically no current
/// context).
pub fn version() -> Option<String> {
    let ptr = unsafe { gl::GetString(gl::VERSION) };
    if ptr.is_null() {
        return None;
    }
    let cstr = unsafe { CStr::from_ptr(ptr.cast()) };
    Some(cstr.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = GlError::ShaderRead {
            path: PathBuf::from("shaders/quad.vert"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("shaders/quad.vert"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn link_error_embeds_driver_log() {
        let err = GlError::Link {
            log: "error: undefined reference to main".into(),
        };
        assert!(err.to_string().contains("undefined reference"));
    }
}
