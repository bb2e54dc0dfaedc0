//! SDL2 helpers for driving an OpenGL window: context creation and function
//! loading, swap interval, requested context version, FPS window titles.
//!
//! Kept separate from the GL object wrappers; nothing here touches GL state
//! beyond loading the function pointers.

pub mod context;
pub mod fps;

pub use context::{GlWindowContext, set_context_version, set_vsync};
pub use fps::FpsCounter;

/// Errors from SDL-side operations.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("window title contains an interior NUL byte: {0}")]
    Title(#[from] std::ffi::NulError),
}
