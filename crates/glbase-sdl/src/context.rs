//! GL context creation and context attributes.

use crate::ContextError;
use sdl2::VideoSubsystem;
use sdl2::video::{GLContext, SwapInterval, Window};

/// Owns the SDL GL context for a window.
///
/// Creating it loads the GL function pointers; the context must outlive
/// every GL call made through the wrappers.
pub struct GlWindowContext {
    _gl_context: GLContext,
}

impl GlWindowContext {
    /// Create a GL context for the window and load the function pointers.
    pub fn create(window: &Window, video: &VideoSubsystem) -> Result<Self, ContextError> {
        let gl_context = window.gl_create_context().map_err(ContextError::Sdl)?;
        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);
        tracing::debug!("GL context created, function pointers loaded");
        Ok(Self {
            _gl_context: gl_context,
        })
    }
}

/// Toggle vertical sync via the swap interval.
pub fn set_vsync(video: &VideoSubsystem, enabled: bool) -> Result<(), ContextError> {
    let interval = if enabled {
        SwapInterval::VSync
    } else {
        SwapInterval::Immediate
    };
    video.gl_set_swap_interval(interval).map_err(ContextError::Sdl)
}

/// Request a GL context version for windows created after this call.
pub fn set_context_version(video: &VideoSubsystem, major: u8, minor: u8) {
    let attr = video.gl_attr();
    attr.set_context_major_version(major);
    attr.set_context_minor_version(minor);
}
