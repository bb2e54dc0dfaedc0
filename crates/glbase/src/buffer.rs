//! Buffer object wrapper: allocation, binding, typed data upload.

use gl::types::{GLenum, GLuint};

/// A GPU buffer object together with the target it binds to
/// (`GL_ARRAY_BUFFER`, `GL_ELEMENT_ARRAY_BUFFER`, ...).
#[derive(Debug)]
pub struct Buffer {
    id: GLuint,
    target: GLenum,
}

impl Buffer {
    /// Generate a buffer object for the given bind target.
    pub fn new(target: GLenum) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
        }
        Self { id, target }
    }

    /// Bind the buffer to its target.
    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(self.target, self.id);
        }
    }

    /// Unbind whatever buffer is bound to this buffer's target.
    pub fn unbind(&self) {
        unsafe {
            gl::BindBuffer(self.target, 0);
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> GLenum {
        self.target
    }
}

/// Upload a slice of plain-old-data elements to the buffer currently bound
/// to `target`.
pub fn buffer_data<T: bytemuck::Pod>(target: GLenum, data: &[T], usage: GLenum) {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    unsafe {
        gl::BufferData(
            target,
            bytes.len() as isize,
            bytes.as_ptr().cast(),
            usage,
        );
    }
}
