//! Vertex array object wrapper.

use gl::types::GLuint;

/// A vertex array object. Attribute layout setup stays with the caller.
#[derive(Debug)]
pub struct VertexArray {
    id: GLuint,
}

impl VertexArray {
    /// Generate a vertex array object.
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut id);
        }
        Self { id }
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindVertexArray(self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::BindVertexArray(0);
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}
