//! Texture wrapper: image decode, 2D upload, texture-unit binding.

use crate::GlError;
use gl::types::{GLenum, GLint, GLuint};
use image::RgbaImage;
use std::path::Path;

/// A texture object, its bind target, and the texture unit it is currently
/// bound to (`0` means "not bound").
#[derive(Debug)]
pub struct Texture {
    id: GLuint,
    target: GLenum,
    unit: GLenum,
}

impl Texture {
    /// Decode an image file (PNG or JPEG) and upload it as a 2D texture.
    ///
    /// The image is converted to tightly packed RGBA8 before upload; wrap
    /// modes apply to the R and S axes, filtering is always `GL_LINEAR` and
    /// mipmaps are generated. File and decode errors surface before any GL
    /// call is made.
    pub fn from_file(
        path: impl AsRef<Path>,
        wrap_r: GLint,
        wrap_s: GLint,
    ) -> Result<Self, GlError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| GlError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_rgba(img.to_rgba8(), wrap_r, wrap_s)
    }

    fn from_rgba(rgba: RgbaImage, wrap_r: GLint, wrap_s: GLint) -> Result<Self, GlError> {
        ensure_packed(&rgba)?;
        let (width, height) = rgba.dimensions();

        let mut texture = Self {
            id: gen_texture(),
            target: gl::TEXTURE_2D,
            unit: 0,
        };

        texture.bind(gl::TEXTURE0);
        unsafe {
            gl::TexParameteri(texture.target, gl::TEXTURE_WRAP_R, wrap_r);
            gl::TexParameteri(texture.target, gl::TEXTURE_WRAP_S, wrap_s);
            gl::TexParameteri(texture.target, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(texture.target, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);

            gl::TexImage2D(
                texture.target,
                0,
                gl::RGBA as GLint,
                width as GLint,
                height as GLint,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                rgba.as_raw().as_ptr().cast(),
            );
            gl::GenerateMipmap(texture.target);
        }
        texture.unbind();

        Ok(texture)
    }

    /// Allocate a blank 64x64x64 RGBA8 3D texture.
    ///
    /// Kept for volume experiments; nothing in the workspace uploads data
    /// into it yet.
    pub fn blank_3d(wrap_s: GLint, wrap_t: GLint, wrap_r: GLint) -> Self {
        const EDGE: GLint = 64;
        let data = vec![0u8; (EDGE * EDGE * EDGE * 4) as usize];

        let mut texture = Self {
            id: gen_texture(),
            target: gl::TEXTURE_3D,
            unit: 0,
        };

        texture.bind(gl::TEXTURE0);
        unsafe {
            gl::TexParameteri(texture.target, gl::TEXTURE_WRAP_S, wrap_s);
            gl::TexParameteri(texture.target, gl::TEXTURE_WRAP_T, wrap_t);
            gl::TexParameteri(texture.target, gl::TEXTURE_WRAP_R, wrap_r);
            gl::TexParameteri(texture.target, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(texture.target, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);

            gl::TexImage3D(
                texture.target,
                0,
                gl::RGBA8 as GLint,
                EDGE,
                EDGE,
                EDGE,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                data.as_ptr().cast(),
            );
        }
        texture.unbind();

        texture
    }

    /// Bind to the given texture unit (`gl::TEXTURE0 + i`).
    pub fn bind(&mut self, unit: GLenum) {
        unsafe {
            gl::ActiveTexture(unit);
            gl::BindTexture(self.target, self.id);
        }
        self.unit = unit;
    }

    /// Unbind from the current texture unit.
    pub fn unbind(&mut self) {
        self.unit = 0;
        unsafe {
            gl::BindTexture(self.target, 0);
        }
    }

    /// Whether the texture is currently bound to a texture unit.
    pub fn is_bound(&self) -> bool {
        self.unit != 0
    }

    /// Point a sampler uniform at the unit this texture is bound to.
    ///
    /// Errors if the texture is not bound.
    pub fn set_sampler_uniform(&self, location: GLint) -> Result<(), GlError> {
        if !self.is_bound() {
            return Err(GlError::TextureNotBound);
        }
        unsafe {
            gl::Uniform1i(location, (self.unit - gl::TEXTURE0) as GLint);
        }
        Ok(())
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> GLenum {
        self.target
    }
}

fn gen_texture() -> GLuint {
    let mut id = 0;
    unsafe {
        gl::GenTextures(1, &mut id);
    }
    id
}

/// Reject images whose pixel rows are not tightly packed RGBA8.
fn ensure_packed(rgba: &RgbaImage) -> Result<(), GlError> {
    let (width, height) = rgba.dimensions();
    if rgba.as_raw().len() != width as usize * height as usize * 4 {
        return Err(GlError::UnsupportedStride);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn packed_rgba_accepted() {
        let img = RgbaImage::new(8, 8);
        assert!(ensure_packed(&img).is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Texture::from_file("does-not-exist.png", 0, 0).unwrap_err();
        match err {
            GlError::Image { path, .. } => {
                assert_eq!(path, Path::new("does-not-exist.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"not a png at all").unwrap();

        let err = Texture::from_file(&path, 0, 0).unwrap_err();
        assert!(matches!(err, GlError::Image { .. }));
    }
}
