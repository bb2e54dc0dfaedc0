//! Shader program wrapper: compile + link from source files, scalar
//! uniforms, hot-reload on source modification.

use crate::GlError;
use gl::types::{GLenum, GLint, GLuint};
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Shader stage, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn gl_enum(self) -> GLenum {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "vertex"),
            Stage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Last-seen modification times of the two shader source files.
///
/// Comparison is by inequality, not ordering: a rollback to an older file is
/// still a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModStamps {
    vertex: SystemTime,
    fragment: SystemTime,
}

impl ModStamps {
    fn read(vertex: &Path, fragment: &Path) -> Result<Self, GlError> {
        Ok(Self {
            vertex: modified_time(vertex)?,
            fragment: modified_time(fragment)?,
        })
    }

    fn changed_since(&self, earlier: &ModStamps) -> bool {
        self.vertex != earlier.vertex || self.fragment != earlier.fragment
    }
}

fn modified_time(path: &Path) -> Result<SystemTime, GlError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| GlError::ShaderStat {
            path: path.to_path_buf(),
            source,
        })
}

/// A linked vertex + fragment program and the source files it came from.
///
/// The program id is replaced in place when [`Shader::reload_if_modified`]
/// detects a source change and the rebuild succeeds.
#[derive(Debug)]
pub struct Shader {
    program: GLuint,
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    stamps: ModStamps,
}

impl Shader {
    /// Compile and link a program from the two source files.
    pub fn new(
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, GlError> {
        let vertex_path = vertex_path.into();
        let fragment_path = fragment_path.into();

        // Stat before touching the driver: missing sources never reach GL.
        let stamps = ModStamps::read(&vertex_path, &fragment_path)?;
        let program = create_program(&vertex_path, &fragment_path)?;
        tracing::debug!(
            program,
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
            "shader program created"
        );

        Ok(Self {
            program,
            vertex_path,
            fragment_path,
            stamps,
        })
    }

    /// Make this program current.
    pub fn use_program(&self) {
        unsafe {
            gl::UseProgram(self.program);
        }
    }

    /// Location of a uniform in this program.
    ///
    /// A name with an interior NUL cannot cross the FFI boundary and yields
    /// `-1`, which GL ignores on uniform writes.
    pub fn uniform_location(&self, name: &str) -> GLint {
        let Some(cname) = uniform_name(name) else {
            return -1;
        };
        unsafe { gl::GetUniformLocation(self.program, cname.as_ptr()) }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        unsafe {
            gl::Uniform1f(self.uniform_location(name), value);
        }
    }

    pub fn set_int(&self, name: &str, value: i32) {
        unsafe {
            gl::Uniform1i(self.uniform_location(name), value);
        }
    }

    /// Rebuild the program if either source file's modification time changed.
    ///
    /// On a successful rebuild the old program is deleted and the new id
    /// substituted. On compile/link failure the previous program stays
    /// current and a warning is logged; the failure is reported once per
    /// save, not every frame. Stat failures are returned to the caller.
    pub fn reload_if_modified(&mut self) -> Result<(), GlError> {
        let current = ModStamps::read(&self.vertex_path, &self.fragment_path)?;
        if !current.changed_since(&self.stamps) {
            return Ok(());
        }
        self.stamps = current;

        match create_program(&self.vertex_path, &self.fragment_path) {
            Ok(program) => {
                unsafe {
                    gl::DeleteProgram(self.program);
                }
                self.program = program;
                tracing::info!(program, "shader program reloaded");
            }
            Err(e) => {
                tracing::warn!("shader reload failed, keeping previous program: {e}");
            }
        }
        Ok(())
    }

    pub fn id(&self) -> GLuint {
        self.program
    }
}

fn uniform_name(name: &str) -> Option<CString> {
    CString::new(name).ok()
}

fn create_program(vertex_path: &Path, fragment_path: &Path) -> Result<GLuint, GlError> {
    let vert = load_shader(vertex_path, Stage::Vertex)?;
    let frag = match load_shader(fragment_path, Stage::Fragment) {
        Ok(frag) => frag,
        Err(e) => {
            unsafe {
                gl::DeleteShader(vert);
            }
            return Err(e);
        }
    };

    unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vert);
        gl::AttachShader(program, frag);
        gl::LinkProgram(program);

        let mut success = 0;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);

        gl::DeleteShader(vert);
        gl::DeleteShader(frag);

        if success == gl::FALSE as GLint {
            let log = program_info_log(program);
            gl::DeleteProgram(program);
            return Err(GlError::Link { log });
        }
        Ok(program)
    }
}

fn load_shader(path: &Path, stage: Stage) -> Result<GLuint, GlError> {
    let source = fs::read_to_string(path).map_err(|source| GlError::ShaderRead {
        path: path.to_path_buf(),
        source,
    })?;
    compile_shader(&source, stage)
}

fn compile_shader(source: &str, stage: Stage) -> Result<GLuint, GlError> {
    let csource = CString::new(source).map_err(|_| GlError::Compile {
        stage,
        log: "shader source contains an interior NUL byte".into(),
    })?;

    unsafe {
        let shader = gl::CreateShader(stage.gl_enum());
        gl::ShaderSource(shader, 1, &csource.as_ptr(), std::ptr::null());
        gl::CompileShader(shader);

        let mut status = 0;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status == gl::FALSE as GLint {
            let log = shader_info_log(shader);
            gl::DeleteShader(shader);
            return Err(GlError::Compile { stage, log });
        }
        Ok(shader)
    }
}

fn shader_info_log(shader: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
    }
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    unsafe {
        gl::GetShaderInfoLog(shader, len, std::ptr::null_mut(), buf.as_mut_ptr().cast());
    }
    from_log_buffer(buf)
}

fn program_info_log(program: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
    }
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    unsafe {
        gl::GetProgramInfoLog(program, len, std::ptr::null_mut(), buf.as_mut_ptr().cast());
    }
    from_log_buffer(buf)
}

/// Driver info logs are NUL-terminated; cut at the first NUL and drop
/// trailing newlines.
fn from_log_buffer(buf: Vec<u8>) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn missing_source_is_a_stat_error() {
        let dir = tempfile::tempdir().unwrap();
        let frag = touch(dir.path(), "quad.frag", "void main() {}");
        let missing = dir.path().join("quad.vert");

        let err = Shader::new(&missing, &frag).unwrap_err();
        match err {
            GlError::ShaderStat { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stamps_equal_for_untouched_sources() {
        let dir = tempfile::tempdir().unwrap();
        let vert = touch(dir.path(), "a.vert", "void main() {}");
        let frag = touch(dir.path(), "a.frag", "void main() {}");

        let first = ModStamps::read(&vert, &frag).unwrap();
        let second = ModStamps::read(&vert, &frag).unwrap();
        assert!(!second.changed_since(&first));
    }

    #[test]
    fn newer_mtime_is_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let vert = touch(dir.path(), "a.vert", "void main() {}");
        let frag = touch(dir.path(), "a.frag", "void main() {}");

        let before = ModStamps::read(&vert, &frag).unwrap();
        set_mtime(&vert, SystemTime::now() + Duration::from_secs(5));
        let after = ModStamps::read(&vert, &frag).unwrap();
        assert!(after.changed_since(&before));
    }

    #[test]
    fn older_mtime_is_also_a_change() {
        // Rolling a file back to an earlier version must still trigger a
        // reload; comparison is by inequality, not ordering.
        let dir = tempfile::tempdir().unwrap();
        let vert = touch(dir.path(), "a.vert", "void main() {}");
        let frag = touch(dir.path(), "a.frag", "void main() {}");

        let before = ModStamps::read(&vert, &frag).unwrap();
        set_mtime(&frag, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
        let after = ModStamps::read(&vert, &frag).unwrap();
        assert!(after.changed_since(&before));
    }

    #[test]
    fn stage_names_for_error_messages() {
        assert_eq!(Stage::Vertex.to_string(), "vertex");
        assert_eq!(Stage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn uniform_name_rejects_interior_nul() {
        assert!(uniform_name("u_time").is_some());
        assert!(uniform_name("u_\0time").is_none());
    }

    #[test]
    fn log_buffer_cut_at_nul() {
        let log = from_log_buffer(b"0:1: error: syntax\n\0garbage".to_vec());
        assert_eq!(log, "0:1: error: syntax");
    }
}
