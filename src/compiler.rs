// compiler.rs - External mesh compiler
//
// The mesh build is a capability: anything that turns a script into a mesh
// file. OpenScad shells out and blocks until the process exits.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::CompileError;

/// Turns a solid-modeling script into a mesh file
pub trait MeshCompiler: Sync {
    /// Compile `script` into `mesh`, returning the mesh path on success
    fn compile(&self, script: &Path, mesh: &Path) -> Result<PathBuf, CompileError>;
}

/// OpenSCAD command-line compiler
#[derive(Clone, Debug)]
pub struct OpenScad {
    program: String,
}

impl OpenScad {
    pub const DEFAULT_PROGRAM: &'static str = "openscad";

    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for OpenScad {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl MeshCompiler for OpenScad {
    fn compile(&self, script: &Path, mesh: &Path) -> Result<PathBuf, CompileError> {
        debug!("{} {} -o {}", self.program, script.display(), mesh.display());

        let output = Command::new(&self.program)
            .arg(script)
            .arg("-o")
            .arg(mesh)
            .output()
            .map_err(|source| CompileError::Spawn { program: self.program.clone(), source })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !mesh.is_file() {
            return Err(CompileError::MissingOutput(mesh.to_path_buf()));
        }
        Ok(mesh.to_path_buf())
    }
}
