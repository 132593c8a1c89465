//! Input discovery and loaded source units.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TranslateError};

/// File extension of VM source units.
pub const VM_EXTENSION: &str = "vm";

/// File extension of the generated assembly.
pub const ASM_EXTENSION: &str = "asm";

/// What the single positional argument named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
}

/// Index of a unit in its [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub u32);

/// One `.vm` file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// File stem; prefix of this unit's static symbols.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// All units of a run, in translation order.
#[derive(Debug, Default)]
pub struct SourceMap {
    units: Vec<SourceUnit>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit; its name is the file stem, which must be unique.
    pub fn add(&mut self, path: PathBuf, content: String) -> Result<UnitId> {
        let name = unit_name(&path);
        if self.units.iter().any(|unit| unit.name == name) {
            return Err(TranslateError::DuplicateUnit(name));
        }
        let id = UnitId(self.units.len() as u32);
        self.units.push(SourceUnit {
            name,
            path,
            content,
        });
        Ok(id)
    }

    /// Read `path` from disk and add it.
    pub fn load(&mut self, path: PathBuf) -> Result<UnitId> {
        let content = fs::read_to_string(&path).map_err(|source| TranslateError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "loaded unit");
        self.add(path, content)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &SourceUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId(i as u32), unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// The unit name for a source path: its file stem.
pub fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_vm_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(VM_EXTENSION))
}

/// Classify `input` and list the `.vm` files it stands for, sorted by name.
pub fn discover(input: &Path) -> Result<(InputKind, Vec<PathBuf>)> {
    let io_error = |source| TranslateError::Io {
        path: input.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(input).map_err(io_error)?;

    if !metadata.is_dir() {
        if !has_vm_extension(input) {
            return Err(TranslateError::NotVmFile(input.to_path_buf()));
        }
        return Ok((InputKind::File, vec![input.to_path_buf()]));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && has_vm_extension(&path) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(TranslateError::NoVmFiles(input.to_path_buf()));
    }
    files.sort();
    Ok((InputKind::Directory, files))
}

/// Default output: `<stem>.asm` beside a file, `<dir>/<dir-name>.asm` for a
/// directory.
pub fn default_output(input: &Path, kind: InputKind) -> Result<PathBuf> {
    match kind {
        InputKind::File => Ok(input.with_extension(ASM_EXTENSION)),
        InputKind::Directory => {
            // `.` and `..` have no file name of their own
            let name = match input.file_name() {
                Some(name) => name.to_os_string(),
                None => fs::canonicalize(input)
                    .map_err(|source| TranslateError::Io {
                        path: input.to_path_buf(),
                        source,
                    })?
                    .file_name()
                    .map(|name| name.to_os_string())
                    .ok_or_else(|| TranslateError::NotVmFile(input.to_path_buf()))?,
            };
            Ok(input.join(format!("{}.{}", name.to_string_lossy(), ASM_EXTENSION)))
        }
    }
}
