use crate::error::{PipeforgeError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub executable: bool,
    /// Replace files that already exist instead of skipping them.
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    Skipped,
}

/// Destination for rendered files. Paths are relative to the project root.
pub trait Materializer {
    fn write(&mut self, rel_path: &str, content: &str, opts: WriteOptions) -> Result<WriteOutcome>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Write `data` to `path` under the overwrite policy in `opts`.
///
/// An existing file is left alone unless `opts.overwrite` is set. A symlink
/// counts as existing even when dangling, and is replaced by a regular file on
/// overwrite so the write never lands outside the project. Parents are created
/// as needed and the content is written in full (not atomically). Failing to set
/// the executable bit is logged and otherwise ignored.
pub fn write_file(path: &Path, data: &[u8], opts: WriteOptions) -> Result<WriteOutcome> {
    let existing = path.symlink_metadata().ok();
    if existing.is_some() && !opts.overwrite {
        return Ok(WriteOutcome::Skipped);
    }
    let write_err = |source: std::io::Error| PipeforgeError::Write {
        path: path.to_path_buf(),
        source,
    };
    if existing.is_some_and(|meta| meta.file_type().is_symlink()) {
        std::fs::remove_file(path).map_err(write_err)?;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, data).map_err(write_err)?;
    if opts.executable {
        make_executable(path);
    }
    Ok(WriteOutcome::Written)
}

/// Add execute permission for owner, group and others. Returns whether it took effect.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let result = std::fs::metadata(path).and_then(|meta| {
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | 0o111);
        std::fs::set_permissions(path, perms)
    });
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::info!(path = %path.display(), error = %e, "could not mark file executable");
            false
        }
    }
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> bool {
    false
}

/// Writes under a fixed project root.
#[derive(Debug, Clone)]
pub struct FsMaterializer {
    root: PathBuf,
}

impl FsMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Materializer for FsMaterializer {
    fn write(&mut self, rel_path: &str, content: &str, opts: WriteOptions) -> Result<WriteOutcome> {
        write_file(&self.root.join(rel_path), content.as_bytes(), opts)
    }
}

/// Reports what [`FsMaterializer`] would do without touching the disk.
#[derive(Debug, Clone)]
pub struct DryRunMaterializer {
    root: PathBuf,
}

impl DryRunMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Materializer for DryRunMaterializer {
    fn write(&mut self, rel_path: &str, _content: &str, opts: WriteOptions) -> Result<WriteOutcome> {
        if self.root.join(rel_path).symlink_metadata().is_ok() && !opts.overwrite {
            Ok(WriteOutcome::Skipped)
        } else {
            Ok(WriteOutcome::Written)
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    pub content: String,
    pub executable: bool,
}

/// Keeps written files in a map. Used in tests and for previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryMaterializer {
    pub files: BTreeMap<String, MemoryFile>,
    fail_on: Option<String>,
}

impl MemoryMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a write error when `rel_path` is written.
    pub fn failing_on(rel_path: impl Into<String>) -> Self {
        Self {
            files: BTreeMap::new(),
            fail_on: Some(rel_path.into()),
        }
    }

    pub fn content(&self, rel_path: &str) -> Option<&str> {
        self.files.get(rel_path).map(|f| f.content.as_str())
    }
}

impl Materializer for MemoryMaterializer {
    fn write(&mut self, rel_path: &str, content: &str, opts: WriteOptions) -> Result<WriteOutcome> {
        if self.fail_on.as_deref() == Some(rel_path) {
            return Err(PipeforgeError::Write {
                path: PathBuf::from(rel_path),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        if self.files.contains_key(rel_path) && !opts.overwrite {
            return Ok(WriteOutcome::Skipped);
        }
        self.files.insert(
            rel_path.to_string(),
            MemoryFile {
                content: content.to_string(),
                executable: opts.executable,
            },
        );
        Ok(WriteOutcome::Written)
    }
}
