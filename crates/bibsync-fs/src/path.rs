//! Normalized path handling and work-tree containment

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Git tree lookups always use forward slashes, so relative paths inside a
/// work tree are stored in this form and converted to platform-native form
/// only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// A file that resolves inside a git work tree.
///
/// Holds both the canonical absolute location and the path relative to the
/// work-tree root (the form git uses to address blobs in a commit tree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTreeFile {
    absolute: PathBuf,
    relative: NormalizedPath,
}

impl WorkTreeFile {
    /// Resolve `file` against `work_tree`.
    ///
    /// Symlinks are resolved on both sides before comparison. The file itself
    /// does not have to exist yet, but its parent directory must.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutsideWorkTree`] when the resolved file escapes the
    /// work tree (or is the work-tree root itself).
    pub fn resolve(work_tree: &Path, file: &Path) -> Result<Self> {
        let root = dunce::canonicalize(work_tree).map_err(|e| Error::io(work_tree, e))?;
        let absolute = canonicalize_lenient(file)?;

        let relative = match absolute.strip_prefix(&root) {
            Ok(rel) if !rel.as_os_str().is_empty() => NormalizedPath::new(rel),
            _ => {
                return Err(Error::OutsideWorkTree {
                    path: file.to_path_buf(),
                    work_tree: root,
                });
            }
        };

        Ok(Self { absolute, relative })
    }

    /// Canonical absolute path of the file.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the work-tree root, forward-slash separated.
    pub fn relative(&self) -> &NormalizedPath {
        &self.relative
    }
}

/// Canonicalize a path that may not exist yet by canonicalizing its parent.
fn canonicalize_lenient(file: &Path) -> Result<PathBuf> {
    match dunce::canonicalize(file) {
        Ok(path) => Ok(path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let Some(name) = file.file_name() else {
                return Err(Error::io(file, err));
            };
            let parent = match file.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let parent = dunce::canonicalize(parent).map_err(|e| Error::io(parent, e))?;
            Ok(parent.join(name))
        }
        Err(err) => Err(Error::io(file, err)),
    }
}
