//! Filesystem port used by the bundle loaders and report writer.

use std::path::{Path, PathBuf};

use super::PortError;

/// Read and write access to local files.
///
/// Bundle loading goes through this trait so tests can serve bundles from
/// memory instead of a directory tree.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes `contents` to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the names of regular files in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a readable directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError>;

    /// Lists files directly under `dir` whose extension is `ext`, sorted.
    ///
    /// A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed.
    fn files_with_extension(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>, PortError> {
        if !self.exists(dir) {
            return Ok(Vec::new());
        }
        let suffix = format!(".{ext}");
        Ok(self
            .list_dir(dir)?
            .into_iter()
            .filter(|name| name.ends_with(&suffix))
            .map(|name| dir.join(name))
            .collect())
    }
}
