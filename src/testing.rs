//! Shared test doubles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::filesystem::FileSystem;
use crate::ports::{PortError, SimilarityScorer};

/// In-memory filesystem for exercising loaders without touching disk.
#[derive(Default)]
pub(crate) struct MemFs {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFs {
    pub(crate) fn with(files: &[(&str, &str)]) -> Self {
        let fs = Self::default();
        for (path, contents) in files {
            fs.write(Path::new(path), contents).unwrap();
        }
        fs
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let files = self.files.lock().unwrap();
        let mut names: Vec<String> = files
            .keys()
            .filter(|k| k.parent() == Some(path))
            .filter_map(|k| k.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Scorer returning canned scores, or failing when `scores` is `None`.
pub(crate) struct FixedScorer {
    pub(crate) scores: Option<Vec<f32>>,
}

impl SimilarityScorer for FixedScorer {
    fn score(&self, _query: &str, candidates: &[&str]) -> Result<Vec<f32>, PortError> {
        match &self.scores {
            Some(scores) => Ok(scores.iter().copied().take(candidates.len()).collect()),
            None => Err("scorer offline".into()),
        }
    }
}
