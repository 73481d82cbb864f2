use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{DedupError, Result};

/// Recursive lister for the upload tree.
///
/// Nothing is filtered by default: hidden files and `.gitignore`d paths are
/// listed like any other file.
pub struct Scanner {
    root: PathBuf,
    /// Directories pruned from the walk (e.g. the index living inside the tree).
    skipped_dirs: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skipped_dirs: Vec::new(),
        }
    }

    /// Prune `dir` and everything below it from the walk.
    #[must_use]
    pub fn skip_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.skipped_dirs
            .push(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));
        self
    }

    /// List every entry below the root as an absolute path, in lexical order
    /// per directory. Directories are included; the root itself is not.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let root =
            std::fs::canonicalize(&self.root).map_err(|e| DedupError::io(&self.root, e))?;
        let skipped = self.skipped_dirs.clone();

        let mut paths = Vec::new();
        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(false) // Prevent symlink loops
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |e| !skipped.iter().any(|dir| e.path() == dir))
            .build();
        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            paths.push(entry.into_path());
        }
        Ok(paths)
    }
}
