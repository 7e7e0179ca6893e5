use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const COMPRESSED_SUFFIX: &str = ".json.gz";
const PLAIN_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to scan '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no json files found in {}", .0.display())]
    Empty(PathBuf),
}

/// A record container discovered under the catalog root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub is_compressed: bool,
}

impl FileEntry {
    /// Classify a path by suffix. Returns None for files that are not record containers.
    pub fn classify(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();

        let is_compressed = if name.ends_with(COMPRESSED_SUFFIX) {
            true
        } else if name.ends_with(PLAIN_SUFFIX) {
            false
        } else {
            return None;
        };

        Some(Self {
            path: path.to_path_buf(),
            is_compressed,
        })
    }
}

/// The ordered list of container files under a root directory
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
    files: Vec<FileEntry>,
}

impl FileCatalog {
    /// Walk `root` recursively and collect every `.json` and `.json.gz` file.
    ///
    /// Files are sorted by path so the delivery order does not depend on the
    /// platform's directory iteration order.
    pub fn build(root: &Path) -> Result<Self, CatalogError> {
        info!(root = %root.display(), "Scanning directory");

        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(root.to_path_buf()))
            }
            Err(e) => {
                return Err(CatalogError::Io {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
        };

        let mut files = Vec::new();
        if metadata.is_dir() {
            walk(root, &mut files)?;
        } else if let Some(entry) = FileEntry::classify(root) {
            // A single container file is accepted as its own catalog
            files.push(entry);
        }

        if files.is_empty() {
            return Err(CatalogError::Empty(root.to_path_buf()));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));

        info!(count = files.len(), "Found json files");

        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<FileEntry> {
        self.files
    }
}

fn walk(dir: &Path, files: &mut Vec<FileEntry>) -> Result<(), CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(io_err)?;

        // Symlinked directories are not descended into; symlinked files are
        // kept when they resolve to a regular file.
        let is_file = if file_type.is_symlink() {
            fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false)
        } else {
            file_type.is_file()
        };

        if file_type.is_dir() {
            walk(&path, files)?;
        } else if is_file {
            match FileEntry::classify(&path) {
                Some(file) => files.push(file),
                None => debug!(path = %path.display(), "Skipping non-json file"),
            }
        }
    }

    Ok(())
}
