//! Project tree access
//!
//! Discovers grading configurations and submit descriptors below a project
//! root, loads them as configuration trees, and produces root-relative
//! labels for reporting.

mod yaml;

pub use yaml::parse_document;

use grading_schema::Node;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::CheckerConfig;

/// Errors for loading project files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Error loading YAML file: {path}\n{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error loading YAML file: {path}\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Error walking project tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A project directory containing grading configurations
#[derive(Debug, Clone)]
pub struct ProjectTree {
    root: PathBuf,
    grading_file_name: String,
    submit_file_name: String,
    follow_links: bool,
    ignore_dirs: Vec<String>,
}

impl ProjectTree {
    /// Create a project tree rooted at `root`
    pub fn new(root: impl Into<PathBuf>, config: &CheckerConfig) -> Self {
        Self {
            root: root.into(),
            grading_file_name: config.grading_file_name.clone(),
            submit_file_name: config.submit_file_name.clone(),
            follow_links: config.follow_links,
            ignore_dirs: config.ignore_dirs.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn grading_file_name(&self) -> &str {
        &self.grading_file_name
    }

    pub fn submit_file_name(&self) -> &str {
        &self.submit_file_name
    }

    /// Path of the root grading configuration
    pub fn root_config_path(&self) -> PathBuf {
        self.root.join(&self.grading_file_name)
    }

    /// Whether `path` sits directly in the project root
    pub fn is_root_file(&self, path: &Path) -> bool {
        path.parent() == Some(self.root.as_path())
    }

    /// All grading configuration files, including the root one
    pub fn find_grading_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        self.find_named(&self.grading_file_name)
    }

    /// All submit descriptor files
    pub fn find_submit_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        self.find_named(&self.submit_file_name)
    }

    fn find_named(&self, file_name: &str) -> Result<Vec<PathBuf>, LoadError> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry));

        for entry in walker {
            let entry = entry?;
            // follow_links only governs descent; a symlinked file is always a candidate
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && entry.file_name() == file_name {
                found.push(entry.into_path());
            }
        }

        log::debug!(
            "found {} {} file(s) below {}",
            found.len(),
            file_name,
            self.root.display()
        );
        Ok(found)
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.ignore_dirs.iter().any(|d| d == name))
    }

    /// Load a YAML file as a configuration tree
    ///
    /// A missing file loads as an empty mapping.
    pub fn load_tree(&self, path: &Path) -> Result<Node, LoadError> {
        if !path.exists() {
            log::debug!("{} does not exist, using empty configuration", path.display());
            return Ok(Node::empty_mapping());
        }

        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        parse_document(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Human-readable path relative to the project root
    pub fn relative_label(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }
}
