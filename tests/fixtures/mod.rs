//! Project tree fixtures for integration tests
//!
//! Builds throwaway project directories containing grading.yml and
//! submit.yml files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file below the project root, creating parent directories
    pub fn file(self, relative: &str, contents: &str) -> Self {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().expect("fixture path has a parent"))
            .expect("create fixture dirs");
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    pub fn grading(self, dir: &str, contents: &str) -> Self {
        let relative = if dir.is_empty() {
            "grading.yml".to_string()
        } else {
            format!("{}/grading.yml", dir)
        };
        self.file(&relative, contents)
    }

    pub fn submit(self, dir: &str, name: &str) -> Self {
        self.file(&format!("{}/submit.yml", dir), &format!("name: {}\n", name))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// A root configuration exercising every section
pub const ROOT_GRADING: &str = "\
templates:
  exercise: &exercise
    type: points
    max: 10
grades:
  midterm:
    type: points
  final:
    type: pass
  homework:
    <<: *exercise
  bonus: {}
calculation:
  total:
    midterm: 0.4
    final: 0.4
    homework: 0.2
";
