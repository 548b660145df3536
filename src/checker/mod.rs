//! Validation run driver
//!
//! Runs the three phases against a project tree, in order:
//! 1. root `grading.yml`, validated on its own
//! 2. every other `grading.yml`, merged onto the root and validated
//! 3. duplicate `name` detection across all `submit.yml` files
//!
//! Structural violations stop the run under [`FailurePolicy::FailFast`].
//! Duplicate names are always collected exhaustively before failing.

use grading_schema::{
    merge_configs, validate_config, DuplicateName, Mapping, Node, SubmitNameIndex,
    ValidationError,
};
use serde::Serialize;
use std::path::Path;

use crate::project::{LoadError, ProjectTree};
use crate::report::Reporter;

/// How the driver reacts to a structural violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first invalid configuration
    #[default]
    FailFast,
    /// Report every invalid configuration, fail at the end
    KeepGoing,
}

/// Errors that end a validation run
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{label}: {source}")]
    Invalid {
        label: String,
        #[source]
        source: ValidationError,
    },

    #[error("{count} configuration(s) failed validation")]
    ViolationsFound { count: usize },

    #[error("duplicate submit names found: {}", names(.0))]
    DuplicateSubmitNames(Vec<DuplicateName>),
}

fn names(duplicates: &[DuplicateName]) -> String {
    duplicates
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckError {
    /// Whether the run failed on file content rather than on reading files
    pub fn is_violation(&self) -> bool {
        !matches!(self, CheckError::Load(_))
    }
}

/// Counts from a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Subdirectory configurations validated
    pub subdir_configs: usize,
    /// Submit descriptors checked for duplicate names
    pub submit_descriptors: usize,
    /// Configurations that failed validation (only non-zero with `KeepGoing`)
    pub invalid_configs: usize,
}

/// Validates a project tree and reports each result
pub struct GradingChecker<R: Reporter> {
    project: ProjectTree,
    reporter: R,
    policy: FailurePolicy,
    invalid_configs: usize,
}

impl<R: Reporter> GradingChecker<R> {
    pub fn new(project: ProjectTree, reporter: R, policy: FailurePolicy) -> Self {
        Self {
            project,
            reporter,
            policy,
            invalid_configs: 0,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run all phases
    pub fn run(&mut self) -> Result<RunSummary, CheckError> {
        let root = self.validate_root()?;
        let subdir_configs = self.validate_subdir_configs(&root)?;
        let submit_descriptors = self.validate_duplicate_submit_names()?;

        if self.invalid_configs > 0 {
            return Err(CheckError::ViolationsFound {
                count: self.invalid_configs,
            });
        }

        Ok(RunSummary {
            subdir_configs,
            submit_descriptors,
            invalid_configs: self.invalid_configs,
        })
    }

    /// Validate the root configuration and return it for merging.
    pub fn validate_root(&mut self) -> Result<Mapping, CheckError> {
        let path = self.project.root_config_path();
        let label = self.project.grading_file_name().to_string();
        let config = self.project.load_tree(&path)?;

        self.check(&config, &label)?;

        // An invalid root under KeepGoing still serves as the merge base.
        Ok(config.as_mapping().cloned().unwrap_or_default())
    }

    /// Validate every non-root configuration merged onto `root`.
    pub fn validate_subdir_configs(&mut self, root: &Mapping) -> Result<usize, CheckError> {
        let mut validated = 0;

        for path in self.project.find_grading_files()? {
            if self.project.is_root_file(&path) {
                continue;
            }

            let label = self.project.relative_label(&path);
            let effective = self.effective_config(root, &path)?;
            self.check(&effective, &label)?;
            validated += 1;
        }

        Ok(validated)
    }

    /// Check submit descriptors for names used more than once.
    ///
    /// Returns the number of descriptors checked.
    pub fn validate_duplicate_submit_names(&mut self) -> Result<usize, CheckError> {
        let mut index = SubmitNameIndex::new();

        for path in self.project.find_submit_files()? {
            let descriptor = self.project.load_tree(&path)?;
            let label = self.project.relative_label(&path);
            if !index.insert(label.as_str(), &descriptor) {
                log::debug!("{} has no name, skipping", label);
            }
        }

        let file_name = self.project.submit_file_name().to_string();
        let duplicates = index.duplicates();
        if duplicates.is_empty() {
            self.reporter.success(&format!(
                "no duplicate submit names found in {} {} configs",
                index.descriptors_checked(),
                file_name
            ));
            return Ok(index.descriptors_checked());
        }

        self.reporter.failure(&format!(
            "duplicate submit names found in {}:",
            file_name
        ));
        for duplicate in &duplicates {
            self.reporter.detail(&format!(
                "{} appears in: {}",
                duplicate.name,
                duplicate.locations.join(", ")
            ));
        }

        Err(CheckError::DuplicateSubmitNames(duplicates))
    }

    /// Effective configuration for a grading file.
    ///
    /// The root file is returned as loaded; any other file is merged onto
    /// the root configuration.
    pub fn explain(&self, path: &Path) -> Result<Node, CheckError> {
        let root = self.project.load_tree(&self.project.root_config_path())?;
        let root = root.as_mapping().cloned().unwrap_or_default();

        if self.project.is_root_file(path) {
            return Ok(Node::Mapping(root));
        }
        self.effective_config(&root, path)
    }

    fn effective_config(&self, root: &Mapping, path: &Path) -> Result<Node, CheckError> {
        let overlay = self.project.load_tree(path)?;

        // A non-mapping document is reported as-is instead of being merged.
        Ok(match overlay {
            Node::Mapping(overlay) => Node::Mapping(merge_configs(root, &overlay)),
            other => other,
        })
    }

    fn check(&mut self, config: &Node, label: &str) -> Result<(), CheckError> {
        match validate_config(config) {
            Ok(()) => {
                self.reporter.success(label);
                Ok(())
            }
            Err(source) => {
                log::debug!("{} failed with {}", label, source.code());
                self.reporter.failure(&format!("{}: {}", label, source));
                match self.policy {
                    FailurePolicy::FailFast => Err(CheckError::Invalid {
                        label: label.to_string(),
                        source,
                    }),
                    FailurePolicy::KeepGoing => {
                        self.invalid_configs += 1;
                        Ok(())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;
    use crate::report::{LineStatus, MemoryReporter};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn checker(dir: &TempDir, policy: FailurePolicy) -> GradingChecker<MemoryReporter> {
        let project = ProjectTree::new(dir.path(), &CheckerConfig::default());
        GradingChecker::new(project, MemoryReporter::new(), policy)
    }

    #[test]
    fn test_missing_root_config_is_valid() {
        let dir = TempDir::new().unwrap();
        let mut checker = checker(&dir, FailurePolicy::FailFast);

        let root = checker.validate_root().unwrap();
        assert!(root.is_empty());
        assert_eq!(checker.reporter().lines()[0].message, "grading.yml");
    }

    #[test]
    fn test_subdir_inherits_root_grades() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "grading.yml", "grades:\n  midterm:\n    type: points\n");
        write(dir.path(), "week1/grading.yml", "week1:\n  submits:\n    midterm: {}\n");

        let mut checker = checker(&dir, FailurePolicy::FailFast);
        let summary = checker.run().unwrap();

        assert_eq!(summary.subdir_configs, 1);
        let successes: Vec<_> = checker.reporter().successes().map(|l| l.message.clone()).collect();
        assert_eq!(successes[0], "grading.yml");
        assert_eq!(successes[1], "week1/grading.yml");
    }

    #[test]
    fn test_fail_fast_stops_at_first_invalid_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/grading.yml", "grades:\n  x:\n    type: string\n");
        write(dir.path(), "b/grading.yml", "calculation: []\n");

        let mut checker = checker(&dir, FailurePolicy::FailFast);
        let err = checker.run().unwrap_err();

        assert!(matches!(
            err,
            CheckError::Invalid { ref label, source: ValidationError::InvalidGradeType { .. } }
                if label == "a/grading.yml"
        ));
        assert_eq!(checker.reporter().failures().count(), 1);
    }

    #[test]
    fn test_keep_going_reports_every_invalid_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/grading.yml", "grades:\n  x:\n    type: string\n");
        write(dir.path(), "b/grading.yml", "calculation: []\n");
        write(dir.path(), "c/submit.yml", "name: hw1\n");

        let mut checker = checker(&dir, FailurePolicy::KeepGoing);
        let err = checker.run().unwrap_err();

        assert!(matches!(err, CheckError::ViolationsFound { count: 2 }));
        assert_eq!(checker.reporter().failures().count(), 2);
        // The duplicate-name phase still ran.
        assert!(checker
            .reporter()
            .successes()
            .any(|l| l.message.contains("no duplicate submit names")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subdir_config_is_validated() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "grading.yml", "grades:\n  a: {}\n");
        write(dir.path(), "shared/real.yml", "grades:\n  x:\n    type: bogus\n");
        fs::create_dir_all(dir.path().join("w1")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("shared/real.yml"),
            dir.path().join("w1/grading.yml"),
        )
        .unwrap();

        let mut checker = checker(&dir, FailurePolicy::FailFast);
        let err = checker.run().unwrap_err();

        assert!(matches!(
            err,
            CheckError::Invalid { ref label, source: ValidationError::InvalidGradeType { .. } }
                if label == "w1/grading.yml"
        ));
    }

    #[test]
    fn test_submit_names_compared_with_their_type() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/submit.yml", "name: 1\n");
        write(dir.path(), "b/submit.yml", "name: \"1\"\n");

        let mut checker = checker(&dir, FailurePolicy::FailFast);
        assert_eq!(checker.validate_duplicate_submit_names().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_names_reported_together() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/submit.yml", "name: hw1\n");
        write(dir.path(), "b/submit.yml", "name: hw1\n");
        write(dir.path(), "c/submit.yml", "name: hw2\n");
        write(dir.path(), "d/submit.yml", "name: hw2\n");

        let mut checker = checker(&dir, FailurePolicy::FailFast);
        let err = checker.validate_duplicate_submit_names().unwrap_err();

        match err {
            CheckError::DuplicateSubmitNames(duplicates) => assert_eq!(duplicates.len(), 2),
            other => panic!("unexpected error: {}", other),
        }

        let lines = checker.reporter().lines();
        assert_eq!(lines[0].status, LineStatus::Failure);
        assert_eq!(lines[0].message, "duplicate submit names found in submit.yml:");
        assert_eq!(lines[1].message, "hw1 appears in: a/submit.yml, b/submit.yml");
        assert_eq!(lines[2].message, "hw2 appears in: c/submit.yml, d/submit.yml");
    }

    #[test]
    fn test_explain_merges_onto_root() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "grading.yml",
            "templates:\n  t:\n    type: pass\ngrades:\n  a: {}\n",
        );
        write(dir.path(), "sub/grading.yml", "grades:\n  b: {}\n");

        let checker = checker(&dir, FailurePolicy::FailFast);
        let effective = checker.explain(&dir.path().join("sub/grading.yml")).unwrap();
        let grades = effective.get("grades").and_then(Node::as_mapping).unwrap();
        assert!(grades.contains_key("a") && grades.contains_key("b"));
        assert!(effective.get("templates").is_none());

        let root = checker.explain(&dir.path().join("grading.yml")).unwrap();
        assert!(root.get("templates").is_some());
    }

    #[test]
    fn test_load_error_aborts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "grading.yml", "grades: [oops\n");

        let mut checker = checker(&dir, FailurePolicy::KeepGoing);
        let err = checker.run().unwrap_err();
        assert!(matches!(err, CheckError::Load(_)));
        assert!(!err.is_violation());
    }
}
