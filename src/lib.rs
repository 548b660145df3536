//! Grading Checker - pre-flight gate for grading configuration trees
//!
//! Walks a project directory, validates the root `grading.yml`, validates
//! every subdirectory `grading.yml` merged onto the root, and rejects
//! `submit.yml` descriptors that share a name.

pub mod checker;
pub mod config;
pub mod project;
pub mod report;

pub use checker::{CheckError, FailurePolicy, GradingChecker, RunSummary};
pub use config::{CheckerConfig, ConfigError};
pub use project::{LoadError, ProjectTree};
pub use report::{ConsoleReporter, LineStatus, MemoryReporter, ReportLine, Reporter};

pub use grading_schema as schema;
