//! Merge and structural validation rules for grading configurations.
//!
//! A grading configuration (`grading.yml`) declares `templates`, `grades`,
//! `calculation` and module definitions. Subdirectory configurations are
//! merged onto the root configuration with [`merge_configs`] before being
//! checked by [`validate_config`]. Submit descriptors (`submit.yml`) are
//! checked for unique names with [`SubmitNameIndex`].
//!
//! Nothing in this crate touches the filesystem.

mod duplicates;
mod error;
mod merge;
mod tree;
mod validate;

pub use duplicates::{DuplicateName, SubmitNameIndex};
pub use error::ValidationError;
pub use merge::{merge_configs, GRADING_SECTIONS};
pub use tree::{Mapping, Node, NodeKind, Scalar};
pub use validate::{resolve_grade_type, validate_config, GradeType, DEFAULT_GRADE_TYPE};
