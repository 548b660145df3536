//! Structural validation errors.

use crate::tree::NodeKind;
use crate::GradeType;

/// A structural violation found in a grading configuration.
///
/// The display text is the console message for the violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("configuration must be a mapping, found {found}")]
    InvalidDocument { found: NodeKind },

    #[error("{} section must be a hash", capitalize(.section))]
    InvalidSectionType { section: String, found: NodeKind },

    #[error("template {template} must be a hash with a 'type' key")]
    InvalidTemplateDefinition { template: String },

    #[error(
        "grade {grade} has an invalid type: {grade_type}. Must be one of {}",
        GradeType::names().join(", ")
    )]
    InvalidGradeType { grade: String, grade_type: String },

    #[error("module definition {module} has an invalid submits section: it must be a hash.")]
    InvalidSubmitsSection { module: String },

    #[error("module definition {module} references a non-existent grade: {grade}")]
    UnknownGradeReference { module: String, grade: String },

    #[error("calculation {calculation} must be a hash of weighted components")]
    InvalidCalculationEntry { calculation: String },
}

impl ValidationError {
    /// Machine-readable code for this violation.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidDocument { .. } => "INVALID_DOCUMENT",
            ValidationError::InvalidSectionType { .. } => "INVALID_SECTION_TYPE",
            ValidationError::InvalidTemplateDefinition { .. } => "INVALID_TEMPLATE_DEFINITION",
            ValidationError::InvalidGradeType { .. } => "INVALID_GRADE_TYPE",
            ValidationError::InvalidSubmitsSection { .. } => "INVALID_SUBMITS_SECTION",
            ValidationError::UnknownGradeReference { .. } => "UNKNOWN_GRADE_REFERENCE",
            ValidationError::InvalidCalculationEntry { .. } => "INVALID_CALCULATION_ENTRY",
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
