//! Structural and referential validation of a single configuration tree.
//!
//! Checks run in a fixed order and stop at the first violation:
//! 1. `templates` shape and template definitions
//! 2. `grades` shape and grade types
//! 3. module definitions (`submits` keys must name known grades)
//! 4. `calculation` shape and entries

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::tree::{Mapping, Node, NodeKind, Scalar};

/// Declared kind of a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeType {
    Pass,
    Float,
    Integer,
    Points,
}

/// Type used for grades that do not declare one.
pub const DEFAULT_GRADE_TYPE: GradeType = GradeType::Float;

impl GradeType {
    pub const ALL: [GradeType; 4] = [
        GradeType::Pass,
        GradeType::Float,
        GradeType::Integer,
        GradeType::Points,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeType::Pass => "pass",
            GradeType::Float => "float",
            GradeType::Integer => "integer",
            GradeType::Points => "points",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(GradeType::as_str).collect()
    }
}

impl fmt::Display for GradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Resolve the effective type of a grade definition.
///
/// A declared `type` must name a valid grade type. A definition without a
/// `type` key, with a null or `false` `type`, or that is not a mapping at all
/// resolves to [`DEFAULT_GRADE_TYPE`]. On failure the declared type is
/// returned as text.
pub fn resolve_grade_type(definition: &Node) -> Result<GradeType, String> {
    match definition.get("type") {
        None => Ok(DEFAULT_GRADE_TYPE),
        Some(declared) => match declared.as_scalar() {
            Some(Scalar::Null | Scalar::Bool(false)) => Ok(DEFAULT_GRADE_TYPE),
            _ => declared.render().parse(),
        },
    }
}

/// Validate one configuration tree.
pub fn validate_config(config: &Node) -> Result<(), ValidationError> {
    let config = config
        .expect_mapping()
        .map_err(|found| ValidationError::InvalidDocument { found })?;

    if let Some(templates) = section(config, "templates")? {
        validate_templates(templates)?;
    }

    if let Some(grades) = section(config, "grades")? {
        validate_grades(grades)?;
    }

    validate_module_definitions(config)?;

    if let Some(calculation) = section(config, "calculation")? {
        validate_calculation(calculation)?;
    }

    Ok(())
}

/// A recognized section, if present. Present sections must be mappings.
fn section<'a>(config: &'a Mapping, name: &str) -> Result<Option<&'a Mapping>, ValidationError> {
    match config.get(name) {
        None => Ok(None),
        Some(node) => node
            .expect_mapping()
            .map(Some)
            .map_err(|found| ValidationError::InvalidSectionType {
                section: name.to_string(),
                found,
            }),
    }
}

fn validate_templates(templates: &Mapping) -> Result<(), ValidationError> {
    for (name, definition) in templates {
        if !definition.as_mapping().is_some_and(|d| d.contains_key("type")) {
            return Err(ValidationError::InvalidTemplateDefinition {
                template: name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_grades(grades: &Mapping) -> Result<(), ValidationError> {
    for (grade, definition) in grades {
        resolve_grade_type(definition).map_err(|grade_type| ValidationError::InvalidGradeType {
            grade: grade.clone(),
            grade_type,
        })?;
    }
    Ok(())
}

/// Every top-level mapping with a `submits` key is a module definition.
///
/// A missing or non-mapping `grades` section means no grade names are known.
fn validate_module_definitions(config: &Mapping) -> Result<(), ValidationError> {
    let grades = config.get("grades").and_then(Node::as_mapping);

    for (module, value) in config {
        let Some(submits) = value.get("submits") else {
            continue;
        };

        let submits = submits
            .as_mapping()
            .ok_or_else(|| ValidationError::InvalidSubmitsSection {
                module: module.clone(),
            })?;

        for grade in submits.keys() {
            if !grades.is_some_and(|g| g.contains_key(grade)) {
                return Err(ValidationError::UnknownGradeReference {
                    module: module.clone(),
                    grade: grade.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_calculation(calculation: &Mapping) -> Result<(), ValidationError> {
    for (name, components) in calculation {
        if components.kind() != NodeKind::Mapping {
            return Err(ValidationError::InvalidCalculationEntry {
                calculation: name.clone(),
            });
        }
    }
    Ok(())
}
