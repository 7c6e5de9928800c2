//! Shape Differ - structural comparison of a candidate shape against a base
//!
//! Paths use dot notation for object fields and `[]` for "any array index",
//! e.g. `user.addresses[].zip`. A label mismatch is reported once at the
//! mismatching path and nothing underneath it is compared.

use serde::Serialize;

use super::types::{lookup, Shape, TypeLabel};

// ============================================================================
// FIELD DIFF
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Missing,
    TypeChange,
    Extra,
}

/// One discrepancy between a base shape and a candidate shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    field: String,
    #[serde(rename = "type")]
    kind: DiffKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_type: Option<TypeLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_type: Option<TypeLabel>,
    path: String,
}

impl FieldDiff {
    pub fn missing(path: impl Into<String>, expected: TypeLabel) -> Self {
        Self::build(path.into(), DiffKind::Missing, Some(expected), None)
    }

    pub fn extra(path: impl Into<String>, actual: TypeLabel) -> Self {
        Self::build(path.into(), DiffKind::Extra, None, Some(actual))
    }

    pub fn type_change(path: impl Into<String>, expected: TypeLabel, actual: TypeLabel) -> Self {
        Self::build(path.into(), DiffKind::TypeChange, Some(expected), Some(actual))
    }

    fn build(
        path: String,
        kind: DiffKind,
        expected_type: Option<TypeLabel>,
        actual_type: Option<TypeLabel>,
    ) -> Self {
        Self {
            field: field_name(&path).to_string(),
            kind,
            expected_type,
            actual_type,
            path,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> DiffKind {
        self.kind
    }

    pub fn expected_type(&self) -> Option<TypeLabel> {
        self.expected_type
    }

    pub fn actual_type(&self) -> Option<TypeLabel> {
        self.actual_type
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Last segment of a dotted path
fn field_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn child_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

// ============================================================================
// DIFF
// ============================================================================

/// Compare `candidate` against `base`
pub fn diff(base: &Shape, candidate: &Shape) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    walk(base, candidate, "", &mut diffs);
    diffs
}

fn walk(base: &Shape, candidate: &Shape, path: &str, diffs: &mut Vec<FieldDiff>) {
    match (base, candidate) {
        (Shape::Object(base_fields), Shape::Object(candidate_fields)) => {
            for (name, shape) in base_fields {
                if lookup(candidate_fields, name).is_none() {
                    diffs.push(FieldDiff::missing(child_path(path, name), shape.label()));
                }
            }

            for (name, shape) in candidate_fields {
                if lookup(base_fields, name).is_none() {
                    diffs.push(FieldDiff::extra(child_path(path, name), shape.label()));
                }
            }

            for (name, base_child) in base_fields {
                if let Some(candidate_child) = lookup(candidate_fields, name) {
                    walk(base_child, candidate_child, &child_path(path, name), diffs);
                }
            }
        }
        (Shape::Array(base_element), Shape::Array(candidate_element)) => {
            // An empty array tells us nothing about its elements
            if matches!(**base_element, Shape::Unknown)
                || matches!(**candidate_element, Shape::Unknown)
            {
                return;
            }
            walk(base_element, candidate_element, &format!("{}[]", path), diffs);
        }
        _ => {
            if base.label() != candidate.label() {
                diffs.push(FieldDiff::type_change(path, base.label(), candidate.label()));
            }
        }
    }
}
