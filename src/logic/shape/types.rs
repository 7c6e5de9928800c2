use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// TYPE LABELS
// ============================================================================

/// Type label of a shape, as reported in field diffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeLabel {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Mixed,
    Unparsed,
    Unknown,
}

impl TypeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeLabel::Null => "null",
            TypeLabel::Boolean => "boolean",
            TypeLabel::Number => "number",
            TypeLabel::String => "string",
            TypeLabel::Array => "array",
            TypeLabel::Object => "object",
            TypeLabel::Mixed => "mixed",
            TypeLabel::Unparsed => "unparsed",
            TypeLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SHAPE
// ============================================================================

/// Structural descriptor of a JSON value.
///
/// Objects keep their fields in first-seen order, but equality ignores
/// field order: two objects are equal when they carry the same field names
/// with equal child shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Null,
    Boolean,
    Number,
    String,
    /// Array with the merged shape of its elements
    Array(Box<Shape>),
    /// Ordered field name → child shape
    Object(Vec<(String, Shape)>),
    /// Heterogeneous array elements
    Mixed,
    /// Body that is not JSON, or a value nested past the depth limit
    Unparsed,
    /// Element of an empty array
    Unknown,
}

impl Shape {
    pub fn label(&self) -> TypeLabel {
        match self {
            Shape::Null => TypeLabel::Null,
            Shape::Boolean => TypeLabel::Boolean,
            Shape::Number => TypeLabel::Number,
            Shape::String => TypeLabel::String,
            Shape::Array(_) => TypeLabel::Array,
            Shape::Object(_) => TypeLabel::Object,
            Shape::Mixed => TypeLabel::Mixed,
            Shape::Unparsed => TypeLabel::Unparsed,
            Shape::Unknown => TypeLabel::Unknown,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Shape::Unparsed)
    }

    /// Child shape of an object field
    pub fn field(&self, name: &str) -> Option<&Shape> {
        match self {
            Shape::Object(fields) => lookup(fields, name),
            _ => None,
        }
    }

    /// Render the shape as a JSON template: primitives become their type
    /// label, objects map fields to rendered children, arrays hold a single
    /// rendered element (`[]` when the element is unknown).
    pub fn to_template(&self) -> Value {
        match self {
            Shape::Array(element) => match element.as_ref() {
                Shape::Unknown => Value::Array(Vec::new()),
                other => Value::Array(vec![other.to_template()]),
            },
            Shape::Object(fields) => {
                let map: Map<String, Value> = fields
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_template()))
                    .collect();
                Value::Object(map)
            }
            primitive => Value::String(primitive.label().as_str().to_string()),
        }
    }
}

pub(crate) fn lookup<'a>(fields: &'a [(String, Shape)], name: &str) -> Option<&'a Shape> {
    fields
        .iter()
        .find(|(field, _)| field == name)
        .map(|(_, shape)| shape)
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Shape::Array(a), Shape::Array(b)) => a == b,
            (Shape::Object(a), Shape::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(name, shape)| lookup(b, name).is_some_and(|other| shape == other))
            }
            (a, b) => a.label() == b.label(),
        }
    }
}

impl Eq for Shape {}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_template().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(fields: &[(&str, Shape)]) -> Shape {
        Shape::Object(
            fields
                .iter()
                .map(|(name, shape)| (name.to_string(), shape.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_object_equality_ignores_field_order() {
        let a = object(&[("id", Shape::Number), ("name", Shape::String)]);
        let b = object(&[("name", Shape::String), ("id", Shape::Number)]);
        assert_eq!(a, b);

        let c = object(&[("id", Shape::Number), ("name", Shape::Null)]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_template_rendering() {
        let shape = object(&[
            ("id", Shape::Number),
            ("tags", Shape::Array(Box::new(Shape::String))),
            ("empty", Shape::Array(Box::new(Shape::Unknown))),
            ("owner", object(&[("active", Shape::Boolean)])),
        ]);

        assert_eq!(
            shape.to_template(),
            json!({
                "id": "number",
                "tags": ["string"],
                "empty": [],
                "owner": { "active": "boolean" }
            })
        );
    }

    #[test]
    fn test_template_keeps_field_order() {
        let shape = object(&[("z", Shape::Null), ("a", Shape::Mixed)]);
        let rendered = serde_json::to_string(&shape).unwrap();
        assert_eq!(rendered, r#"{"z":"null","a":"mixed"}"#);
    }
}
