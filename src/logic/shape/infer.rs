//! Shape Inferencer - derives a structural shape from a JSON value
//!
//! Arrays collapse to a single element shape by merging every element:
//! objects unify field by field (keeping fields that only some elements
//! carry), identical primitives unify, anything else becomes `mixed`.

use serde_json::Value;

use super::types::Shape;

/// Nesting depth used when no explicit limit is configured
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Infer the shape of a JSON value with the default depth limit
pub fn infer(value: &Value) -> Shape {
    infer_with_depth(value, DEFAULT_MAX_DEPTH)
}

/// Infer the shape of a JSON value. Values nested deeper than `max_depth`
/// degrade to `Shape::Unparsed`.
pub fn infer_with_depth(value: &Value, max_depth: usize) -> Shape {
    infer_at(value, 0, max_depth)
}

/// Infer the shape of a raw response body. Empty or malformed bodies
/// yield `Shape::Unparsed`.
pub fn infer_body(body: &str, max_depth: usize) -> Shape {
    if body.trim().is_empty() {
        return Shape::Unparsed;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => infer_with_depth(&value, max_depth),
        Err(e) => {
            tracing::trace!("Body is not JSON: {}", e);
            Shape::Unparsed
        }
    }
}

fn infer_at(value: &Value, depth: usize, max_depth: usize) -> Shape {
    if depth > max_depth {
        return Shape::Unparsed;
    }

    match value {
        Value::Null => Shape::Null,
        Value::Bool(_) => Shape::Boolean,
        Value::Number(_) => Shape::Number,
        Value::String(_) => Shape::String,
        Value::Array(items) => {
            let element = items
                .iter()
                .map(|item| infer_at(item, depth + 1, max_depth))
                .reduce(merge)
                .unwrap_or(Shape::Unknown);
            Shape::Array(Box::new(element))
        }
        Value::Object(map) => Shape::Object(
            map.iter()
                .map(|(name, child)| (name.clone(), infer_at(child, depth + 1, max_depth)))
                .collect(),
        ),
    }
}

/// Merge two element shapes into one
pub fn merge(a: Shape, b: Shape) -> Shape {
    match (a, b) {
        (Shape::Unknown, other) | (other, Shape::Unknown) => other,
        (Shape::Object(mut fields), Shape::Object(incoming)) => {
            for (name, shape) in incoming {
                match fields.iter_mut().find(|(field, _)| *field == name) {
                    Some((_, existing)) => {
                        let current = std::mem::replace(existing, Shape::Unknown);
                        *existing = merge(current, shape);
                    }
                    None => fields.push((name, shape)),
                }
            }
            Shape::Object(fields)
        }
        (Shape::Array(a), Shape::Array(b)) => Shape::Array(Box::new(merge(*a, *b))),
        (a, b) if a == b => a,
        _ => Shape::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert_eq!(infer(&json!(null)), Shape::Null);
        assert_eq!(infer(&json!(true)), Shape::Boolean);
        assert_eq!(infer(&json!(1)), Shape::Number);
        assert_eq!(infer(&json!(1.5)), Shape::Number);
        assert_eq!(infer(&json!("x")), Shape::String);
    }

    #[test]
    fn test_object_keeps_document_order() {
        let shape = infer(&json!({"b": 1, "a": "x", "c": null}));
        let Shape::Object(fields) = shape else {
            panic!("expected object shape");
        };
        let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_array_is_unknown_element() {
        assert_eq!(infer(&json!([])), Shape::Array(Box::new(Shape::Unknown)));
    }

    #[test]
    fn test_array_objects_unify_field_by_field() {
        let shape = infer(&json!([
            {"id": 1, "name": "a"},
            {"id": 2, "email": "b@example.com"}
        ]));

        assert_eq!(
            shape.to_template(),
            json!([{"id": "number", "name": "string", "email": "string"}])
        );
    }

    #[test]
    fn test_heterogeneous_primitives_collapse_to_mixed() {
        assert_eq!(infer(&json!([1, "two", 3])), Shape::Array(Box::new(Shape::Mixed)));
        assert_eq!(infer(&json!([1, 2, 3])), Shape::Array(Box::new(Shape::Number)));
    }

    #[test]
    fn test_nested_empty_arrays_merge_into_known_element() {
        let shape = infer(&json!([[], [1]]));
        assert_eq!(shape.to_template(), json!([["number"]]));
    }

    #[test]
    fn test_infer_body_unparsed() {
        assert!(infer_body("not json", DEFAULT_MAX_DEPTH).is_unparsed());
        assert!(infer_body("", DEFAULT_MAX_DEPTH).is_unparsed());
        assert!(infer_body("   ", DEFAULT_MAX_DEPTH).is_unparsed());
        assert!(infer_body("{\"id\":", DEFAULT_MAX_DEPTH).is_unparsed());
        assert_eq!(infer_body("42", DEFAULT_MAX_DEPTH), Shape::Number);
    }

    #[test]
    fn test_depth_guard() {
        let value = json!({"a": {"b": {"c": 1}}});

        let shallow = infer_with_depth(&value, 2);
        assert_eq!(shallow.to_template(), json!({"a": {"b": {"c": "unparsed"}}}));

        let deep = infer_with_depth(&value, 3);
        assert_eq!(deep.to_template(), json!({"a": {"b": {"c": "number"}}}));
    }

    #[test]
    fn test_deterministic() {
        let value = json!({"users": [{"id": 1, "tags": ["a"]}, {"id": 2, "tags": []}]});
        assert_eq!(infer(&value), infer(&value.clone()));
    }
}
