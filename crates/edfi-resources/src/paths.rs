//! Key-path access into JSON payloads.
//!
//! Paths are dot-separated; a purely numeric segment indexes into an array.
//! `classPeriods.0.classPeriodReference.classPeriodName` reaches the
//! `classPeriodName` field of the first class-period reference.

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Looks up the value at `path`, returning `None` if any segment is missing
/// or of the wrong shape.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match segment.parse::<usize>() {
            Ok(index) => current.as_array()?.get(index)?,
            Err(_) => current.as_object()?.get(segment)?,
        };
    }
    Some(current)
}

/// Writes `new` at `path`, creating intermediate objects and extending
/// arrays with empty objects as needed.
pub fn set_path(value: &mut Value, path: &str, new: Value) -> Result<(), ResolveError> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = value;
    for (position, segment) in segments.iter().enumerate() {
        let last = position == segments.len() - 1;
        match segment.parse::<usize>() {
            Ok(index) => {
                if !current.is_array() {
                    if current.is_null() {
                        *current = Value::Array(Vec::new());
                    } else {
                        return Err(ResolveError::InvalidPath {
                            path: path.to_string(),
                            segment: segment.to_string(),
                        });
                    }
                }
                let array = current.as_array_mut().unwrap();
                while array.len() <= index {
                    array.push(Value::Object(Map::new()));
                }
                if last {
                    array[index] = new;
                    return Ok(());
                }
                current = &mut array[index];
            }
            Err(_) => {
                if !current.is_object() {
                    if current.is_null() {
                        *current = Value::Object(Map::new());
                    } else {
                        return Err(ResolveError::InvalidPath {
                            path: path.to_string(),
                            segment: segment.to_string(),
                        });
                    }
                }
                let object = current.as_object_mut().unwrap();
                if last {
                    object.insert(segment.to_string(), new);
                    return Ok(());
                }
                current = object.entry(segment.to_string()).or_insert(Value::Null);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gets_nested_object_field() {
        let value = json!({"schoolReference": {"schoolId": 255901}});
        assert_eq!(
            get_path(&value, "schoolReference.schoolId"),
            Some(&json!(255901))
        );
    }

    #[test]
    fn gets_indexed_array_element() {
        let value = json!({
            "classPeriods": [
                {"classPeriodReference": {"classPeriodName": "First period"}}
            ]
        });
        assert_eq!(
            get_path(&value, "classPeriods.0.classPeriodReference.classPeriodName"),
            Some(&json!("First period"))
        );
    }

    #[test]
    fn missing_segment_returns_none() {
        let value = json!({"a": {"b": 1}});
        assert_eq!(get_path(&value, "a.c"), None);
        assert_eq!(get_path(&value, "a.b.c"), None);
    }

    #[test]
    fn sets_existing_nested_field() {
        let mut value = json!({"sessionReference": {"sessionName": "Fall"}});
        set_path(&mut value, "sessionReference.sessionName", json!("Spring")).unwrap();
        assert_eq!(
            value,
            json!({"sessionReference": {"sessionName": "Spring"}})
        );
    }

    #[test]
    fn creates_missing_intermediate_objects() {
        let mut value = json!({});
        set_path(&mut value, "calendarReference.calendarCode", json!("107")).unwrap();
        assert_eq!(value, json!({"calendarReference": {"calendarCode": "107"}}));
    }

    #[test]
    fn extends_arrays_with_empty_objects() {
        let mut value = json!({"gradingPeriods": []});
        set_path(
            &mut value,
            "gradingPeriods.1.gradingPeriodReference.periodSequence",
            json!(2),
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "gradingPeriods": [
                    {},
                    {"gradingPeriodReference": {"periodSequence": 2}}
                ]
            })
        );
    }

    #[test]
    fn rejects_indexing_into_scalar() {
        let mut value = json!({"name": "x"});
        assert!(set_path(&mut value, "name.0", json!(1)).is_err());
    }
}
