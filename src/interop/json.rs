//! JSON export of validation failures.
//!
//! Error trees are exported as nested objects:
//!
//! ```json
//! {
//!   "message": "validation has failed",
//!   "errors": [
//!     { "message": "John should has children, but he doesn't", "original": "no children" }
//!   ]
//! }
//! ```
//!
//! `errors` is omitted for leaves and `original` is omitted when no identity
//! is bound. Nested validator results export like a top-level [`Error`], and
//! other children export as `{"message": ...}`.

use std::error::Error as StdError;

use serde_json::{json, Map, Value};

use crate::error::{Error, ValidationError};

/// Trait for converting failures to a JSON representation.
pub trait ToJson {
    /// Converts this failure into a `serde_json::Value`.
    fn to_json(&self) -> Value;
}

impl ToJson for ValidationError {
    fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("message".to_string(), json!(self.message()));

        if let Some(original) = self.original() {
            object.insert("original".to_string(), json!(original.to_string()));
        }

        if !self.errors().is_empty() {
            let errors = self
                .errors()
                .iter()
                .map(|err| child_to_json(err.as_ref()))
                .collect();
            object.insert("errors".to_string(), Value::Array(errors));
        }

        Value::Object(object)
    }
}

impl ToJson for Error {
    fn to_json(&self) -> Value {
        match self {
            Error::Validation(err) => {
                let mut value = err.to_json();
                value["kind"] = json!("validation");
                value
            }
            Error::UnknownMode(_) => json!({
                "kind": "internal",
                "message": self.to_string(),
            }),
        }
    }
}

fn child_to_json(err: &(dyn StdError + 'static)) -> Value {
    if let Some(tree) = err.downcast_ref::<ValidationError>() {
        return tree.to_json();
    }
    if let Some(failure) = err.downcast_ref::<Error>() {
        return failure.to_json();
    }
    json!({ "message": err.to_string() })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::SharedError;
    use crate::validator::Mode;

    #[test]
    fn test_leaf_has_message_only() {
        let value = ValidationError::leaf("name is empty").to_json();
        assert_eq!(value, json!({ "message": "name is empty" }));
    }

    #[test]
    fn test_nested_tree() {
        let plain: SharedError = Arc::new(std::fmt::Error);
        let tree = ValidationError::new(
            "validation has failed",
            [ValidationError::leaf("a").into_shared(), plain],
        );

        assert_eq!(
            tree.to_json(),
            json!({
                "message": "validation has failed",
                "errors": [
                    { "message": "a" },
                    { "message": "an error occurred when formatting an argument" }
                ]
            })
        );
    }

    #[test]
    fn test_lifted_error_exports_original() {
        let original: SharedError = Arc::new(std::fmt::Error);
        let tree = ValidationError::from_error(Some(original), Vec::<SharedError>::new());

        let value = tree.to_json();
        assert_eq!(value["original"], json!("an error occurred when formatting an argument"));
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_error_kinds() {
        let validation = Error::from(ValidationError::leaf("x")).to_json();
        assert_eq!(validation["kind"], json!("validation"));

        let internal = Error::UnknownMode(Mode::from(3)).to_json();
        assert_eq!(internal["kind"], json!("internal"));
        assert_eq!(
            internal["message"],
            json!("internal error: no such mode 3 for validator")
        );
    }
}
