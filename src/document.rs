//! Document - tagged record fetched from the document store.
//!
//! Every document has an `id` and an open bag of fields. Consumers that need a
//! typed view (see `catalog::Product`) validate it here, at the fetch boundary,
//! instead of poking at loosely-shaped JSON throughout the code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error type for document shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The raw payload was not a JSON object.
    NotAnObject,
    /// A required field was absent (or `null`).
    MissingField { id: String, field: String },
    /// A field was present with the wrong JSON type.
    InvalidField {
        id: String,
        field: String,
        expected: &'static str,
    },
    /// The field bag could not be decoded into a typed view.
    Decode { id: String, message: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::NotAnObject => write!(f, "document payload is not a JSON object"),
            DocumentError::MissingField { id, field } => {
                write!(f, "document {} is missing required field {}", id, field)
            }
            DocumentError::InvalidField {
                id,
                field,
                expected,
            } => write!(
                f,
                "document {} field {} has the wrong type (expected {})",
                id, field, expected
            ),
            DocumentError::Decode { id, message } => {
                write!(f, "document {} could not be decoded: {}", id, message)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// A stored document: identity plus an extensible field bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document from an id and a field map.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON object. The `id` key is lifted out of the
    /// object; everything else lands in `fields`.
    pub fn from_json(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut fields) = value else {
            return Err(DocumentError::NotAnObject);
        };

        let id = match fields.remove("id") {
            Some(Value::String(id)) if id.trim().is_empty() => {
                return Err(DocumentError::InvalidField {
                    id,
                    field: "id".into(),
                    expected: "non-empty string",
                })
            }
            Some(Value::String(id)) => id,
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(DocumentError::InvalidField {
                    id: String::new(),
                    field: "id".into(),
                    expected: "string",
                })
            }
            None => {
                return Err(DocumentError::MissingField {
                    id: String::new(),
                    field: "id".into(),
                })
            }
        };

        Ok(Self { id, fields })
    }

    /// Look up a stored field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value used for ordering and predicate evaluation. `id` resolves to the
    /// document id; absent fields read as `null`.
    pub fn value_of(&self, field: &str) -> Value {
        if field == "id" {
            return Value::String(self.id.clone());
        }
        self.fields.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Require a non-null field.
    pub fn require(&self, field: &str) -> Result<&Value, DocumentError> {
        match self.fields.get(field) {
            Some(Value::Null) | None => Err(DocumentError::MissingField {
                id: self.id.clone(),
                field: field.to_string(),
            }),
            Some(value) => Ok(value),
        }
    }

    /// Set a field, returning `self` for chaining.
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }
}
