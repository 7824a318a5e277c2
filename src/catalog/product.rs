//! Product - typed storefront view over a catalog `Document`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, DocumentError};

/// Star rating (1-5) to number of ratings with that many stars.
pub type RatingHistogram = BTreeMap<u8, u64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "price")]
    pub base_price: f64,
    /// Fraction off the base price, `0.0..=1.0`.
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub ratings: RatingHistogram,
    pub created_at: i64,
    #[serde(default)]
    pub published: bool,
}

impl Product {
    /// Decode a product from a fetched document.
    pub fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        for field in ["name", "price", "created_at"] {
            doc.require(field)?;
        }

        let mut fields = doc.fields.clone();
        fields.insert("id".into(), Value::String(doc.id.clone()));
        let product: Product =
            serde_json::from_value(Value::Object(fields)).map_err(|e| DocumentError::Decode {
                id: doc.id.clone(),
                message: e.to_string(),
            })?;

        if !(0.0..=1.0).contains(&product.discount) {
            return Err(DocumentError::InvalidField {
                id: doc.id.clone(),
                field: "discount".into(),
                expected: "fraction between 0 and 1",
            });
        }
        Ok(product)
    }
}
