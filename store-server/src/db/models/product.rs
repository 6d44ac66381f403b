//! Product model
//!
//! Products carry their reviews and rating aggregate inline, so a
//! catalog read needs no joins. `in_stock` is always derived from
//! `quantity` before persistence, never accepted from clients.

use super::serde_helpers;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// An embedded customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(with = "serde_helpers::record_id")]
    pub author: RecordId,
    pub name: String,
    /// Author avatar, filled from the account at read time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// 1..=5
    pub rating: i32,
    pub comment: String,
    /// Unix millis
    #[serde(default)]
    pub created_at: i64,
}

/// A catalog image: URL plus optional alt text
///
/// Clients may submit either the full descriptor or a bare URL string;
/// both forms normalize to this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl<'de> Deserialize<'de> for ProductImage {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum UrlOrDescriptor {
            Descriptor {
                url: String,
                #[serde(default)]
                alt: Option<String>,
            },
            Url(String),
        }

        Ok(match UrlOrDescriptor::deserialize(d)? {
            UrlOrDescriptor::Descriptor { url, alt } => Self { url, alt },
            UrlOrDescriptor::Url(url) => Self { url, alt: None },
        })
    }
}

/// Rating aggregate, recomputed whenever a review is appended
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: i64,
}

/// Product matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Pre-discount price; must be >= price when present
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    pub subcategory: String,
    pub brand: String,
    /// Image descriptors, at least one required at creation
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub quantity: i64,
    /// Derived: quantity > 0
    #[serde(default)]
    pub in_stock: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_featured: bool,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub sold: i64,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub added_by: Option<RecordId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Flexible payload fields
// =============================================================================
//
// Clients submit specifications either as a JSON object or as a
// JSON-encoded string; features and tags either as an array or as a
// JSON-encoded string. Both forms normalize to the typed field here so
// the rest of the stack never sees the string variants.

fn spec_map_from_str<E: serde::de::Error>(s: &str) -> Result<HashMap<String, String>, E> {
    if s.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(s)
        .map_err(|e| E::custom(format!("specifications is not a valid JSON object: {}", e)))
}

fn string_vec_from_str<E: serde::de::Error>(s: &str, field: &str) -> Result<Vec<String>, E> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(s)
        .map_err(|e| E::custom(format!("{} is not a valid JSON array: {}", field, e)))
}

/// Deserialize a spec map given as an object or a JSON-encoded string
pub fn flexible_spec_map<'de, D>(d: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrText {
        Map(HashMap<String, String>),
        Text(String),
    }

    match MapOrText::deserialize(d)? {
        MapOrText::Map(m) => Ok(m),
        MapOrText::Text(s) => spec_map_from_str(&s),
    }
}

/// Same as [`flexible_spec_map`] but optional (absent means unchanged)
pub fn flexible_spec_map_opt<'de, D>(d: D) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrText {
        Map(HashMap<String, String>),
        Text(String),
    }

    match Option::<MapOrText>::deserialize(d)? {
        None => Ok(None),
        Some(MapOrText::Map(m)) => Ok(Some(m)),
        Some(MapOrText::Text(s)) => spec_map_from_str(&s).map(Some),
    }
}

macro_rules! flexible_string_vec {
    ($name:ident, $name_opt:ident, $field:literal) => {
        /// Deserialize a string list given as an array or a JSON-encoded string
        pub fn $name<'de, D>(d: D) -> Result<Vec<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            #[serde(untagged)]
            enum VecOrText {
                Vec(Vec<String>),
                Text(String),
            }

            match VecOrText::deserialize(d)? {
                VecOrText::Vec(v) => Ok(v),
                VecOrText::Text(s) => string_vec_from_str(&s, $field),
            }
        }

        /// Optional variant (absent means unchanged)
        pub fn $name_opt<'de, D>(d: D) -> Result<Option<Vec<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            #[serde(untagged)]
            enum VecOrText {
                Vec(Vec<String>),
                Text(String),
            }

            match Option::<VecOrText>::deserialize(d)? {
                None => Ok(None),
                Some(VecOrText::Vec(v)) => Ok(Some(v)),
                Some(VecOrText::Text(s)) => string_vec_from_str(&s, $field).map(Some),
            }
        }
    };
}

flexible_string_vec!(flexible_features, flexible_features_opt, "features");
flexible_string_vec!(flexible_tags, flexible_tags_opt, "tags");

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    /// Category record id, e.g. `category:electronics`
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "flexible_spec_map")]
    pub specifications: HashMap<String, String>,
    #[serde(default, deserialize_with = "flexible_features")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "flexible_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub is_featured: bool,
}

/// Update product payload; None fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ProductImage>>,
    #[serde(default, deserialize_with = "flexible_spec_map_opt")]
    pub specifications: Option<HashMap<String, String>>,
    #[serde(default, deserialize_with = "flexible_features_opt")]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "flexible_tags_opt")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Review submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub rating: i32,
    pub comment: String,
}
