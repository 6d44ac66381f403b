//! Category model

use super::serde_helpers;
use serde::{Deserialize, Deserializer, Serialize};
use surrealdb::RecordId;

/// Category ID type
pub type CategoryId = RecordId;

/// A subcategory declared inside its parent category
///
/// Products reference subcategories by name, by convention. Clients may
/// submit either the full descriptor or a bare name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl<'de> Deserialize<'de> for Subcategory {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NameOrDescriptor {
            Descriptor {
                name: String,
                #[serde(default)]
                description: String,
                #[serde(default)]
                image: Option<String>,
            },
            Name(String),
        }

        Ok(match NameOrDescriptor::deserialize(d)? {
            NameOrDescriptor::Descriptor {
                name,
                description,
                image,
            } => Self {
                name,
                description,
                image,
            },
            NameOrDescriptor::Name(name) => Self {
                name,
                description: String::new(),
                image: None,
            },
        })
    }
}

/// Category matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Ordered subcategory descriptors
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// Update category payload; None fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Subcategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategories_accept_bare_names_and_descriptors() {
        let json = r#"{
            "name": "Electronics",
            "subcategories": [
                "Phones",
                {"name": "Laptops", "description": "Portable computers"}
            ]
        }"#;
        let payload: CategoryCreate = serde_json::from_str(json).unwrap();
        assert_eq!(
            payload.subcategories,
            vec![
                Subcategory {
                    name: "Phones".to_string(),
                    description: String::new(),
                    image: None,
                },
                Subcategory {
                    name: "Laptops".to_string(),
                    description: "Portable computers".to_string(),
                    image: None,
                },
            ]
        );
    }
}
