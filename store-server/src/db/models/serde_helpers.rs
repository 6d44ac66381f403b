//! Serde helpers shared by the persistence models
//!
//! Record links (`Product.category`, `Order.user`, `Review.author`) go
//! over the wire and into storage as `"table:key"` strings. Reads must
//! also accept the engine's native record representation, so the
//! deserializer here takes either form.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use surrealdb::RecordId;

/// Missing or null booleans read as `true` (used for `is_active` style
/// flags where absence means the record was never deactivated)
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Missing or null booleans read as `false`
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

struct RecordLinkVisitor;

impl<'de> Visitor<'de> for RecordLinkVisitor {
    type Value = RecordId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a record link as \"table:key\" or a native record id")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value
            .parse::<RecordId>()
            .map_err(|_| de::Error::custom(format!("malformed record link: {}", value)))
    }

    fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
    }
}

fn deserialize_link<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(RecordLinkVisitor)
}

/// `RecordId` as a `"table:key"` string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::deserialize_link(deserializer)
    }
}

/// `Option<RecordId>` as an optional `"table:key"` string
pub mod option_record_id {
    use super::*;

    #[derive(Deserialize)]
    #[serde(transparent)]
    struct Link(#[serde(deserialize_with = "super::deserialize_link")] RecordId);

    pub fn serialize<S>(id: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Link>::deserialize(deserializer)?.map(|link| link.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(with = "record_id")]
        owner: RecordId,
        #[serde(default, with = "option_record_id")]
        parent: Option<RecordId>,
        #[serde(default = "default_true", deserialize_with = "bool_true")]
        is_active: bool,
    }

    fn default_true() -> bool {
        true
    }

    #[test]
    fn link_round_trips_as_string() {
        let doc: Doc =
            serde_json::from_str(r#"{"owner":"user:alice","parent":"category:phones"}"#).unwrap();
        assert_eq!(doc.owner.to_string(), "user:alice");
        assert_eq!(doc.parent.as_ref().unwrap().to_string(), "category:phones");
        assert!(doc.is_active);

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"owner\":\"user:alice\""));
        assert!(json.contains("\"parent\":\"category:phones\""));
    }

    #[test]
    fn malformed_link_is_rejected() {
        let result = serde_json::from_str::<Doc>(r#"{"owner":"no-table-separator"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_link_reads_as_none() {
        let doc: Doc = serde_json::from_str(r#"{"owner":"user:bob","is_active":false}"#).unwrap();
        assert!(doc.parent.is_none());
        assert!(!doc.is_active);
    }
}
