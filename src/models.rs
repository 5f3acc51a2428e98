//! Wire Models
//!
//! Category records as returned by the backend list endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::NodeId;

/// Category id as it appears on the wire. Anything that is not a positive
/// integer (or a string holding one) is kept here and discarded by the
/// tree builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
    Other(Value),
}

impl RawId {
    pub fn as_node_id(&self) -> Option<NodeId> {
        let id = match self {
            RawId::Number(n) => NodeId::try_from(*n).ok()?,
            RawId::Text(s) => s.trim().parse::<NodeId>().ok()?,
            RawId::Other(_) => return None,
        };
        // Zero is the synthetic root
        (id != 0).then_some(id)
    }
}

impl From<NodeId> for RawId {
    fn from(id: NodeId) -> Self {
        RawId::Number(u64::from(id))
    }
}

/// Category record (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: RawId,
    /// Depth claimed by the backend; only used to nest flat lists
    #[serde(default, deserialize_with = "deserialize_depth")]
    pub depth: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_name")]
    pub name: String,
    #[serde(
        default = "default_true",
        alias = "use",
        alias = "useYn",
        deserialize_with = "deserialize_use_flag"
    )]
    pub visible: bool,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, alias = "submenu")]
    pub children: Option<Vec<CategoryRecord>>,
}

impl CategoryRecord {
    pub fn new(id: NodeId, name: &str) -> Self {
        Self {
            id: RawId::from(id),
            depth: None,
            name: name.to_string(),
            visible: true,
            banner: None,
            content_type: None,
            children: None,
        }
    }

    pub fn with_depth(mut self, depth: i64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_children(mut self, children: Vec<CategoryRecord>) -> Self {
        self.children = Some(children);
        self
    }
}

fn default_true() -> bool {
    true
}

/// Use flags show up as booleans, "Y"/"N" strings or 0/1 depending on the endpoint
fn deserialize_use_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim(), "Y" | "y" | "true" | "1"),
        Value::Number(n) => n.as_i64() != Some(0),
        Value::Null => true,
        _ => false,
    })
}

/// Depth arrives as a number or a numeric string; anything else is unknown
fn deserialize_depth<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A null or non-string name is treated as empty
fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Parse a list response. A malformed body means "no categories".
pub fn parse_records(json: &str) -> Vec<CategoryRecord> {
    match serde_json::from_str::<Vec<CategoryRecord>>(json) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("category list unreadable, treating as empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_read_leniently() {
        assert_eq!(RawId::Number(12).as_node_id(), Some(12));
        assert_eq!(RawId::Text(" 12 ".to_string()).as_node_id(), Some(12));
        assert_eq!(RawId::Text("abc".to_string()).as_node_id(), None);
        assert_eq!(RawId::Number(0).as_node_id(), None);
        assert_eq!(RawId::Number(u64::MAX).as_node_id(), None);
        assert_eq!(RawId::Other(Value::Null).as_node_id(), None);
    }

    #[test]
    fn parses_nested_response_with_aliases() {
        let json = r#"[
            {"id": 1, "depth": 1, "name": "News", "useYn": "Y", "contentType": "board",
             "submenu": [{"id": "2", "name": "Press", "use": false}]},
            {"id": -4, "name": "Broken"}
        ]"#;
        let records = parse_records(json);
        assert_eq!(records.len(), 2);

        let news = &records[0];
        assert_eq!(news.id.as_node_id(), Some(1));
        assert!(news.visible);
        assert_eq!(news.content_type.as_deref(), Some("board"));

        let press = &news.children.as_ref().unwrap()[0];
        assert_eq!(press.id.as_node_id(), Some(2));
        assert!(!press.visible);

        assert_eq!(records[1].id.as_node_id(), None);
    }

    #[test]
    fn one_odd_record_does_not_empty_the_list() {
        let json = r#"[
            {"id": 1, "name": "A"},
            {"id": 2, "name": null, "depth": "2"},
            {"id": 3, "name": 42, "depth": null},
            {"id": 4, "name": "D", "depth": "deep"}
        ]"#;
        let records = parse_records(json);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].name, "");
        assert_eq!(records[1].depth, Some(2));
        assert_eq!(records[2].name, "42");
        assert_eq!(records[2].depth, None);
        assert_eq!(records[3].depth, None);
    }

    #[test]
    fn malformed_body_is_empty() {
        assert!(parse_records("{not json").is_empty());
        assert!(parse_records(r#"{"id": 1}"#).is_empty());
    }
}
