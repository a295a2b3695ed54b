//! Change events and their wire form
//!
//! The feed delivers one JSON object per line:
//! `{"type":"INSERT","table":"bookmarks","id":"<row-id>"}`. The subscriber
//! never inspects more than that; any event means "refetch".

use serde::{Deserialize, Serialize};

use crate::error::RealtimeError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INSERT" => Ok(ChangeKind::Insert),
            "UPDATE" => Ok(ChangeKind::Update),
            "DELETE" => Ok(ChangeKind::Delete),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row change in a watched table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub table: String,
    /// The affected row, when the feed shares it. Unused by the subscriber.
    pub row_id: Option<String>,
}

#[derive(Deserialize)]
struct WireChange {
    #[serde(rename = "type")]
    kind: String,
    table: String,
    #[serde(default)]
    id: Option<String>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, table: impl Into<String>, row_id: Option<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            row_id,
        }
    }

    /// Parse one newline-delimited JSON feed line.
    pub fn parse_line(line: &str) -> Result<Self> {
        let wire: WireChange =
            serde_json::from_str(line).map_err(|e| RealtimeError::Decode(e.to_string()))?;
        let kind = wire.kind.parse().map_err(RealtimeError::UnknownKind)?;

        Ok(Self {
            kind,
            table: wire.table,
            row_id: wire.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insert_line() {
        let event =
            ChangeEvent::parse_line(r#"{"type":"INSERT","table":"bookmarks","id":"b-1"}"#).unwrap();
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(event.table, "bookmarks");
        assert_eq!(event.row_id.as_deref(), Some("b-1"));
    }

    #[test]
    fn test_parse_line_without_row_id() {
        let event = ChangeEvent::parse_line(r#"{"type":"delete","table":"bookmarks"}"#).unwrap();
        assert_eq!(event.kind, ChangeKind::Delete);
        assert!(event.row_id.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = ChangeEvent::parse_line(r#"{"type":"TRUNCATE","table":"bookmarks"}"#).unwrap_err();
        assert!(matches!(err, RealtimeError::UnknownKind(k) if k == "TRUNCATE"));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            ChangeEvent::parse_line("not json"),
            Err(RealtimeError::Decode(_))
        ));
    }
}
