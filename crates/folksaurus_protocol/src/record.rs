//! Flat term records as exchanged with the service and the local store.

use crate::error::{ProtocolError, ProtocolResult};
use crate::ids::{AppId, TermId};
use serde::{Deserialize, Deserializer, Serialize};

/// A `{id, name}` reference to another term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Service-assigned id of the referenced term.
    pub id: TermId,
    /// Name of the referenced term.
    pub name: String,
}

impl SummaryRecord {
    /// Creates a summary record.
    pub fn new(id: impl Into<TermId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A term as a flat record.
///
/// The service sends `id`, `name`, `scope_note` and the relationship arrays.
/// `app_id` and `last_retrieved` are only ever set by this client and the
/// caller's store, so both default when absent from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Service-assigned id, unset for local placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TermId>,
    /// Caller-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<AppId>,
    /// Term name.
    pub name: String,
    /// Free-text scope note.
    #[serde(default, deserialize_with = "nullable_string")]
    pub scope_note: String,
    /// Unix timestamp of the last successful retrieval, 0 for never.
    #[serde(default)]
    pub last_retrieved: i64,
    /// Broader terms.
    #[serde(default)]
    pub broader: Vec<SummaryRecord>,
    /// Narrower terms.
    #[serde(default)]
    pub narrower: Vec<SummaryRecord>,
    /// Related terms.
    #[serde(default)]
    pub related: Vec<SummaryRecord>,
    /// Non-preferred terms this term is used for.
    #[serde(default)]
    pub used_for: Vec<SummaryRecord>,
    /// Preferred terms to use instead of this one.
    #[serde(default, rename = "use")]
    pub use_terms: Vec<SummaryRecord>,
}

impl TermRecord {
    /// Creates a record with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            app_id: None,
            name: name.into(),
            scope_note: String::new(),
            last_retrieved: 0,
            broader: Vec::new(),
            narrower: Vec::new(),
            related: Vec::new(),
            used_for: Vec::new(),
            use_terms: Vec::new(),
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Decodes a term body. An empty body or JSON `null` is "no data".
pub fn decode_term(body: &[u8]) -> ProtocolResult<Option<TermRecord>> {
    if is_blank(body) {
        return Ok(None);
    }
    Ok(serde_json::from_slice::<Option<TermRecord>>(body)?)
}

/// Decodes a term-list body into summaries, in service order.
pub fn decode_summaries(body: &[u8]) -> ProtocolResult<Vec<SummaryRecord>> {
    if is_blank(body) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice::<Option<Vec<SummaryRecord>>>(body)?.unwrap_or_default())
}

/// Decodes the body of a create call, which carries the bare term id.
///
/// The id may be a JSON number, a JSON string, or unquoted text.
pub fn decode_id_body(body: &[u8]) -> ProtocolResult<Option<TermId>> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(id) = serde_json::from_str::<Option<TermId>>(text) {
        return Ok(id);
    }
    let bare = text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if bare {
        Ok(Some(TermId::new(text)))
    } else {
        Err(ProtocolError::MalformedId(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO_JSON: &str = r#"{
        "id": "1",
        "name": "Foo",
        "scope_note": "A preferred term.",
        "broader": [{"id": "2", "name": "Super Foo"}],
        "narrower": [{"id": 3, "name": "Sub Foo"}],
        "related": [{"id": "5", "name": "Phoo"}, {"id": "6", "name": "Bar"}],
        "used_for": [{"id": "4", "name": "Faux"}],
        "use": []
    }"#;

    #[test]
    fn decodes_service_term() {
        let record = decode_term(FOO_JSON.as_bytes()).unwrap().unwrap();
        assert_eq!(record.id, Some(TermId::from(1u64)));
        assert_eq!(record.name, "Foo");
        assert_eq!(record.scope_note, "A preferred term.");
        assert_eq!(record.broader, vec![SummaryRecord::new("2", "Super Foo")]);
        assert_eq!(record.narrower, vec![SummaryRecord::new("3", "Sub Foo")]);
        assert_eq!(record.related.len(), 2);
        assert_eq!(record.related[1].name, "Bar");
        assert_eq!(record.used_for[0].id.as_str(), "4");
        assert!(record.use_terms.is_empty());
        assert_eq!(record.app_id, None);
        assert_eq!(record.last_retrieved, 0);
    }

    #[test]
    fn missing_lists_and_null_scope_note_default() {
        let record = decode_term(br#"{"id": 7, "name": "Bare", "scope_note": null}"#)
            .unwrap()
            .unwrap();
        assert_eq!(record.scope_note, "");
        assert!(record.broader.is_empty());
        assert!(record.use_terms.is_empty());
    }

    #[test]
    fn empty_body_is_no_data() {
        assert_eq!(decode_term(b"").unwrap(), None);
        assert_eq!(decode_term(b"  \n").unwrap(), None);
        assert_eq!(decode_term(b"null").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            decode_term(b"{\"id\": 1,"),
            Err(ProtocolError::MalformedBody(_))
        ));
        assert!(decode_summaries(b"<html>").is_err());
    }

    #[test]
    fn use_list_uses_json_key_use() {
        let mut record = TermRecord::named("Faux");
        record.use_terms.push(SummaryRecord::new("1", "Foo"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["use"][0]["name"], "Foo");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn decodes_term_list_in_order() {
        let list =
            decode_summaries(br#"[{"id": "1", "name": "Foo"}, {"id": "2", "name": "Foobar"}]"#)
                .unwrap();
        assert_eq!(
            list,
            vec![SummaryRecord::new("1", "Foo"), SummaryRecord::new("2", "Foobar")]
        );
        assert!(decode_summaries(b"").unwrap().is_empty());
    }

    #[test]
    fn decodes_create_bodies() {
        assert_eq!(decode_id_body(b"1").unwrap(), Some(TermId::from(1u64)));
        assert_eq!(decode_id_body(b"\"17\"").unwrap(), Some(TermId::from(17u64)));
        assert_eq!(decode_id_body(b"abc-9\n").unwrap(), Some(TermId::new("abc-9")));
        assert_eq!(decode_id_body(b"").unwrap(), None);
        assert!(matches!(
            decode_id_body(b"{not an id}"),
            Err(ProtocolError::MalformedId(_))
        ));
    }
}
