use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// A semi-structured record: one element of a collection file.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Products,
    Suppliers,
    StockTransactions,
    Activities,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Suppliers => "suppliers",
            Collection::StockTransactions => "stockTransactions",
            Collection::Activities => "activities",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.with_timezone(&Utc))
}

/// Next `updatedAt` value for a document last stamped at `previous`.
///
/// Millisecond resolution means two mutations inside the same tick would
/// otherwise share a stamp; the result is always strictly after `previous`.
pub fn next_update_stamp(previous: Option<&Value>, now: DateTime<Utc>) -> String {
    let now = parse_timestamp(&format_timestamp(now)).unwrap_or(now);
    let previous = previous.and_then(Value::as_str).and_then(parse_timestamp);

    match previous {
        Some(prev) if now <= prev => format_timestamp(prev + Duration::milliseconds(1)),
        _ => format_timestamp(now),
    }
}

/// Partial changes for an `update`: a shallow field map merged over the
/// stored document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    fields: Document,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Shallow merge: new keys are added, existing keys overwritten, nested
    /// objects replaced wholesale. `_id` is never overwritten.
    pub fn merge_into(self, target: &mut Document) {
        for (field, value) in self.fields {
            if field == ID_FIELD {
                continue;
            }
            target.insert(field, value);
        }
    }
}

impl From<Document> for Changes {
    fn from(fields: Document) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_format_is_millisecond_iso() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(format_timestamp(ts), "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_update_stamp_strictly_increases() {
        let now = Utc::now();
        let prev = json!(format_timestamp(now));

        let next = next_update_stamp(Some(&prev), now);
        assert!(next.as_str() > prev.as_str().unwrap());

        let later = now + Duration::seconds(5);
        assert_eq!(next_update_stamp(Some(&prev), later), format_timestamp(later));
        assert_eq!(next_update_stamp(None, later), format_timestamp(later));
    }

    #[test]
    fn test_changes_merge_is_shallow_and_keeps_id() {
        let mut doc = json!({
            "_id": "abc",
            "name": "Widget",
            "meta": { "color": "red", "size": 3 }
        })
        .as_object()
        .cloned()
        .unwrap();

        Changes::new()
            .set("_id", "other")
            .set("meta", json!({ "color": "blue" }))
            .set("currentStock", 4)
            .merge_into(&mut doc);

        assert_eq!(doc["_id"], "abc");
        assert_eq!(doc["name"], "Widget");
        assert_eq!(doc["meta"], json!({ "color": "blue" }));
        assert_eq!(doc["currentStock"], 4);
    }

    #[test]
    fn test_collection_file_names() {
        assert_eq!(Collection::StockTransactions.file_name(), "stockTransactions.json");
        assert_eq!(Collection::Users.file_name(), "users.json");
    }
}
