use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::domain::document::{document_id, Collection, Document, ID_FIELD};
use crate::domain::ports::DocumentSource;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl From<i32> for SortOrder {
    fn from(direction: i32) -> Self {
        if direction == -1 {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// Foreign id fields that can be resolved into the referenced document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateField {
    ProductId,
    SupplierId,
    UserId,
}

impl PopulateField {
    pub fn field_name(&self) -> &'static str {
        match self {
            PopulateField::ProductId => "productId",
            PopulateField::SupplierId => "supplierId",
            PopulateField::UserId => "userId",
        }
    }

    pub fn target(&self) -> Collection {
        match self {
            PopulateField::ProductId => Collection::Products,
            PopulateField::SupplierId => Collection::Suppliers,
            PopulateField::UserId => Collection::Users,
        }
    }

    /// Embeds `referenced` in place of the id; user documents lose their
    /// password hash on the way.
    pub fn embed(&self, mut referenced: Document) -> Value {
        if *self == PopulateField::UserId {
            referenced.remove("password");
        }
        Value::Object(referenced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPopulateField(pub String);

impl fmt::Display for UnknownPopulateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no reference mapping for field '{}'", self.0)
    }
}

impl std::error::Error for UnknownPopulateField {}

impl FromStr for PopulateField {
    type Err = UnknownPopulateField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "productId" => Ok(PopulateField::ProductId),
            "supplierId" => Ok(PopulateField::SupplierId),
            "userId" => Ok(PopulateField::UserId),
            other => Err(UnknownPopulateField(other.to_string())),
        }
    }
}

/// Field projection in driver notation: `"-password"` drops a field,
/// `"name email"` keeps only those fields (and `_id`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Projection {
    pub fn parse(fields: &str) -> Self {
        let mut projection = Projection::default();
        for token in fields.split_whitespace() {
            if let Some(field) = token.strip_prefix('-') {
                if !field.is_empty() {
                    projection.exclude.push(field.to_string());
                }
            } else {
                let field = token.trim_start_matches('+');
                if !field.is_empty() {
                    projection.include.push(field.to_string());
                }
            }
        }
        projection
    }

    pub fn apply(&self, doc: &Document) -> Document {
        let mut projected = if self.include.is_empty() {
            doc.clone()
        } else {
            doc.iter()
                .filter(|(field, _)| field.as_str() == ID_FIELD || self.include.contains(field))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        };
        for field in &self.exclude {
            projected.remove(field);
        }
        projected
    }
}

/// Chainable, in-memory view over a snapshot of one collection.
///
/// Every step consumes the set and returns it, so the order of the chain is
/// the order of evaluation: `sort` then `limit` keeps the top-N, `limit`
/// then `sort` orders only the truncated prefix.
#[derive(Clone)]
pub struct ResultSet {
    documents: Vec<Document>,
    source: Arc<dyn DocumentSource>,
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet").field("documents", &self.documents).finish()
    }
}

impl ResultSet {
    pub fn new(documents: Vec<Document>, source: Arc<dyn DocumentSource>) -> Self {
        Self { documents, source }
    }

    /// Stable sort on one field; ties keep their current relative order.
    pub fn sort(mut self, field: &str, order: impl Into<SortOrder>) -> Self {
        let order = order.into();
        self.documents.sort_by(|a, b| match order {
            SortOrder::Ascending => compare_values(a.get(field), b.get(field)),
            SortOrder::Descending => compare_values(b.get(field), a.get(field)),
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.documents.truncate(n);
        self
    }

    pub fn select(self, projection: &str) -> Self {
        self.project(&Projection::parse(projection))
    }

    pub fn project(mut self, projection: &Projection) -> Self {
        self.documents = self.documents.iter().map(|doc| projection.apply(doc)).collect();
        self
    }

    /// Resolves `field` by name; names without a reference mapping leave
    /// the set unchanged.
    pub async fn populate(self, field: &str) -> Self {
        match field.parse::<PopulateField>() {
            Ok(field) => self.populate_field(field).await,
            Err(e) => {
                debug!("Skipping populate: {}", e);
                self
            }
        }
    }

    /// Replaces each string id in `field` with the referenced document.
    /// Dangling ids stay as they are.
    pub async fn populate_field(mut self, field: PopulateField) -> Self {
        let referenced = self.source.load_documents(field.target()).await;
        let name = field.field_name();

        for doc in self.documents.iter_mut() {
            let Some(id) = doc.get(name).and_then(Value::as_str) else {
                continue;
            };
            if id.is_empty() {
                continue;
            }
            if let Some(found) = referenced.iter().find(|r| document_id(r) == Some(id)) {
                doc.insert(name.to_string(), field.embed(found.clone()));
            }
        }
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().filter_map(document_id).collect()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn into_models<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        self.documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(Value::Object(doc))
                    .map_err(|e| StoreError::InvalidDocument(e.to_string()))
            })
            .collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Missing fields sort first, then null, bool, number, string, array, object.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(va), Some(vb)) => compare_json_values(va, vb),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_json_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        (Value::Number(na), Value::Number(nb)) => {
            let fa = na.as_f64().unwrap_or(0.0);
            let fb = nb.as_f64().unwrap_or(0.0);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (Value::String(sa), Value::String(sb)) => sa.cmp(sb),
        (Value::Array(aa), Value::Array(ab)) => aa.len().cmp(&ab.len()),
        (Value::Object(oa), Value::Object(ob)) => oa.len().cmp(&ob.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct MemorySource(HashMap<&'static str, Vec<Document>>);

    #[async_trait]
    impl DocumentSource for MemorySource {
        async fn load_documents(&self, collection: Collection) -> Vec<Document> {
            self.0.get(collection.name()).cloned().unwrap_or_default()
        }
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn set(docs: Vec<Value>, source: MemorySource) -> ResultSet {
        ResultSet::new(docs.into_iter().map(doc).collect(), Arc::new(source))
    }

    fn empty_source() -> MemorySource {
        MemorySource(HashMap::new())
    }

    #[test]
    fn test_sort_descending_then_limit_takes_top_n() {
        let rs = set(
            vec![
                json!({ "_id": "a", "qty": 3 }),
                json!({ "_id": "b", "qty": 10 }),
                json!({ "_id": "c", "qty": 7 }),
            ],
            empty_source(),
        );

        let top = rs.sort("qty", -1).limit(2);
        assert_eq!(top.ids(), vec!["b", "c"]);
    }

    #[test]
    fn test_limit_then_sort_orders_only_prefix() {
        let rs = set(
            vec![
                json!({ "_id": "a", "qty": 3 }),
                json!({ "_id": "b", "qty": 1 }),
                json!({ "_id": "c", "qty": 10 }),
            ],
            empty_source(),
        );

        let out = rs.limit(2).sort("qty", SortOrder::Descending);
        assert_eq!(out.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let rs = set(
            vec![
                json!({ "_id": "first", "rank": 1 }),
                json!({ "_id": "x", "rank": 2 }),
                json!({ "_id": "second", "rank": 1 }),
            ],
            empty_source(),
        );

        assert_eq!(rs.clone().sort("rank", 1).ids(), vec!["first", "second", "x"]);
        assert_eq!(rs.sort("rank", -1).ids(), vec!["x", "first", "second"]);
    }

    #[test]
    fn test_limit_zero_and_oversized() {
        let rs = set(vec![json!({ "_id": "a" }), json!({ "_id": "b" })], empty_source());
        assert!(rs.clone().limit(0).is_empty());
        assert_eq!(rs.limit(50).len(), 2);
    }

    #[test]
    fn test_missing_fields_sort_first() {
        let rs = set(
            vec![
                json!({ "_id": "has", "name": "b" }),
                json!({ "_id": "none" }),
                json!({ "_id": "null", "name": null }),
            ],
            empty_source(),
        );
        assert_eq!(rs.sort("name", 1).ids(), vec!["none", "null", "has"]);
    }

    #[test]
    fn test_projection_parse_and_apply() {
        let source = doc(json!({ "_id": "u1", "name": "A", "email": "a@x.com", "password": "hash" }));

        let redacted = Projection::parse("-password").apply(&source);
        assert!(!redacted.contains_key("password"));
        assert_eq!(redacted["email"], "a@x.com");
        assert!(source.contains_key("password"));

        let narrowed = Projection::parse("name  email -email").apply(&source);
        assert_eq!(narrowed.len(), 2);
        assert_eq!(narrowed["_id"], "u1");
        assert_eq!(narrowed["name"], "A");
    }

    #[test]
    fn test_populate_field_names() {
        assert_eq!("productId".parse::<PopulateField>(), Ok(PopulateField::ProductId));
        assert_eq!(PopulateField::SupplierId.target(), Collection::Suppliers);
        assert!("warehouseId".parse::<PopulateField>().is_err());
    }

    #[tokio::test]
    async fn test_populate_resolves_and_keeps_dangling_ids() {
        let mut refs = HashMap::new();
        refs.insert("products", vec![doc(json!({ "_id": "p1", "name": "Widget" }))]);

        let rs = set(
            vec![
                json!({ "_id": "t1", "productId": "p1" }),
                json!({ "_id": "t2", "productId": "gone" }),
                json!({ "_id": "t3" }),
            ],
            MemorySource(refs),
        );

        let out = rs.populate("productId").await.into_documents();
        assert_eq!(out[0]["productId"]["name"], "Widget");
        assert_eq!(out[1]["productId"], "gone");
        assert!(!out[2].contains_key("productId"));
    }

    #[tokio::test]
    async fn test_populate_user_strips_password() {
        let mut refs = HashMap::new();
        refs.insert("users", vec![doc(json!({ "_id": "u1", "name": "A", "password": "hash" }))]);

        let rs = set(vec![json!({ "_id": "a1", "userId": "u1" })], MemorySource(refs));
        let out = rs.populate("userId").await.into_documents();

        assert_eq!(out[0]["userId"]["name"], "A");
        assert!(out[0]["userId"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_populate_unknown_field_is_noop() {
        let rs = set(vec![json!({ "_id": "a", "ownerId": "x" })], empty_source());
        let out = rs.populate("ownerId").await;
        assert_eq!(out.documents()[0]["ownerId"], "x");
    }
}
