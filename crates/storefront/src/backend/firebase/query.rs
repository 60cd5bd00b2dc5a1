//! Request bodies for Firestore `:runQuery` and `:commit`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::value::encode;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum FieldOperator {
    Equal,
    In,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum CompositeOperator {
    And,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
enum Filter {
    FieldFilter {
        field: FieldReference,
        op: FieldOperator,
        value: Value,
    },
    CompositeFilter {
        op: CompositeOperator,
        filters: Vec<Filter>,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Direction {
    Descending,
}

#[derive(Debug, Clone, Serialize)]
struct Ordering {
    field: FieldReference,
    direction: Direction,
}

/// A single-collection structured query.
///
/// Several `where_*` calls are ANDed together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<Ordering>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl StructuredQuery {
    #[must_use]
    pub fn collection(collection_id: &str) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: collection_id.to_string(),
            }],
            filter: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    fn and(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            None => filter,
            Some(Filter::CompositeFilter { op, mut filters }) => {
                filters.push(filter);
                Filter::CompositeFilter { op, filters }
            }
            Some(existing) => Filter::CompositeFilter {
                op: CompositeOperator::And,
                filters: vec![existing, filter],
            },
        });
        self
    }

    /// `field == value`.
    #[must_use]
    pub fn where_eq(self, field: &str, value: &Value) -> Self {
        self.and(Filter::FieldFilter {
            field: FieldReference {
                field_path: field.to_string(),
            },
            op: FieldOperator::Equal,
            value: encode(value),
        })
    }

    /// `field in values`.
    #[must_use]
    pub fn where_in(self, field: &str, values: &[Value]) -> Self {
        self.and(Filter::FieldFilter {
            field: FieldReference {
                field_path: field.to_string(),
            },
            op: FieldOperator::In,
            value: encode(&Value::Array(values.to_vec())),
        })
    }

    #[must_use]
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by.push(Ordering {
            field: FieldReference {
                field_path: field.to_string(),
            },
            direction: Direction::Descending,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Body of a `:runQuery` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
struct DocumentBody {
    name: String,
    fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentMask {
    field_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Precondition {
    exists: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: String,
    set_to_server_value: &'static str,
}

/// One write in a `:commit` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Write {
    update: DocumentBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_mask: Option<DocumentMask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_document: Option<Precondition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    update_transforms: Vec<FieldTransform>,
}

impl Write {
    /// Create `name`, failing if it already exists.
    #[must_use]
    pub fn create(name: String, fields: Map<String, Value>) -> Self {
        Self {
            update: DocumentBody { name, fields },
            update_mask: None,
            current_document: Some(Precondition { exists: false }),
            update_transforms: Vec::new(),
        }
    }

    /// Create or replace `name`.
    #[must_use]
    pub fn set(name: String, fields: Map<String, Value>) -> Self {
        Self {
            update: DocumentBody { name, fields },
            update_mask: None,
            current_document: None,
            update_transforms: Vec::new(),
        }
    }

    /// Update only the given fields of `name`, which must exist.
    #[must_use]
    pub fn update(name: String, fields: Map<String, Value>) -> Self {
        let field_paths = fields.keys().cloned().collect();
        Self {
            update: DocumentBody { name, fields },
            update_mask: Some(DocumentMask { field_paths }),
            current_document: Some(Precondition { exists: true }),
            update_transforms: Vec::new(),
        }
    }

    /// Merge the given fields into `name`, creating it if absent.
    #[must_use]
    pub fn merge(name: String, fields: Map<String, Value>) -> Self {
        let mut write = Self::update(name, fields);
        write.current_document = None;
        write
    }

    /// Stamp `field` with the commit time.
    #[must_use]
    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.update_transforms.push(FieldTransform {
            field_path: field.to_string(),
            set_to_server_value: "REQUEST_TIME",
        });
        self
    }
}

/// Body of a `:commit` request.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub writes: Vec<Write>,
}
