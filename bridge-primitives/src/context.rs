//! Per-invocation request context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::subject::Subject;

/// Context supplied to a single tool invocation.
///
/// Built by the transport layer from the incoming request and treated as
/// read-only by the registry, chain, and adapter. Header names are folded to
/// lowercase at insertion so lookups are case-insensitive.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestContext {
    subject: Subject,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    query: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
}

impl RequestContext {
    /// Creates a context for the supplied subject.
    #[must_use]
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            metadata: Map::new(),
        }
    }

    /// Creates a context for an unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Subject::Anonymous)
    }

    /// Returns the calling subject.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Inserts a transport header, folding the name to lowercase.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into().to_lowercase(), value.into());
    }

    /// Adds a header and returns the updated context.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Inserts a query parameter.
    pub fn insert_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.insert(name.into(), value.into());
    }

    /// Adds a query parameter and returns the updated context.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_query(name, value);
        self
    }

    /// Returns a query parameter value.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Inserts ambient metadata.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Adds metadata and returns the updated context.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_metadata(key, value);
        self
    }

    /// Returns the metadata attached to this context.
    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}
