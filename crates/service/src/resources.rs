//! The fixed set of public resources.
//!
//! Each resource is one JSON document in the store, read and replaced as a
//! whole. The table below is the only place a resource is declared; the HTTP
//! layer derives `/api/{segment}` from the file name.

use std::{fmt, path::Path, sync::Arc};

use serde_json::{Map, Value};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// Backing document for login credentials. Not exposed as a resource.
pub const USERS_FILE: &str = "users.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Publications,
    Courses,
    Contact,
    Academic,
    Memberships,
    Supervision,
    Awards,
}

/// Top-level JSON kind of a resource, used to pick its empty default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    List,
    Object,
}

impl Shape {
    pub fn default_value(self) -> Value {
        match self {
            Shape::List => Value::Array(Vec::new()),
            Shape::Object => Value::Object(Map::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEntry {
    pub resource: Resource,
    pub file_name: &'static str,
    pub shape: Shape,
}

/// Ordered like the `Resource` variants.
pub const REGISTRY: [ResourceEntry; 7] = [
    ResourceEntry {
        resource: Resource::Publications,
        file_name: "publications.json",
        shape: Shape::List,
    },
    ResourceEntry {
        resource: Resource::Courses,
        file_name: "courses.json",
        shape: Shape::List,
    },
    ResourceEntry {
        resource: Resource::Contact,
        file_name: "contact.json",
        shape: Shape::Object,
    },
    ResourceEntry {
        resource: Resource::Academic,
        file_name: "academic.json",
        shape: Shape::List,
    },
    ResourceEntry {
        resource: Resource::Memberships,
        file_name: "memberships.json",
        shape: Shape::List,
    },
    ResourceEntry {
        resource: Resource::Supervision,
        file_name: "supervision.json",
        shape: Shape::List,
    },
    ResourceEntry {
        resource: Resource::Awards,
        file_name: "awards.json",
        shape: Shape::List,
    },
];

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Publications,
        Resource::Courses,
        Resource::Contact,
        Resource::Academic,
        Resource::Memberships,
        Resource::Supervision,
        Resource::Awards,
    ];

    pub fn entry(self) -> &'static ResourceEntry {
        &REGISTRY[self as usize]
    }

    pub fn file_name(self) -> &'static str {
        self.entry().file_name
    }

    pub fn shape(self) -> Shape {
        self.entry().shape
    }

    pub fn default_value(self) -> Value {
        self.shape().default_value()
    }

    /// File name without its extension, e.g. `publications`.
    pub fn path_segment(self) -> &'static str {
        let file_name = self.file_name();
        Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
    }

    /// Public route, e.g. `/api/publications`.
    pub fn endpoint(self) -> String {
        format!("/api/{}", self.path_segment())
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path_segment() == segment)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Read/replace operations over the registered resources.
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn DocumentStore>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Current value, or the resource's empty default if nothing is persisted.
    pub async fn get(&self, resource: Resource) -> Result<Value, ServiceError> {
        self.store.load(resource.file_name(), resource.default_value()).await
    }

    /// Replace the whole value. The payload is stored as given, without shape checks.
    pub async fn replace(&self, resource: Resource, value: Value) -> Result<Value, ServiceError> {
        let saved = self.store.save(resource.file_name(), value).await?;
        info!(%resource, "resource replaced");
        Ok(saved)
    }
}
