//! Storage abstractions for service layer
//!
//! Services talk to a [`DocumentStore`]; the file-backed [`JsonFileStore`] is
//! the production implementation and [`memory::MemoryStore`] backs tests.

pub mod json_file_store;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

pub use json_file_store::JsonFileStore;

/// Named JSON documents that are read and replaced wholesale.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current value of `name`, or `default` if nothing usable is persisted.
    async fn load(&self, name: &str, default: Value) -> Result<Value, ServiceError>;
    /// Replace `name` with `value`, returning the persisted value.
    async fn save(&self, name: &str, value: Value) -> Result<Value, ServiceError>;
}

/// Simple in-memory store for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        docs: Mutex<HashMap<String, Value>>,
    }

    impl MemoryStore {
        pub fn with_documents<I>(docs: I) -> Self
        where
            I: IntoIterator<Item = (String, Value)>,
        {
            Self { docs: Mutex::new(docs.into_iter().collect()) }
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn load(&self, name: &str, default: Value) -> Result<Value, ServiceError> {
            let docs = self.docs.lock().unwrap_or_else(|p| p.into_inner());
            Ok(docs.get(name).cloned().unwrap_or(default))
        }

        async fn save(&self, name: &str, value: Value) -> Result<Value, ServiceError> {
            let mut docs = self.docs.lock().unwrap_or_else(|p| p.into_inner());
            docs.insert(name.to_string(), value.clone());
            Ok(value)
        }
    }
}
