use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::domain::{LoginInput, MatchResult, UserRecord};
use crate::errors::ServiceError;
use crate::resources::USERS_FILE;
use crate::storage::DocumentStore;

/// Checks submitted credentials against the `users` document.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn DocumentStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Exact, case-sensitive comparison. The first matching record wins.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{CredentialService, domain::MatchResult};
    /// use service::storage::{memory::MemoryStore, DocumentStore};
    /// use std::sync::Arc;
    /// let store = Arc::new(MemoryStore::default());
    /// let users = serde_json::json!([{ "username": "a", "password": "1" }]);
    /// tokio_test::block_on(store.save("users.json", users)).unwrap();
    /// let svc = CredentialService::new(store);
    /// let res = tokio_test::block_on(svc.check("a", "1")).unwrap();
    /// assert_eq!(res, MatchResult::Matched { username: "a".into() });
    /// ```
    #[instrument(skip(self, password))]
    pub async fn check(&self, username: &str, password: &str) -> Result<MatchResult, ServiceError> {
        let users = self.store.load(USERS_FILE, Value::Array(Vec::new())).await?;
        let found = users
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|u| UserRecord::deserialize(u).ok())
            .find(|u| u.username == username && u.password == password);

        match found {
            Some(user) => {
                info!(username = %user.username, "login_succeeded");
                Ok(MatchResult::Matched { username: user.username })
            }
            None => {
                info!("login_rejected");
                Ok(MatchResult::NoMatch)
            }
        }
    }

    /// Check a login form; missing fields are rejected without a lookup.
    pub async fn login(&self, input: &LoginInput) -> Result<MatchResult, ServiceError> {
        match (input.username.as_deref(), input.password.as_deref()) {
            (Some(username), Some(password)) => self.check(username, password).await,
            _ => {
                info!("login_rejected: incomplete form");
                Ok(MatchResult::NoMatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use serde_json::json;

    fn service_with_users(users: Value) -> CredentialService {
        let store = MemoryStore::with_documents([(USERS_FILE.to_string(), users)]);
        CredentialService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn exact_match_succeeds_and_others_fail() -> Result<(), anyhow::Error> {
        let svc = service_with_users(json!([{ "username": "a", "password": "1" }]));

        assert_eq!(svc.check("a", "1").await?, MatchResult::Matched { username: "a".into() });
        assert_eq!(svc.check("a", "2").await?, MatchResult::NoMatch);
        assert_eq!(svc.check("b", "1").await?, MatchResult::NoMatch);
        assert_eq!(svc.check("A", "1").await?, MatchResult::NoMatch);
        assert_eq!(svc.check("a ", "1").await?, MatchResult::NoMatch);
        Ok(())
    }

    #[tokio::test]
    async fn no_users_document_means_no_match() -> Result<(), anyhow::Error> {
        let svc = CredentialService::new(Arc::new(MemoryStore::default()));
        assert!(!svc.check("admin", "admin").await?.is_match());
        Ok(())
    }

    #[tokio::test]
    async fn first_matching_record_wins_over_duplicates() -> Result<(), anyhow::Error> {
        let svc = service_with_users(json!([
            { "username": "b", "password": "x" },
            { "username": "a", "password": "1", "role": "first" },
            { "username": "a", "password": "1", "role": "second" }
        ]));
        assert_eq!(svc.check("a", "1").await?, MatchResult::Matched { username: "a".into() });
        Ok(())
    }

    #[tokio::test]
    async fn malformed_records_and_non_list_documents_never_match() -> Result<(), anyhow::Error> {
        let svc = service_with_users(json!([
            { "username": "a" },
            { "username": "a", "password": 1 },
            "a:1",
            { "username": "c", "password": "3" }
        ]));
        assert_eq!(svc.check("a", "1").await?, MatchResult::NoMatch);
        assert!(svc.check("c", "3").await?.is_match());

        let svc = service_with_users(json!({ "username": "a", "password": "1" }));
        assert_eq!(svc.check("a", "1").await?, MatchResult::NoMatch);
        Ok(())
    }

    #[tokio::test]
    async fn login_requires_both_fields() -> Result<(), anyhow::Error> {
        let svc = service_with_users(json!([{ "username": "a", "password": "1" }]));

        let full = LoginInput { username: Some("a".into()), password: Some("1".into()) };
        assert!(svc.login(&full).await?.is_match());

        let missing = LoginInput { username: Some("a".into()), password: None };
        assert_eq!(svc.login(&missing).await?, MatchResult::NoMatch);
        assert_eq!(svc.login(&LoginInput::default()).await?, MatchResult::NoMatch);
        Ok(())
    }
}
