use std::sync::Arc;

use service::{
    auth::CredentialService,
    resources::ResourceService,
    storage::DocumentStore,
};

/// Shared handler state. Both services read and write the same store.
#[derive(Clone)]
pub struct ServerState {
    pub resources: ResourceService,
    pub credentials: CredentialService,
}

impl ServerState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            resources: ResourceService::new(Arc::clone(&store)),
            credentials: CredentialService::new(store),
        }
    }
}
