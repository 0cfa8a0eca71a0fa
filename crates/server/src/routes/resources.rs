use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use service::resources::Resource;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// One GET/PUT pair per registered resource, mounted at `Resource::endpoint()`.
pub fn resource_routes() -> Router<ServerState> {
    Resource::ALL.into_iter().fold(Router::new(), |router, resource| {
        router.route(
            &resource.endpoint(),
            get(move |State(state): State<ServerState>| read_resource(state, resource)).put(
                move |State(state): State<ServerState>, Json(body): Json<Value>| {
                    replace_resource(state, resource, body)
                },
            ),
        )
    })
}

async fn read_resource(
    state: ServerState,
    resource: Resource,
) -> Result<Json<Value>, JsonApiError> {
    let value = state.resources.get(resource).await?;
    Ok(Json(value))
}

async fn replace_resource(
    state: ServerState,
    resource: Resource,
    body: Value,
) -> Result<Json<Value>, JsonApiError> {
    let value = state.resources.replace(resource, body).await?;
    Ok(Json(value))
}
