use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use service::auth::domain::{LoginInput, MatchResult};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Serialize)]
pub struct LoginSuccess {
    pub success: bool,
    pub username: String,
}

#[derive(Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: &'static str,
}

/// `POST /api/login`: 200 with the username on a match, 401 for any other JSON body.
pub async fn login(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<Response, JsonApiError> {
    let input = LoginInput::from_json(&body);
    let res = match state.credentials.login(&input).await? {
        MatchResult::Matched { username } => {
            Json(LoginSuccess { success: true, username }).into_response()
        }
        MatchResult::NoMatch => (
            StatusCode::UNAUTHORIZED,
            Json(LoginFailure { success: false, message: INVALID_CREDENTIALS }),
        )
            .into_response(),
    };
    Ok(res)
}
