use crate::api::AppState;
use crate::api::schemas::auth::{Login, LoginResponse};
use crate::api::schemas::users::UserVM;
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn login(State(state): State<AppState>, Json(payload): Json<Login>) -> Result<impl IntoResponse> {
    let (user, session) = state.user_service.login(payload.username, payload.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: UserVM::from(user),
    }))
}
