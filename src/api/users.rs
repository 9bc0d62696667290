use crate::api::AppState;
use crate::api::middleware::{AuthUser, MaybeAuthUser};
use crate::api::schemas::users::{
    GenericResponse, ListParams, PageResponse, UserRegistration, UserUpdateRequest, UserVM,
};
use crate::domain::user::UserUpdate;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

/// Creates a new account.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserRegistration>,
) -> Result<impl IntoResponse> {
    state.user_service.register(payload.username, payload.display_name, payload.password).await?;

    Ok(Json(GenericResponse { message: "User saved".to_string() }))
}

/// Lists users one page at a time. An authenticated requester does not see
/// themself in the listing.
pub async fn get_users(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let page = state.user_service.get_users(maybe_user.0, params.page, params.size).await?;

    Ok(Json(PageResponse::from(page)))
}

pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_username(&username).await?;

    Ok(Json(UserVM::from(user)))
}

/// Updates a profile. Users may only update themselves.
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdateRequest>,
) -> Result<impl IntoResponse> {
    if auth_user.user_id != id {
        return Err(AppError::Forbidden);
    }

    let user = state
        .user_service
        .update(id, UserUpdate { display_name: payload.display_name, image: payload.image })
        .await?;

    Ok(Json(UserVM::from(user)))
}
