use crate::api::AppState;
use crate::domain::auth::verify_jwt;
use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header, request::Parts},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Authenticated requester, extracted from the `Authorization` bearer token.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION).ok_or(AppError::AuthError)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::AuthError)?;
        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::AuthError);
        }

        let token = &auth_str[7..];

        let claims = verify_jwt(token, &state.config.auth.jwt_secret)?;

        Ok(Self { user_id: claims.sub })
    }
}

/// Like [`AuthUser`], but degrades to anonymous instead of rejecting, so
/// an absent or expired token gets the public view of a resource.
#[derive(Debug)]
pub struct MaybeAuthUser(pub Option<i64>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await.ok();
        Ok(Self(user_id.map(|u| u.user_id)))
    }
}

/// Request-id maker handing out a fresh UUID; the set layer keeps any id a
/// trusted proxy already attached.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
