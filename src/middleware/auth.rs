use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

/// Authenticated identity extracted from a verified JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
            iat: claims.iat,
        }
    }
}

/// Reads the bearer token, if any, and stores the identity on the request.
///
/// Never rejects: a missing or invalid token leaves the request anonymous and
/// the guards decide.
pub async fn authenticate_jwt(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    if let Some(user) = identity_from_headers(&headers) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

fn identity_from_headers(headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_jwt_from_headers(headers)?;
    match validate_jwt(token) {
        Ok(claims) => {
            tracing::debug!("Authenticated request as '{}'", claims.username);
            Some(AuthUser::from(claims))
        }
        Err(err) => {
            tracing::warn!("Ignoring bearer token: {}", err);
            None
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authorization predicate evaluated against the request identity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    LoggedIn,
    Admin,
    CorrectUserOrAdmin,
}

impl Guard {
    /// `path_username` is the `:username` route parameter, when the route has one.
    pub fn check(self, identity: Option<&AuthUser>, path_username: Option<&str>) -> Result<(), ApiError> {
        match (self, identity) {
            (Guard::LoggedIn, Some(_)) => Ok(()),
            (Guard::LoggedIn, None) => Err(ApiError::unauthorized("Unauthorized")),
            (Guard::Admin, Some(user)) if user.is_admin => Ok(()),
            (Guard::Admin, _) => Err(ApiError::forbidden("Admin privileges required")),
            (Guard::CorrectUserOrAdmin, Some(user))
                if user.is_admin || path_username == Some(user.username.as_str()) =>
            {
                Ok(())
            }
            (Guard::CorrectUserOrAdmin, _) => Err(ApiError::forbidden("Not allowed to access this user")),
        }
    }
}

/// Run guards in order, stopping at the first rejection
pub fn check_all(guards: &[Guard], identity: Option<&AuthUser>, path_username: Option<&str>) -> Result<(), ApiError> {
    guards
        .iter()
        .try_for_each(|guard| guard.check(identity, path_username))
}

async fn run_guards(guards: &[Guard], path_username: Option<&str>, request: Request, next: Next) -> Result<Response, ApiError> {
    check_all(guards, request.extensions().get::<AuthUser>(), path_username)?;
    Ok(next.run(request).await)
}

/// Require any verified identity
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    run_guards(&[Guard::LoggedIn], None, request, next).await
}

/// Require an admin identity
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    run_guards(&[Guard::Admin], None, request, next).await
}

/// Require the identity named by `:username`, or an admin
pub async fn ensure_correct_user_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = params.get("username").map(String::as_str);
    run_guards(&[Guard::CorrectUserOrAdmin], username, request, next).await
}
