//! Authentication middleware
//!
//! [`authenticate`] runs on every request: a valid bearer token puts a
//! [`CurrentUser`] into the request extensions, a missing header leaves the
//! request anonymous, a bad token is rejected. Route groups then add
//! [`require_staff`] or [`require_admin`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Resolve the bearer token, if any, into a [`CurrentUser`]
///
/// | Case | Result |
/// |------|--------|
/// | no `Authorization` header | request continues anonymously |
/// | malformed header / bad token | 401 `TokenInvalid` |
/// | expired token | 401 `TokenExpired` |
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(header) = auth_header else {
        return Ok(next.run(req).await);
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token rejected");
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Require an admin or kitchen principal
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    if !user.is_staff() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "Staff role required"
        );
        return Err(AppError::new(ErrorCode::RoleRequired));
    }
    Ok(next.run(req).await)
}

/// Require an admin principal
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "Admin role required"
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}

/// Access the authenticated user from a request
pub trait CurrentUserExt {
    /// 401 when the request carries no valid token
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or_else(AppError::unauthorized)
    }
}
