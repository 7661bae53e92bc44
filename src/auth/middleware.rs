use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::{
    auth::{Claims, JwtService},
    errors::AppError,
};

/// Extractor establishing identity for protected handlers.
///
/// The session token is resolved from the `token` cookie first, then from
/// an `Authorization: Bearer` header. Absence, malformed tokens, and
/// expired tokens are logged as distinct cases; all three answer 401.
pub struct AuthenticatedUser(pub Claims);

fn resolve_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

fn authenticate(req: &HttpRequest) -> Result<Claims, AppError> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let token = resolve_token(req).ok_or_else(|| {
        log::debug!("{} {}: no session token", req.method(), req.path());
        AppError::Unauthorized("No authentication token provided. Please login!".to_string())
    })?;

    jwt_service.validate_token(&token).map_err(|e| {
        log::debug!("{} {}: session token rejected: {}", req.method(), req.path(), e);
        e
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(AuthenticatedUser))
    }
}
