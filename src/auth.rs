use std::fmt;

use actix_web::{
    body::MessageBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::api::validation::ErrorResponse;

/// Token claims issued by the account service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub exp: i64,
}

/// Verification material for bearer tokens, shared as app data
pub struct AuthKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Identity of the caller, attached to the request by [`authenticate`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    MalformedHeader,
    InvalidToken(String),
    NotConfigured,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing Authorization header"),
            AuthError::MalformedHeader => write!(f, "Authorization header must use Bearer token format"),
            AuthError::InvalidToken(reason) => write!(f, "Invalid token: {}", reason),
            AuthError::NotConfigured => write!(f, "Token verification is not configured"),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::NotConfigured => {
                error!("Authentication keys missing from app data");
                HttpResponse::InternalServerError().json(ErrorResponse::new("Authentication unavailable"))
            }
            other => HttpResponse::Unauthorized()
                .json(ErrorResponse::new("Authentication required").error(other.to_string())),
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::MalformedHeader),
    }
}

fn identify(req: &ServiceRequest) -> Result<AuthUser, AuthError> {
    let keys = req
        .app_data::<web::Data<AuthKeys>>()
        .ok_or(AuthError::NotConfigured)?;
    let claims = keys.verify(bearer_token(req)?)?;
    Ok(AuthUser { user_id: claims.user_id })
}

/// Authentication gate for everything it wraps
///
/// Rejects the request before routing reaches a handler unless it
/// carries a valid bearer token. On success the caller is available to
/// handlers through the [`AuthUser`] extractor.
pub async fn authenticate(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match identify(&req) {
        Ok(user) => {
            debug!("Authenticated user {} for {} {}", user.user_id, req.method(), req.path());
            req.extensions_mut().insert(user);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err) => {
            warn!("Authentication denied for {} {}: {}", req.method(), req.path(), err);
            let response = err.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<AuthUser>().copied().ok_or(AuthError::MissingToken))
    }
}
