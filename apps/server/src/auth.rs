//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying the user's id, role and organization.
//! The middleware only resolves who is calling; what the caller may do is
//! decided by the core services.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use energycoop_core::access::{Actor, Role};
use energycoop_core::errors::{Error as CoreError, Result as CoreResult};
use energycoop_core::users::{PasswordHasherTrait, User};

use crate::error::ApiError;
use crate::main_lib::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    InvalidCredentials,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    org: Option<String>,
    exp: usize,
    iat: usize,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            token_ttl: config.access_token_ttl,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            org: user.organization_id.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Actor, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| Actor::new(data.claims.sub, data.claims.role, data.claims.org))
            .map_err(|err| {
                tracing::debug!("Rejected bearer token: {:?}", err.kind());
                AuthError::Unauthorized
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Accepts base64 of 32 bytes or a raw 32-character string.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => bytes,
        _ if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        _ => anyhow::bail!("JWT secret must be base64 of 32 bytes or a 32-character string"),
    };
    Ok(decoded)
}

pub fn random_secret_key() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Argon2id hashing with the crate defaults.
#[derive(Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasherTrait for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, password_hash: &str) -> CoreResult<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| CoreError::Unexpected(format!("Stored password hash is invalid: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(other) => Err(CoreError::Unexpected(format!(
                "Password verification failed: {other}"
            ))),
        }
    }
}

/// The caller resolved by [`resolve_actor`], stored in request extensions.
#[derive(Clone, Debug)]
struct CurrentActor(Option<Actor>);

/// Resolves the bearer token, if any. Requests without a token continue
/// anonymously; a malformed or expired token is rejected outright.
pub async fn resolve_actor(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let actor = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => {
            let header = value.to_str().map_err(|_| AuthError::Unauthorized)?;
            let mut parts = header.splitn(2, ' ');
            let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
                return Err(AuthError::Unauthorized);
            };
            if !scheme.eq_ignore_ascii_case("Bearer") || token.trim().is_empty() {
                return Err(AuthError::Unauthorized);
            }
            Some(state.auth.validate_token(token.trim())?)
        }
    };
    request.extensions_mut().insert(CurrentActor(actor));
    Ok(next.run(request).await)
}

/// An authenticated caller; rejects anonymous requests with 401.
pub struct AuthActor(pub Actor);

/// The caller when a token was sent, `None` for anonymous requests.
pub struct MaybeActor(pub Option<Actor>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<CurrentActor>()
            .and_then(|current| current.0.clone());
        Ok(MaybeActor(actor))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeActor(actor) = MaybeActor::from_request_parts(parts, state).await?;
        actor.map(AuthActor).ok_or_else(|| {
            CoreError::Unauthenticated("A bearer token is required".to_string()).into()
        })
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)?
        .ok_or(AuthError::InvalidCredentials)?;
    let token = state.auth.issue_token(&user)?;
    tracing::info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.get_user(&actor, &actor.user_id)?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn manager(ttl_secs: u64) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: random_secret_key(),
            access_token_ttl: Duration::from_secs(ttl_secs),
        })
    }

    fn user() -> User {
        let now = Utc::now().naive_utc();
        User {
            id: "user-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Agent,
            organization_id: Some("org-1".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trips_to_actor() {
        let auth = manager(60);
        let token = auth.issue_token(&user()).unwrap();
        let actor = auth.validate_token(&token).unwrap();
        assert_eq!(actor, Actor::new("user-1", Role::Agent, Some("org-1".to_string())));
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let token = manager(60).issue_token(&user()).unwrap();
        assert!(matches!(
            manager(60).validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_decode_secret_key() {
        let encoded = BASE64.encode([7u8; 32]);
        assert_eq!(decode_secret_key(&encoded).unwrap(), vec![7u8; 32]);
        assert_eq!(
            decode_secret_key("0123456789abcdef0123456789abcdef").unwrap().len(),
            32
        );
        assert!(decode_secret_key("short").is_err());
        assert!(decode_secret_key("  ").is_err());
    }

    #[test]
    fn test_argon2_hasher_verifies_only_the_right_password() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("battery staple", &hash).unwrap());
    }
}
