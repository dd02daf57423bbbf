//! Session token verification.
//!
//! The auth provider issues a signed JWT per session, sent either as a bearer
//! token or in a cookie. A request whose token is missing or fails
//! verification is simply unauthenticated; that is never an error here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::{AuthConfig, DEFAULT_SESSION_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// JWKS cache TTL.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decoded session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Session ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration
    pub exp: i64,
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub session_id: Option<String>,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            session_id: claims.sid,
        }
    }
}

/// JWKS response from the auth provider.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    #[serde(default)]
    kty: Option<String>,
    n: String,
    e: String,
}

/// Cached JWKS keys.
struct JwksCache {
    http: Client,
    url: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
}

impl JwksCache {
    fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
        }
    }

    /// Refresh JWKS keys from the provider.
    async fn refresh_keys(&self) -> Result<usize, BoxError> {
        debug!("Refreshing JWKS keys");

        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let jwks: JwksResponse = response.json().await?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if jwk.kty.as_deref().is_some_and(|kty| kty != "RSA") {
                continue;
            }
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
            keys.insert(jwk.kid, key);
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;
        *self.last_refresh.write().await = Some(Instant::now());

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(key_count)
    }

    /// Get decoding key for a key ID.
    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        let needs_refresh = {
            let last = self.last_refresh.read().await;
            last.map_or(true, |at| at.elapsed() > JWKS_CACHE_TTL)
        };

        if needs_refresh {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        self.keys.read().await.get(kid).cloned()
    }
}

enum KeySource {
    /// RS256 keys published by the provider.
    Jwks(JwksCache),
    /// HS256 shared secret.
    Secret(DecodingKey),
}

/// Verifies session tokens and resolves the signed-in user.
pub struct SessionVerifier {
    source: KeySource,
    issuer: Option<String>,
    cookie_name: String,
}

impl SessionVerifier {
    /// Build a verifier from config. JWKS takes precedence over a shared secret.
    pub fn from_config(config: &AuthConfig) -> ApiResult<Self> {
        let source = if let Some(url) = &config.jwks_url {
            let http = Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .map_err(|e| ApiError::internal(format!("Failed to build HTTP client: {}", e)))?;
            KeySource::Jwks(JwksCache::new(http, url))
        } else if let Some(secret) = &config.jwt_secret {
            KeySource::Secret(DecodingKey::from_secret(secret.as_bytes()))
        } else {
            return Err(ApiError::internal(
                "Either AUTH_JWKS_URL or AUTH_JWT_SECRET must be configured",
            ));
        };

        let cookie_name = if config.session_cookie.is_empty() {
            DEFAULT_SESSION_COOKIE.to_string()
        } else {
            config.session_cookie.clone()
        };

        Ok(Self {
            source,
            issuer: config.issuer.clone(),
            cookie_name,
        })
    }

    /// Shared-secret verifier with the default cookie name.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            source: KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            issuer: None,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    /// Require a specific `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Prefetch JWKS keys. No-op for shared-secret verification.
    pub async fn warm_up(&self) -> Result<usize, BoxError> {
        match &self.source {
            KeySource::Jwks(cache) => cache.refresh_keys().await,
            KeySource::Secret(_) => Ok(0),
        }
    }

    /// Raw session token from the bearer header, falling back to the cookie.
    pub fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
            .or_else(|| {
                CookieJar::from_headers(headers)
                    .get(&self.cookie_name)
                    .map(|cookie| cookie.value().to_string())
            })
            .filter(|token| !token.is_empty())
    }

    /// Verify a session token.
    pub async fn verify_token(&self, token: &str) -> ApiResult<SessionClaims> {
        let header = decode_header(token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token header: {}", e)))?;

        let (key, algorithm) = match &self.source {
            KeySource::Secret(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks(cache) => {
                let kid = header
                    .kid
                    .ok_or_else(|| ApiError::unauthorized("Token missing key ID"))?;
                let key = cache
                    .get_key(&kid)
                    .await
                    .ok_or_else(|| ApiError::unauthorized("Unknown key ID"))?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<SessionClaims>(token, &key, &validation)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))?;

        Ok(token_data.claims)
    }

    /// Resolve the signed-in user, if any.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<AuthUser> {
        let token = self.session_token(headers)?;
        match self.verify_token(&token).await {
            Ok(claims) => Some(AuthUser::from(claims)),
            Err(e) => {
                debug!("Ignoring session token: {}", e);
                None
            }
        }
    }
}

/// Axum extractor for authenticated user.
///
/// Reuses the user resolved by the access guard when present.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        state
            .sessions
            .resolve(&parts.headers)
            .await
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, exp_offset: i64, secret: &str, iss: Option<&str>) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            sid: Some("sess_1".to_string()),
            iss: iss.map(str::to_string),
            iat: Some(chrono::Utc::now().timestamp()),
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_resolve_bearer_token() {
        let verifier = SessionVerifier::with_secret(SECRET);
        let user = verifier.resolve(&bearer(&token("user_1", 3600, SECRET, None))).await;
        assert_eq!(
            user,
            Some(AuthUser {
                user_id: "user_1".to_string(),
                session_id: Some("sess_1".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_resolve_session_cookie() {
        let verifier = SessionVerifier::with_secret(SECRET);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("theme=dark; __session={}", token("user_2", 3600, SECRET, None))
                .parse()
                .unwrap(),
        );
        let user = verifier.resolve(&headers).await.expect("signed in");
        assert_eq!(user.user_id, "user_2");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let verifier = SessionVerifier::with_secret(SECRET);
        assert_eq!(verifier.resolve(&HeaderMap::new()).await, None);
    }

    #[tokio::test]
    async fn test_invalid_tokens_are_unauthenticated() {
        let verifier = SessionVerifier::with_secret(SECRET);
        assert_eq!(verifier.resolve(&bearer("garbage")).await, None);
        assert_eq!(
            verifier.resolve(&bearer(&token("u", 3600, "other-secret", None))).await,
            None
        );
        assert_eq!(verifier.resolve(&bearer(&token("u", -3600, SECRET, None))).await, None);
    }

    #[tokio::test]
    async fn test_issuer_checked() {
        let verifier = SessionVerifier::with_secret(SECRET).with_issuer("https://auth.example.com");
        let good = token("u", 3600, SECRET, Some("https://auth.example.com"));
        let bad = token("u", 3600, SECRET, Some("https://evil.example.com"));
        assert!(verifier.verify_token(&good).await.is_ok());
        assert!(matches!(
            verifier.verify_token(&bad).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_from_config_requires_key_source() {
        assert!(SessionVerifier::from_config(&AuthConfig::default()).is_err());
        assert!(SessionVerifier::from_config(&AuthConfig::with_secret("s")).is_ok());
    }

    #[test]
    fn test_bearer_preferred_over_cookie() {
        let verifier = SessionVerifier::with_secret(SECRET);
        let mut headers = bearer("from-header");
        headers.insert(header::COOKIE, "__session=from-cookie".parse().unwrap());
        assert_eq!(verifier.session_token(&headers).as_deref(), Some("from-header"));
    }
}
