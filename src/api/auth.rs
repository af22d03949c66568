//! Session authentication for the dashboard
//!
//! Credentials are checked against a mock user directory. A successful
//! sign-in issues a session token `"{session_id}.{signature}"`, where the
//! signature is HMAC-SHA256 of the session id under the server secret, and
//! stores it in the session cookie. The identity endpoint verifies the
//! signature before looking the session up; the page guard only checks that
//! the cookie is present.
//!
//! Sessions live in memory for `SESSION_TTL_DAYS` unless `[auth]
//! session_ttl_days` says otherwise; expired entries are pruned on the next
//! sign-in.

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use super::handlers::ApiError;
use super::state::AppState;
use crate::error::{AppError, Result};
use crate::secrets::Secrets;
use crate::validation::{self, FieldErrors};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_TTL_DAYS: i64 = 30;

/// The signed-in user as exposed to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

struct DirectoryUser {
    user: SessionUser,
    password: &'static str,
}

/// Mock user directory
fn directory() -> Vec<DirectoryUser> {
    vec![DirectoryUser {
        user: SessionUser {
            id: "1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
        },
        password: "password123",
    }]
}

/// Sign-in method offered on the sign-in page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
}

pub struct SessionAuth {
    secret: String,
    cookie_name: String,
    users: Vec<DirectoryUser>,
    providers: Vec<Provider>,
    ttl: Duration,
    /// session id → session
    sessions: Mutex<HashMap<String, Session>>,
}

struct Session {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

impl SessionAuth {
    /// OAuth providers are listed only when both their client id and secret
    /// are configured.
    pub fn new(secret: String, cookie_name: impl Into<String>, secrets: &Secrets) -> Self {
        let mut providers = vec![Provider {
            id: "credentials",
            name: "Credentials",
        }];
        if secrets.google.is_some() {
            providers.push(Provider {
                id: "google",
                name: "Google",
            });
        }
        if secrets.github.is_some() {
            providers.push(Provider {
                id: "github",
                name: "GitHub",
            });
        }
        Self {
            secret,
            cookie_name: cookie_name.into(),
            users: directory(),
            providers,
            ttl: Duration::days(SESSION_TTL_DAYS),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::config(format!("invalid session secret: {}", e)))
    }

    fn sessions(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::storage("session lock poisoned"))
    }

    /// Check credentials and open a session; returns the session token
    pub fn sign_in(&self, email: &str, password: &str) -> Result<(String, SessionUser)> {
        let user = self
            .users
            .iter()
            .find(|u| u.user.email == email && u.password == password)
            .map(|u| u.user.clone())
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        let mut id_bytes = [0u8; 16];
        getrandom::getrandom(&mut id_bytes)
            .map_err(|e| AppError::storage(format!("failed to generate session id: {}", e)))?;
        let session_id = hex::encode(id_bytes);

        let mut mac = self.mac()?;
        mac.update(session_id.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let now = Utc::now();
        let mut sessions = self.sessions()?;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        if sessions.len() < before {
            debug!(pruned = before - sessions.len(), "expired sessions pruned");
        }
        sessions.insert(
            session_id.clone(),
            Session {
                user: user.clone(),
                expires_at: now + self.ttl,
            },
        );
        drop(sessions);
        info!(user = %user.email, "signed in");
        Ok((format!("{}.{}", session_id, signature), user))
    }

    /// Resolve a token to its user, rejecting bad signatures and closed sessions
    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        let (session_id, signature) = token
            .split_once('.')
            .ok_or_else(|| AppError::unauthorized("malformed session token"))?;
        let signature =
            hex::decode(signature).map_err(|_| AppError::unauthorized("malformed session token"))?;

        let mut mac = self.mac()?;
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::unauthorized("invalid session signature"))?;

        let mut sessions = self.sessions()?;
        let Some(session) = sessions.get(session_id) else {
            return Err(AppError::unauthorized("session expired"));
        };
        if session.expires_at > Utc::now() {
            return Ok(session.user.clone());
        }
        sessions.remove(session_id);
        Err(AppError::unauthorized("session expired"))
    }

    /// Close the session behind `token`. Returns whether one was open.
    pub fn sign_out(&self, token: &str) -> Result<bool> {
        let Some((session_id, _)) = token.split_once('.') else {
            return Ok(false);
        };
        Ok(self.sessions()?.remove(session_id).is_some())
    }

    /// Token carried in the request's session cookie, if any
    pub fn token_from<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        cookie_value(headers, &self.cookie_name)
    }

    /// The signed-in user for this request
    pub fn current_user(&self, headers: &HeaderMap) -> Result<SessionUser> {
        let token = self
            .token_from(headers)
            .ok_or_else(|| AppError::unauthorized("not signed in"))?;
        self.verify(token)
    }

    pub fn set_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, token
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        )
    }
}

/// Extract a single cookie value: `a=1; b=2`
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

// ─── Endpoints ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignInRequest {
    fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        validation::email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<Provider>,
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let (token, user) = state.auth.sign_in(&req.email, &req.password).map_err(|e| {
        warn!(email = %req.email, "sign-in rejected");
        e
    })?;
    Ok((
        [(header::SET_COOKIE, state.auth.set_cookie(&token))],
        Json(SessionResponse { user }),
    ))
}

/// POST /api/v1/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> std::result::Result<impl IntoResponse, ApiError> {
    if let Some(token) = state.auth.token_from(&headers) {
        let closed = state.auth.sign_out(token)?;
        debug!(closed, "signed out");
    }
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.auth.clear_cookie())],
    ))
}

/// GET /api/v1/auth/session
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> std::result::Result<Json<SessionResponse>, ApiError> {
    let user = state.auth.current_user(&headers)?;
    Ok(Json(SessionResponse { user }))
}

/// GET /api/v1/auth/providers
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.auth.providers().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::OAuthCredentials;
    use axum::http::HeaderValue;

    fn auth() -> SessionAuth {
        SessionAuth::new("test-secret".to_string(), "taskdeck.session-token", &Secrets::default())
    }

    #[test]
    fn test_sign_in_and_verify() {
        let auth = auth();
        let (token, user) = auth.sign_in("admin@example.com", "password123").unwrap();
        assert_eq!(user.role, "admin");
        assert_eq!(auth.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_wrong_password_is_unauthorized() {
        let err = auth().sign_in("admin@example.com", "nope").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_tampered_or_foreign_token_rejected() {
        let auth = auth();
        let (token, _) = auth.sign_in("admin@example.com", "password123").unwrap();
        let (sid, _) = token.split_once('.').unwrap();

        assert!(auth.verify(&format!("{}.{}", sid, "00".repeat(32))).is_err());
        assert!(auth.verify("garbage").is_err());

        let other = SessionAuth::new("other-secret".to_string(), "c", &Secrets::default());
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_session_is_rejected_and_pruned() {
        let auth = auth().with_ttl(Duration::zero());
        let (stale, _) = auth.sign_in("admin@example.com", "password123").unwrap();
        assert!(matches!(auth.verify(&stale), Err(AppError::Unauthorized(_))));

        auth.sign_in("admin@example.com", "password123").unwrap();
        auth.sign_in("admin@example.com", "password123").unwrap();
        // 每次登录都会清掉过期会话，只剩最新的一个
        assert_eq!(auth.sessions.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sign_out_closes_session() {
        let auth = auth();
        let (token, _) = auth.sign_in("admin@example.com", "password123").unwrap();
        assert!(auth.sign_out(&token).unwrap());
        assert!(auth.verify(&token).is_err());
        assert!(!auth.sign_out(&token).unwrap());
    }

    #[test]
    fn test_providers_follow_configured_credentials() {
        assert_eq!(auth().providers().len(), 1);
        let secrets = Secrets {
            google: Some(OAuthCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            }),
            ..Secrets::default()
        };
        let auth = SessionAuth::new("s".to_string(), "c", &secrets);
        let ids: Vec<&str> = auth.providers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["credentials", "google"]);
    }

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; taskdeck.session-token=abc.def; empty="),
        );
        assert_eq!(cookie_value(&headers, "taskdeck.session-token"), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "empty"), None);
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
