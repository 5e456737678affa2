use crate::models::Profile;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

const EVENT_CHANNEL_CAPACITY: usize = 256;
const MAX_TRACKED_SESSIONS: u64 = 100_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Session has been signed out")]
    Revoked,
}

/// Claims carried by a hosted-auth access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub session_id: String,
    pub email: Option<String>,
    /// `exp` of the token that opened the session, in unix seconds
    pub expires_at: usize,
}

/// Auth state change broadcast to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn { user_id: String },
    SignedOut { user_id: String },
}

/// Drops a tracked session once its token can no longer validate
struct TokenExpiry {
    leeway: Duration,
}

impl Expiry<String, Session> for TokenExpiry {
    fn expire_after_create(&self, _key: &String, session: &Session, _created_at: Instant) -> Option<Duration> {
        Some(remaining_lifetime(session.expires_at) + self.leeway)
    }
}

fn remaining_lifetime(expires_at: usize) -> Duration {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    Duration::from_secs((expires_at as u64).saturating_sub(now))
}

fn token_cache(leeway: Duration) -> Cache<String, Session> {
    Cache::builder()
        .max_capacity(MAX_TRACKED_SESSIONS)
        .expire_after(TokenExpiry { leeway })
        .build()
}

/// Verifies access tokens and tracks live sessions
///
/// Stands in for the client-side auth context: holds the current sessions,
/// announces sign-in/sign-out, and keeps a short-lived profile cache so
/// repeated requests do not refetch the profile row. Live and revoked
/// sessions are forgotten once their token expires.
pub struct SessionProvider {
    key: DecodingKey,
    validation: Validation,
    sessions: Cache<String, Session>,
    revoked: Cache<String, Session>,
    // Serializes sign-in/sign-out so events are published in state order
    transitions: Mutex<()>,
    events: broadcast::Sender<AuthEvent>,
    profiles: Cache<String, Profile>,
}

impl SessionProvider {
    pub fn new(
        secret: &[u8],
        audience: &str,
        leeway: Duration,
        profile_cache_size: u64,
        profile_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.leeway = leeway.as_secs();

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let profiles = moka::future::CacheBuilder::new(profile_cache_size)
            .time_to_live(profile_ttl)
            .build();

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
            sessions: token_cache(leeway),
            revoked: token_cache(leeway),
            transitions: Mutex::new(()),
            events,
            profiles,
        }
    }

    /// Resolve a bearer token to a session
    ///
    /// The first time a session is seen a `SignedIn` event is published.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;
        let session_id = claims.session_id.clone().unwrap_or_else(|| claims.sub.clone());

        if self.revoked.contains_key(&session_id) {
            return Err(SessionError::Revoked);
        }

        let session = Session {
            user_id: claims.sub,
            session_id: session_id.clone(),
            email: claims.email,
            expires_at: claims.exp,
        };

        if self.sessions.contains_key(&session_id) {
            return Ok(session);
        }

        let _guard = self.transitions.lock().await;

        // A sign-out may have landed while waiting for the guard
        if self.revoked.contains_key(&session_id) {
            return Err(SessionError::Revoked);
        }

        if !self.sessions.contains_key(&session_id) {
            self.sessions.insert(session_id, session.clone()).await;
            tracing::debug!("Session started for user {}", session.user_id);
            let _ = self.events.send(AuthEvent::SignedIn {
                user_id: session.user_id.clone(),
            });
        }

        Ok(session)
    }

    /// End a session; later requests with the same token are rejected
    pub async fn sign_out(&self, session: &Session) {
        let _guard = self.transitions.lock().await;

        self.revoked
            .insert(session.session_id.clone(), session.clone())
            .await;
        self.sessions.invalidate(&session.session_id).await;
        self.profiles.invalidate(&session.user_id).await;

        let _ = self.events.send(AuthEvent::SignedOut {
            user_id: session.user_id.clone(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Sessions whose token is still valid
    pub fn active_sessions(&self) -> usize {
        self.sessions.iter().count()
    }

    pub async fn cached_profile(&self, user_id: &str) -> Option<Profile> {
        self.profiles.get(user_id).await
    }

    pub async fn store_profile(&self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile).await;
    }

    pub async fn invalidate_profile(&self, user_id: &str) {
        self.profiles.invalidate(user_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        aud: &'a str,
        exp: usize,
        session_id: &'a str,
    }

    fn token_valid_for(sub: &str, aud: &str, session_id: &str, secs: usize) -> String {
        let claims = TestClaims {
            sub,
            aud,
            exp: chrono::Utc::now().timestamp() as usize + secs,
            session_id,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn token(sub: &str, aud: &str, session_id: &str) -> String {
        token_valid_for(sub, aud, session_id, 3600)
    }

    fn provider() -> SessionProvider {
        SessionProvider::new(SECRET, "authenticated", Duration::ZERO, 10, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_authenticate_publishes_sign_in_once() {
        let provider = provider();
        let mut events = provider.subscribe();
        let token = token("user-1", "authenticated", "s-1");

        let session = provider.authenticate(Some(&token)).await.unwrap();
        provider.authenticate(Some(&token)).await.unwrap();

        assert_eq!(session.user_id, "user-1");
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn { user_id: "user-1".to_string() });
        assert!(events.try_recv().is_err());
        assert_eq!(provider.active_sessions(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_wrong_audience() {
        let provider = provider();

        assert!(matches!(provider.authenticate(None).await, Err(SessionError::MissingToken)));
        assert!(matches!(provider.authenticate(Some("  ")).await, Err(SessionError::MissingToken)));

        let token = token("user-1", "anon", "s-1");
        assert!(matches!(
            provider.authenticate(Some(&token)).await,
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_out_revokes() {
        let provider = provider();
        let token = token("user-2", "authenticated", "s-2");
        let session = provider.authenticate(Some(&token)).await.unwrap();

        provider
            .store_profile(Profile {
                id: "user-2".to_string(),
                username: "sam".to_string(),
                phone_number: None,
                dietary_preferences: None,
                allergies: None,
            })
            .await;

        let mut events = provider.subscribe();
        provider.sign_out(&session).await;

        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut { user_id: "user-2".to_string() });
        assert!(matches!(provider.authenticate(Some(&token)).await, Err(SessionError::Revoked)));
        assert!(provider.cached_profile("user-2").await.is_none());
        assert_eq!(provider.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_forgotten() {
        let provider = provider();
        let first = token_valid_for("user-5", "authenticated", "short-0", 1);
        provider.authenticate(Some(&first)).await.unwrap();

        for i in 1..50 {
            let token = token_valid_for("user-5", "authenticated", &format!("short-{}", i), 1);
            provider.authenticate(Some(&token)).await.unwrap();
        }

        let revoked_token = token_valid_for("user-6", "authenticated", "short-revoked", 1);
        let revoked = provider.authenticate(Some(&revoked_token)).await.unwrap();
        provider.sign_out(&revoked).await;

        assert_eq!(provider.active_sessions(), 50);
        assert_eq!(provider.revoked.iter().count(), 1);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        provider.sessions.run_pending_tasks().await;
        provider.revoked.run_pending_tasks().await;

        assert_eq!(provider.active_sessions(), 0);
        assert_eq!(provider.revoked.iter().count(), 0);

        assert!(matches!(
            provider.authenticate(Some(&first)).await,
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_sign_in_and_out_leave_no_live_session() {
        let provider = std::sync::Arc::new(provider());
        let token = token("user-7", "authenticated", "s-7");
        let session = provider.authenticate(Some(&token)).await.unwrap();
        provider.sign_out(&session).await;

        let mut events = provider.subscribe();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                let token = token.clone();
                tokio::spawn(async move { provider.authenticate(Some(&token)).await.is_ok() })
            })
            .collect();

        for handle in handles {
            assert!(!handle.await.unwrap());
        }
        assert_eq!(provider.active_sessions(), 0);
        assert!(events.try_recv().is_err());
    }
}
