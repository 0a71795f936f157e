//! crates/adpatterns_core/src/account.rs
//!
//! The signed-in session and the (demo) connected ad accounts.

use crate::domain::AdAccount;
use crate::ports::{AuthService, PortError, Registration};
use crate::store::DraftStore;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// A local check failed before anything was sent.
    #[error("{0}")]
    Invalid(&'static str),
    /// The backend refused, with its own message when it sent one.
    #[error("{0}")]
    Rejected(String),
    /// The backend accepted the credentials but the session could not be stored.
    #[error("Signed in, but the session could not be saved. Please try again.")]
    Unsaved,
}

fn remember(store: &DraftStore, token: &str, email: &str) -> Result<(), AuthError> {
    if store.save_session(token, email) {
        Ok(())
    } else {
        warn!("Session for {} could not be persisted", email);
        Err(AuthError::Unsaved)
    }
}

fn rejected(e: PortError, fallback: &str) -> AuthError {
    match e {
        PortError::Rejected(detail) if !detail.trim().is_empty() => AuthError::Rejected(detail),
        other => {
            warn!("Auth request failed: {}", other);
            AuthError::Rejected(fallback.to_string())
        }
    }
}

/// Signs in and stores the access token together with the email.
pub async fn login(
    service: &dyn AuthService,
    store: &DraftStore,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Invalid("Please enter both email and password."));
    }
    let token = service
        .login(email, password)
        .await
        .map_err(|e| rejected(e, "Login failed"))?;
    remember(store, &token, email)?;
    info!("Signed in as {}", email);
    Ok(token)
}

/// Creates an account, then stores its token like a login would.
pub async fn register(
    service: &dyn AuthService,
    store: &DraftStore,
    registration: &Registration,
) -> Result<String, AuthError> {
    let fields = [
        &registration.full_name,
        &registration.email,
        &registration.phone_number,
        &registration.password,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AuthError::Invalid("Please fill in all fields."));
    }
    if registration.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::Invalid("Password must be at least 6 characters."));
    }
    let token = service
        .register(registration)
        .await
        .map_err(|e| rejected(e, "Registration failed"))?;
    remember(store, &token, registration.email.trim())?;
    info!("Registered {}", registration.email.trim());
    Ok(token)
}

pub fn logout(store: &DraftStore) {
    store.clear_session();
}

//=========================================================================================
// Demo Ad Accounts
//=========================================================================================

fn seed_account() -> AdAccount {
    AdAccount {
        id: "1234567890".to_string(),
        name: "AdPatterns - Main".to_string(),
        connected_at: "2025-11-02".to_string(),
        platform: "Meta".to_string(),
    }
}

/// The connected accounts; seeded with one Meta account on first use.
pub fn list_accounts(store: &DraftStore) -> Vec<AdAccount> {
    match store.accounts() {
        Some(accounts) => accounts,
        None => {
            let seeded = vec![seed_account()];
            store.save_accounts(&seeded);
            seeded
        }
    }
}

/// Connects a demo Meta account, listed first.
pub fn connect_demo_account(store: &DraftStore, now: DateTime<Utc>) -> Vec<AdAccount> {
    let millis = now.timestamp_millis().to_string();
    let id = millis[millis.len().saturating_sub(10)..].to_string();
    let account = AdAccount {
        id,
        name: "Meta Business - Demo".to_string(),
        connected_at: now.format("%Y-%m-%d").to_string(),
        platform: "Meta".to_string(),
    };
    let mut accounts = list_accounts(store);
    accounts.insert(0, account);
    store.save_accounts(&accounts);
    accounts
}

/// Removes an account by id. Unknown ids leave the list unchanged.
pub fn disconnect_account(store: &DraftStore, id: &str) -> Vec<AdAccount> {
    let mut accounts = list_accounts(store);
    accounts.retain(|a| a.id != id);
    store.save_accounts(&accounts);
    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct FakeAuth {
        answer: Mutex<Option<PortResult<String>>>,
    }

    impl FakeAuth {
        fn answering(answer: PortResult<String>) -> Self {
            Self { answer: Mutex::new(Some(answer)) }
        }
    }

    #[async_trait]
    impl AuthService for FakeAuth {
        async fn login(&self, _email: &str, _password: &str) -> PortResult<String> {
            self.answer.lock().unwrap().take().unwrap_or(Err(PortError::Unauthorized))
        }

        async fn register(&self, _registration: &Registration) -> PortResult<String> {
            self.answer.lock().unwrap().take().unwrap_or(Err(PortError::Unauthorized))
        }
    }

    fn store() -> DraftStore {
        DraftStore::new(Arc::new(MemoryStore::new()))
    }

    fn registration(password: &str) -> Registration {
        Registration {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "9999999999".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_stores_token_and_email() {
        let store = store();
        let service = FakeAuth::answering(Ok("tok".to_string()));
        let token = login(&service, &store, " ada@example.com ", "secret").await.unwrap();
        assert_eq!(token, "tok");
        assert_eq!(store.auth_token().as_deref(), Some("tok"));
        assert_eq!(store.user_email().as_deref(), Some("ada@example.com"));

        logout(&store);
        assert_eq!(store.auth_token(), None);
        assert_eq!(store.user_email(), None);
    }

    #[tokio::test]
    async fn login_checks_fields_locally() {
        let service = FakeAuth::answering(Ok("tok".to_string()));
        let err = login(&service, &store(), "", "secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter both email and password.");
        assert!(service.answer.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn login_surfaces_server_detail() {
        let store = store();
        let service = FakeAuth::answering(Err(PortError::Rejected("Incorrect email or password".to_string())));
        let err = login(&service, &store, "ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("Incorrect email or password".to_string()));
        assert_eq!(store.auth_token(), None);
    }

    #[tokio::test]
    async fn register_validates_before_calling() {
        let service = FakeAuth::answering(Ok("tok".to_string()));
        let mut missing = registration("secret");
        missing.phone_number = " ".to_string();
        assert_eq!(
            register(&service, &store(), &missing).await,
            Err(AuthError::Invalid("Please fill in all fields."))
        );
        assert_eq!(
            register(&service, &store(), &registration("12345")).await,
            Err(AuthError::Invalid("Password must be at least 6 characters."))
        );

        let store = store();
        assert_eq!(register(&service, &store, &registration("123456")).await, Ok("tok".to_string()));
        assert_eq!(store.user_email().as_deref(), Some("ada@example.com"));
    }

    struct ReadOnlyStore;

    impl crate::ports::KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> PortResult<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Unexpected("read-only".to_string()))
        }
        fn remove(&self, _key: &str) -> PortResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unsaved_session_is_reported() {
        let store = DraftStore::new(Arc::new(ReadOnlyStore));
        let service = FakeAuth::answering(Ok("tok".to_string()));
        let err = login(&service, &store, "ada@example.com", "secret").await.unwrap_err();
        assert_eq!(err, AuthError::Unsaved);

        let service = FakeAuth::answering(Ok("tok".to_string()));
        let err = register(&service, &store, &registration("123456")).await.unwrap_err();
        assert_eq!(err, AuthError::Unsaved);
    }

    #[test]
    fn accounts_are_seeded_then_edited() {
        let store = store();
        assert_eq!(list_accounts(&store), vec![seed_account()]);

        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let accounts = connect_demo_account(&store, now);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].name, "Meta Business - Demo");
        assert_eq!(accounts[0].connected_at, "2026-03-04");
        assert_eq!(accounts[0].id.len(), 10);
        assert_eq!(store.accounts(), Some(accounts.clone()));

        let remaining = disconnect_account(&store, "1234567890");
        assert_eq!(remaining, vec![accounts[0].clone()]);
        assert_eq!(disconnect_account(&store, "nope"), remaining);
    }
}
