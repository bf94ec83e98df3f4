//! Test support for Schoolyard integration tests.
//!
//! Provides mock implementations of the session controller's collaborator
//! traits plus a [`TestContext`] that wires a controller to all three mocks.
//! The scenario tests in `tests/` drive the controller exclusively through
//! these.
//!
//! # Test Categories
//!
//! - `session_lifecycle` - Initialization, idempotency, teardown
//! - `session_routing` - Role resolution and navigation decisions
//! - `session_signout` - Sign-out, pre-emption, and hard reset

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::mpsc;

use schoolyard_core::{
    AreaToken, Email, Identity, OrganizationId, Profile, Role, Session, UserId,
};
use schoolyard_session::{
    AuthChange, IdentityError, IdentityProvider, LookupError, Navigator, NavigationError,
    ProfileStore, SessionConfig, SessionController,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock identity provider
// =============================================================================

/// In-memory identity provider with a controllable session and event stream.
#[derive(Default)]
pub struct MockIdentityProvider {
    session: Mutex<Option<Session>>,
    senders: Mutex<Vec<mpsc::UnboundedSender<AuthChange>>>,
    subscriptions: AtomicUsize,
    sign_out_calls: AtomicUsize,
    fail_sign_out: AtomicBool,
    fail_get_session: AtomicBool,
}

impl MockIdentityProvider {
    /// Provider with no current session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose initial probe resolves with `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        let provider = Self::default();
        *lock(&provider.session) = Some(session);
        provider
    }

    /// Replace the session the next probe resolves with.
    pub fn set_session(&self, session: Option<Session>) {
        *lock(&self.session) = session;
    }

    /// Push an event to every subscriber.
    pub fn emit(&self, change: &AuthChange) {
        for sender in lock(&self.senders).iter() {
            let _ = sender.send(change.clone());
        }
    }

    /// Make subsequent `sign_out` calls fail.
    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `get_session` calls fail.
    pub fn set_fail_get_session(&self, fail: bool) {
        self.fail_get_session.store(fail, Ordering::SeqCst);
    }

    /// How many times `subscribe` has been called.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    /// How many times `sign_out` has been called.
    #[must_use]
    pub fn sign_out_count(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        if self.fail_get_session.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("mock probe failure".to_owned()));
        }
        Ok(lock(&self.session).clone())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::SignOutRejected(
                "mock sign-out failure".to_owned(),
            ));
        }
        *lock(&self.session) = None;
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthChange> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.senders).push(sender);
        receiver
    }
}

// =============================================================================
// Mock profile store
// =============================================================================

/// In-memory profile store with configurable latency and failure.
#[derive(Default)]
pub struct MockProfileStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
    delay: Mutex<Option<Duration>>,
    fail: AtomicBool,
    lookups: AtomicUsize,
}

impl MockProfileStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile record.
    pub fn insert(&self, profile: Profile) {
        lock(&self.profiles).insert(profile.id, profile);
    }

    /// Delay every lookup by `delay` (simulates a slow query).
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Make subsequent lookups fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// How many lookups have been issued.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn profile_by_id(&self, id: UserId) -> Result<Option<Profile>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(LookupError::Query("mock lookup failure".to_owned()));
        }
        Ok(lock(&self.profiles).get(&id).cloned())
    }
}

// =============================================================================
// Recording navigator
// =============================================================================

/// Navigator that records every transition instead of performing it.
#[derive(Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<AreaToken>>,
    fail: AtomicBool,
}

impl RecordingNavigator {
    /// Navigator that accepts every transition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent transitions fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every area the controller navigated to, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<AreaToken> {
        lock(&self.calls).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, area: AreaToken) -> Result<(), NavigationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NavigationError::Rejected(
                "mock navigator failure".to_owned(),
            ));
        }
        lock(&self.calls).push(area);
        Ok(())
    }
}

// =============================================================================
// Test context and builders
// =============================================================================

/// A session controller wired to fresh mocks.
pub struct TestContext {
    /// The controller under test.
    pub controller: SessionController,
    /// Mock identity provider behind the controller.
    pub identity: Arc<MockIdentityProvider>,
    /// Mock profile store behind the controller.
    pub profiles: Arc<MockProfileStore>,
    /// Recording navigator behind the controller.
    pub navigator: Arc<RecordingNavigator>,
}

impl TestContext {
    /// Context with default timing configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Context with explicit timing configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let identity = Arc::new(MockIdentityProvider::new());
        let profiles = Arc::new(MockProfileStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let controller = SessionController::new(
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
            Arc::clone(&profiles) as Arc<dyn ProfileStore>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            config,
        );
        Self {
            controller,
            identity,
            profiles,
            navigator,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a session for `user_id`.
///
/// # Panics
///
/// Panics if `email` is not a structurally valid address.
#[must_use]
pub fn session_for(user_id: UserId, email: &str) -> Session {
    Session {
        access_token: SecretString::from("test-access-token"),
        refresh_token: SecretString::from("test-refresh-token"),
        expires_at: Utc::now() + chrono::Duration::hours(1),
        identity: Identity {
            id: user_id,
            email: Email::parse(email).expect("test email must be valid"),
            attributes: serde_json::json!({}),
        },
    }
}

/// Build a profile record for `user_id`.
#[must_use]
pub fn profile_for(user_id: UserId, role: Role, organization_id: Option<OrganizationId>) -> Profile {
    Profile {
        id: user_id,
        full_name: "Avery Example".to_owned(),
        role,
        organization_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Let every queued task and timer run.
///
/// The scenario tests run with a paused clock, so sleeping here advances
/// virtual time past pending navigation delays, lookups, and cooldowns
/// without wall-clock cost.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Install a test subscriber once per process so failing tests print the
/// controller's tracing output.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
