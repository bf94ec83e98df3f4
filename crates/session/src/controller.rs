//! The session controller.
//!
//! Owns the canonical authentication state for the application process,
//! reconciles the startup session probe with the identity provider's
//! auth-change stream, and drives role-based navigation with an in-flight
//! guard so concurrent triggers produce exactly one transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use schoolyard_core::{AreaToken, Session, UserId};

use crate::config::SessionConfig;
use crate::provider::{AuthChange, IdentityProvider, Navigator, ProfileStore};
use crate::state::{ControllerState, SessionSnapshot};

/// Process-wide authentication session and role-routing controller.
///
/// Construct one instance at the application root and clone handles freely;
/// all clones share the same state. [`SessionController::start`] is
/// idempotent, so multiple consumers mounting at once cannot create
/// duplicate stream subscriptions.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    navigator: Arc<dyn Navigator>,
    config: SessionConfig,
    state: Mutex<ControllerState>,
    /// Guards against a second concurrent initialization. Reset on both the
    /// sign-out path and on shutdown.
    initialized: AtomicBool,
    /// At most one navigation decision is in flight at any instant.
    navigation_in_flight: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, ControllerState> {
        // A poisoned lock only means a panicked test task; the state itself
        // is still consistent because every critical section is a plain
        // field write.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listener_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionController {
    /// Create a controller over the given collaborators.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                identity,
                profiles,
                navigator,
                config,
                state: Mutex::new(ControllerState::default()),
                initialized: AtomicBool::new(false),
                navigation_in_flight: AtomicBool::new(false),
                listener: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Initialize the controller: subscribe to the auth-change stream and
    /// probe for an existing session.
    ///
    /// Calling this again while already initialized is a no-op.
    ///
    /// A failed probe is deliberately terminal for initialization: the
    /// controller settles into the unauthenticated state and stays
    /// initialized rather than resetting the guard. The stream subscription
    /// is already live at that point, so a later sign-in still arrives and
    /// recovers the session without a restart; the probe itself is not
    /// retried.
    pub async fn start(&self) {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            debug!("session controller already initialized, skipping");
            return;
        }
        debug!("initializing session controller");

        // Subscribe before probing so a sign-in racing the probe is not
        // missed; the in-flight guard keeps the two paths from navigating
        // twice for the same sign-in.
        let mut events = self.inner.identity.subscribe();
        let listener = {
            let controller = self.clone();
            tokio::spawn(async move {
                while let Some(change) = events.recv().await {
                    controller.handle_change(change);
                }
            })
        };
        if let Some(previous) = self.inner.listener_slot().replace(listener) {
            previous.abort();
        }

        match self.inner.identity.get_session().await {
            Ok(Some(session)) => self.apply_session(session),
            Ok(None) => {
                debug!("initial session probe: not authenticated");
                self.inner.state().loading = false;
            }
            Err(err) => {
                error!(error = %err, "initial session probe failed");
                self.inner.state().loading = false;
            }
        }
    }

    /// Tear down the stream subscription.
    ///
    /// A later [`SessionController::start`] will subscribe again.
    pub fn shutdown(&self) {
        if let Some(listener) = self.inner.listener_slot().take() {
            listener.abort();
        }
        self.inner.initialized.store(false, Ordering::SeqCst);
        debug!("session controller shut down");
    }

    /// Read-only snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state();
        SessionSnapshot {
            session: state.session.clone(),
            identity: state.identity.clone(),
            profile: state.profile.clone(),
            loading: state.loading,
        }
    }

    /// Whether a navigation decision is currently in flight.
    #[must_use]
    pub fn navigation_in_flight(&self) -> bool {
        self.inner.navigation_in_flight.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Sign the current user out.
    ///
    /// The profile is cleared optimistically before the provider call
    /// completes. Navigation is not triggered here: the `SignedOut` stream
    /// event is the single source of truth for the unauthenticated
    /// transition.
    pub async fn sign_out(&self) {
        debug!("user signing out");
        self.inner.state().profile = None;
        if let Err(err) = self.inner.identity.sign_out().await {
            error!(error = %err, "sign-out call failed");
        }
    }

    /// Hard reset: synchronously drop all local state and force a sign-out.
    ///
    /// If the provider call fails it may never emit `SignedOut`, so this
    /// path falls back to routing to login directly instead of waiting on
    /// the stream.
    pub async fn clear_session(&self) {
        warn!("clearing session and forcing logout");
        {
            let mut state = self.inner.state();
            state.loading = true;
            state.session = None;
            state.identity = None;
            state.profile = None;
        }

        let result = self.inner.identity.sign_out().await;
        self.inner.state().loading = false;

        if let Err(err) = result {
            error!(error = %err, "sign-out failed while clearing session, routing to login");
            self.navigate_to(AreaToken::Login, true);
        }
    }

    // =========================================================================
    // Internal state machine
    // =========================================================================

    /// Single entry point for both the startup probe and the stream's
    /// sign-in events: commit the session, then resolve the profile.
    fn apply_session(&self, session: Session) {
        let identity = session.identity.clone();
        {
            let mut state = self.inner.state();
            state.session = Some(session);
            state.identity = Some(identity.clone());
        }

        // Resolution runs as its own task so a sign-out arriving on the
        // stream can pre-empt a pending lookup.
        let controller = self.clone();
        tokio::spawn(async move {
            controller.resolve_profile(identity.id).await;
        });
    }

    fn handle_change(&self, change: AuthChange) {
        match change {
            AuthChange::SignedIn(session) => {
                debug!("auth state change: signed in");
                self.apply_session(session);
            }
            AuthChange::InitialSession(Some(session)) => {
                let already_resolved = self
                    .inner
                    .state()
                    .profile
                    .as_ref()
                    .is_some_and(|profile| profile.id == session.identity.id);
                if already_resolved {
                    debug!("initial session replay for an already-resolved profile");
                    self.inner.state().loading = false;
                } else {
                    debug!("auth state change: initial session");
                    self.apply_session(session);
                }
            }
            AuthChange::InitialSession(None) => {
                self.inner.state().loading = false;
            }
            AuthChange::TokenRefreshed(session) => {
                debug!("auth state change: token refreshed");
                let mut state = self.inner.state();
                state.identity = Some(session.identity.clone());
                state.session = Some(session);
                state.loading = false;
            }
            AuthChange::SignedOut => {
                debug!("auth state change: signed out");
                {
                    let mut state = self.inner.state();
                    state.session = None;
                    state.identity = None;
                    state.profile = None;
                    state.loading = false;
                }
                // Permit a later start() to re-subscribe after a full
                // restart of the application shell.
                self.inner.initialized.store(false, Ordering::SeqCst);
                // Sign-out always wins over an in-flight transition.
                self.navigate_to(AreaToken::Login, true);
            }
            AuthChange::PasswordRecovery => {
                self.inner.state().loading = false;
            }
        }
    }

    /// Fetch the role record for `user_id` and navigate accordingly.
    async fn resolve_profile(&self, user_id: UserId) {
        if self.inner.navigation_in_flight.load(Ordering::SeqCst) {
            // The transition already in flight will have resolved the
            // profile itself.
            debug!(%user_id, "navigation in flight, skipping profile fetch");
            return;
        }

        match self.inner.profiles.profile_by_id(user_id).await {
            Ok(Some(profile)) => {
                let target = profile.target_area();
                {
                    let mut state = self.inner.state();
                    // A sign-out or a newer sign-in may have landed while
                    // the lookup was pending; a stale result must not
                    // overwrite the newer state.
                    let still_current = state
                        .identity
                        .as_ref()
                        .is_some_and(|identity| identity.id == user_id);
                    if !still_current {
                        debug!(%user_id, "identity changed during profile fetch, discarding result");
                        return;
                    }
                    debug!(%user_id, role = %profile.role, "profile resolved");
                    state.profile = Some(profile);
                    state.loading = false;
                }
                self.navigate_to(target, false);
            }
            Ok(None) => {
                error!(%user_id, "no profile record found");
                self.finish_failed_resolution();
            }
            Err(err) => {
                error!(%user_id, error = %err, "profile lookup failed");
                self.finish_failed_resolution();
            }
        }
    }

    fn finish_failed_resolution(&self) {
        self.inner.state().loading = false;
        if !self.inner.navigation_in_flight.load(Ordering::SeqCst) {
            self.navigate_to(AreaToken::Login, false);
        }
    }

    /// Issue a navigation decision.
    ///
    /// `force` is reserved for the sign-out paths, which must always win
    /// over an in-flight transition.
    fn navigate_to(&self, target: AreaToken, force: bool) {
        if force {
            self.inner
                .navigation_in_flight
                .store(true, Ordering::SeqCst);
        } else {
            if self.inner.state().loading {
                // Never navigate on non-terminal state.
                debug!(area = %target, "still loading, deferring navigation");
                return;
            }
            if self
                .inner
                .navigation_in_flight
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                debug!(area = %target, "navigation already in flight, skipping");
                return;
            }
        }

        debug!(area = %target, "navigating");

        // Let the state update commit before the view stack changes.
        let controller = self.clone();
        tokio::spawn(async move {
            sleep(controller.inner.config.navigation_delay).await;
            if let Err(err) = controller.inner.navigator.replace(target) {
                error!(area = %target, error = %err, "navigation failed");
            }
        });

        // Liveness safeguard: release the guard after the cooldown whether
        // or not the scheduled navigation fired.
        let controller = self.clone();
        tokio::spawn(async move {
            sleep(controller.inner.config.navigation_cooldown).await;
            controller
                .inner
                .navigation_in_flight
                .store(false, Ordering::SeqCst);
        });
    }
}
