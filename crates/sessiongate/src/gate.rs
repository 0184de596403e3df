//! `SessionGate` builder and composition root.
//!
//! This is the entry point for running SessionGate. It ties together all
//! the layers: auth provider → session store → route guard and liveness
//! reporter.

use std::sync::Arc;

use sessiongate_guard::{spawn_guard, GuardConfig, GuardHandle, Navigator, RouteGuard};
use sessiongate_liveness::{
    LivenessConfig, LivenessMetrics, LivenessReporter, PresenceReporter,
};
use sessiongate_session::{AuthProvider, SessionStore};
use sessiongate_types::SessionSnapshot;
use tokio::task::JoinHandle;

use crate::{
    MediaStore, ProfileApi, ProfileService, SessionGateConfig, SessionGateError,
};

/// Builder for configuring and starting a [`SessionGate`].
///
/// # Example
///
/// ```rust,ignore
/// use sessiongate::prelude::*;
///
/// let gate = SessionGate::builder()
///     .config(SessionGateConfig::from_json_file("sessiongate.json")?)
///     .start(my_auth, Arc::new(my_router), Arc::new(my_presence));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionGateBuilder {
    config: SessionGateConfig,
}

impl SessionGateBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: SessionGateConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the route guard configuration.
    pub fn guard_config(mut self, config: GuardConfig) -> Self {
        self.config.guard = config;
        self
    }

    /// Sets the liveness reporter configuration.
    pub fn liveness_config(mut self, config: LivenessConfig) -> Self {
        self.config.liveness = config;
        self
    }

    /// Wires the collaborators together and starts every background task.
    ///
    /// Must be called from inside a Tokio runtime. The session starts as
    /// `Unknown` and follows the provider from its first notification on.
    pub fn start<A, N, P>(
        self,
        auth: A,
        navigator: Arc<N>,
        presence: Arc<P>,
    ) -> SessionGate<A, P>
    where
        A: AuthProvider,
        N: Navigator,
        P: PresenceReporter,
    {
        let config = self.config.validated();
        let store = SessionStore::new();

        // Observers subscribe before the pump starts, so none of them can
        // miss the provider's first notification.
        let guard = spawn_guard(
            RouteGuard::new(config.guard, navigator),
            store.subscribe(),
        );
        let mut liveness =
            LivenessReporter::new(config.liveness, store.subscribe(), presence);
        liveness.start();

        let auth = Arc::new(auth);
        let pump = store.follow(auth.subscribe());

        tracing::info!("session gate running");

        SessionGate {
            store,
            auth,
            guard,
            liveness,
            pump,
        }
    }
}

/// A running session gate.
///
/// Owns the session store and every background task. Call
/// [`shutdown`](Self::shutdown) on teardown; dropping the gate also stops
/// the liveness timer and the notification pump.
pub struct SessionGate<A: AuthProvider, P: PresenceReporter> {
    store: SessionStore,
    auth: Arc<A>,
    guard: GuardHandle,
    liveness: LivenessReporter<P>,
    pump: JoinHandle<()>,
}

impl<A: AuthProvider, P: PresenceReporter> SessionGate<A, P> {
    /// Creates a new builder.
    pub fn builder() -> SessionGateBuilder {
        SessionGateBuilder::new()
    }

    /// The session store. Clone it to hand read access to UI code.
    pub fn session(&self) -> &SessionStore {
        &self.store
    }

    /// The current session snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.read()
    }

    /// Handle to the running route guard.
    pub fn guard(&self) -> &GuardHandle {
        &self.guard
    }

    /// Tells the guard the active screen changed.
    pub async fn route_changed(&self) -> Result<(), SessionGateError> {
        self.guard.reevaluate().await?;
        Ok(())
    }

    /// Liveness counters since start.
    pub fn liveness_metrics(&self) -> LivenessMetrics {
        self.liveness.metrics()
    }

    pub fn auth(&self) -> &Arc<A> {
        &self.auth
    }

    /// Profile operations for the signed-in user, backed by this gate's
    /// session and auth provider.
    pub fn profile<Api, M>(
        &self,
        api: Arc<Api>,
        media: Arc<M>,
    ) -> ProfileService<A, Api, M>
    where
        Api: ProfileApi,
        M: MediaStore,
    {
        ProfileService::new(self.store.clone(), Arc::clone(&self.auth), api, media)
    }

    /// Stops every background task and resets the session to `Unknown`.
    pub async fn shutdown(mut self) {
        self.liveness.stop();
        self.guard.shutdown().await;
        self.pump.abort();
        self.store.reset();
        tracing::info!("session gate stopped");
    }
}

impl<A: AuthProvider, P: PresenceReporter> Drop for SessionGate<A, P> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
