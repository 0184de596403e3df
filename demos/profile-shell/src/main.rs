use std::sync::{Arc, Mutex};
use std::time::Duration;

use sessiongate::prelude::*;
use sessiongate::telemetry;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

/// Auth provider whose notifications are pushed by `main`.
struct ScriptedAuth {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<AuthNotification>>>,
    password: Mutex<String>,
}

impl ScriptedAuth {
    fn new(password: &str) -> (Self, mpsc::UnboundedSender<AuthNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let auth = Self {
            receiver: Mutex::new(Some(rx)),
            password: Mutex::new(password.to_owned()),
        };
        (auth, tx)
    }
}

impl AuthProvider for ScriptedAuth {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthNotification> {
        // A second subscriber gets a closed channel.
        match self.receiver.lock() {
            Ok(mut slot) => slot.take().unwrap_or_else(|| mpsc::unbounded_channel().1),
            Err(_) => mpsc::unbounded_channel().1,
        }
    }

    async fn change_password(&self, current: &str, new: &str) -> Result<(), PasswordChangeError> {
        let mut password = self
            .password
            .lock()
            .map_err(|_| PasswordChangeError::Rejected("credential store poisoned".into()))?;
        if *password != current {
            return Err(PasswordChangeError::Rejected("current password is incorrect".into()));
        }
        *password = new.to_owned();
        Ok(())
    }
}

/// Prints every redirect and tracks which route group is on screen.
struct ConsoleRouter {
    group: Mutex<RouteGroup>,
}

impl Navigator for ConsoleRouter {
    fn current_group(&self) -> RouteGroup {
        self.group.lock().map(|g| *g).unwrap_or(RouteGroup::Public)
    }

    fn replace_route(&self, route: &Route) -> Result<(), NavigationError> {
        eprintln!("  -> navigate to {route}");
        let group = if route == &Route::home() {
            RouteGroup::App
        } else {
            RouteGroup::Public
        };
        let mut current = self
            .group
            .lock()
            .map_err(|_| NavigationError::Failed("router state poisoned".into()))?;
        *current = group;
        Ok(())
    }
}

struct ConsolePresence;

impl PresenceReporter for ConsolePresence {
    async fn report_liveness(&self, user_id: &UserId) -> Result<(), LivenessError> {
        eprintln!("  <3 {user_id} is online");
        Ok(())
    }
}

struct ConsoleProfiles;

impl ProfileApi for ConsoleProfiles {
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError> {
        let body =
            serde_json::to_string(update).map_err(|e| ProfileError::Update(e.to_string()))?;
        eprintln!("  PATCH /profiles/{user_id} {body}");
        Ok(())
    }
}

struct ConsoleMedia;

impl MediaStore for ConsoleMedia {
    async fn upload(&self, path: &str, upload: &MediaUpload) -> Result<String, ProfileError> {
        eprintln!("  PUT /media/{path} ({} bytes)", upload.bytes.len());
        Ok(format!("memory://media/{path}"))
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn load_config() -> Result<SessionGateConfig, SessionGateError> {
    match std::env::args().nth(1) {
        Some(path) => SessionGateConfig::from_json_file(path),
        None => Ok(SessionGateConfig {
            liveness: sessiongate::LivenessConfig::with_interval(Duration::from_secs(2)),
            ..SessionGateConfig::default()
        }),
    }
}

fn print_snapshot(gate_snapshot: &SessionSnapshot) {
    match serde_json::to_string(gate_snapshot) {
        Ok(json) => eprintln!("session: {json}"),
        Err(e) => tracing::warn!(error = %e, "snapshot not printable"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();
    let config = load_config()?;

    let (auth, provider) = ScriptedAuth::new("hunter2");
    let router = Arc::new(ConsoleRouter {
        group: Mutex::new(RouteGroup::Public),
    });
    let gate = SessionGate::<ScriptedAuth, ConsolePresence>::builder()
        .config(config)
        .start(auth, router, Arc::new(ConsolePresence));

    eprintln!("cold start: cached credentials flicker");
    let alice = User::new("u-1", "alice").with_email("alice@example.com");
    provider.send(AuthNotification::signed_out())?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    provider.send(AuthNotification::signed_in(alice))?;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    print_snapshot(&gate.snapshot());

    eprintln!("profile edits");
    let profile = gate.profile(Arc::new(ConsoleProfiles), Arc::new(ConsoleMedia));
    profile.rename("  alice_in_chains ").await?;
    profile
        .set_avatar(MediaUpload {
            file_name: "avatar.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        })
        .await?;
    if let Err(e) = profile.change_password("wrong", "s3cret").await {
        eprintln!("  password change refused: {}", e.reason());
    }
    profile.change_password("hunter2", "s3cret").await?;
    print_snapshot(&gate.snapshot());

    tokio::time::sleep(Duration::from_secs(5)).await;
    eprintln!("liveness: {:?}", gate.liveness_metrics());

    eprintln!("sign out");
    provider.send(AuthNotification::signed_out())?;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    print_snapshot(&gate.snapshot());

    gate.shutdown().await;
    Ok(())
}
