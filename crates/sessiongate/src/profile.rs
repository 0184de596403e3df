//! Profile operations for the signed-in user.
//!
//! Username edits, avatar replacement and password changes all need the
//! same two things: the current session (to know whose profile this is)
//! and an external service to do the actual work. [`ProfileService`]
//! ties those together and keeps the session snapshot in step with what
//! the services accepted.
//!
//! Picking an image, encoding it, and presenting results are UI work
//! and stay outside; this module receives bytes and returns values.

use std::sync::Arc;

use serde::Serialize;
use sessiongate_session::{AuthProvider, PasswordChangeError, SessionStore};
use sessiongate_types::{User, UserId};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// External services
// ---------------------------------------------------------------------------

/// Partial profile update sent to the profile API. `None` fields are
/// left untouched (and omitted from the JSON body).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// An image ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// Original file name, e.g. `"me.jpg"`.
    pub file_name: String,
    /// MIME type, e.g. `"image/jpeg"`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The user-profile backend.
pub trait ProfileApi: Send + Sync + 'static {
    /// Applies `update` to `user_id`'s stored profile.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError>;
}

/// Object storage for user media.
pub trait MediaStore: Send + Sync + 'static {
    /// Stores `upload` at `path` and returns its public URL.
    async fn upload(
        &self,
        path: &str,
        upload: &MediaUpload,
    ) -> Result<String, ProfileError>;
}

/// Why a profile operation failed. Shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Nobody is signed in.
    #[error("you must be signed in to edit your profile")]
    NotAuthenticated,

    /// The new username was blank.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The image had no bytes.
    #[error("image is empty")]
    EmptyUpload,

    /// Object storage refused the upload.
    #[error("failed to upload image: {0}")]
    Upload(String),

    /// The profile API refused the update.
    #[error("failed to update profile: {0}")]
    Update(String),

    /// The session changed to a different user while the request was in
    /// flight; the result was not applied locally.
    #[error("signed-in user changed during the update")]
    SessionChanged,
}

// ---------------------------------------------------------------------------
// ProfileService
// ---------------------------------------------------------------------------

/// Profile operations bound to the current session.
///
/// Cheap to build; [`SessionGate::profile`](crate::SessionGate::profile)
/// hands one out with the gate's store and auth provider already wired.
pub struct ProfileService<A, P, M> {
    store: SessionStore,
    auth: Arc<A>,
    api: Arc<P>,
    media: Arc<M>,
}

impl<A, P, M> ProfileService<A, P, M>
where
    A: AuthProvider,
    P: ProfileApi,
    M: MediaStore,
{
    pub fn new(
        store: SessionStore,
        auth: Arc<A>,
        api: Arc<P>,
        media: Arc<M>,
    ) -> Self {
        Self {
            store,
            auth,
            api,
            media,
        }
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    /// - [`PasswordChangeError::MissingField`]: either password is empty
    /// - [`PasswordChangeError::NotAuthenticated`]: nobody is signed in
    /// - [`PasswordChangeError::Rejected`]: the provider said no; carries
    ///   its reason
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
    ) -> Result<(), PasswordChangeError> {
        if current.is_empty() || new.is_empty() {
            return Err(PasswordChangeError::MissingField);
        }
        let user_id = self
            .store
            .read()
            .user_id()
            .cloned()
            .ok_or(PasswordChangeError::NotAuthenticated)?;

        match self.auth.change_password(current, new).await {
            Ok(()) => {
                info!(%user_id, "password changed");
                Ok(())
            }
            Err(e) => {
                debug!(%user_id, reason = %e, "password change rejected");
                Err(e)
            }
        }
    }

    /// Renames the signed-in user. Sets both `username` and `full_name`.
    ///
    /// Returns the updated user record.
    pub async fn rename(&self, username: &str) -> Result<User, ProfileError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let user = self.current_user()?;

        let update = ProfileUpdate {
            username: Some(username.to_string()),
            full_name: Some(username.to_string()),
            ..Default::default()
        };
        self.api.update_profile(&user.id, &update).await.inspect_err(|e| {
            warn!(user_id = %user.id, error = %e, "username update failed");
        })?;

        self.apply_locally(&user.id, |u| u.display_name = username.to_string())?;
        info!(user_id = %user.id, "username updated");
        self.current_user()
    }

    /// Uploads a new avatar and points the profile at it.
    ///
    /// Returns the avatar's public URL.
    pub async fn set_avatar(&self, upload: MediaUpload) -> Result<String, ProfileError> {
        if upload.bytes.is_empty() {
            return Err(ProfileError::EmptyUpload);
        }
        let user = self.current_user()?;

        let path = format!(
            "{}/images/profile_pic_{}{}",
            user.id, user.display_name, upload.file_name
        );
        let url = self.media.upload(&path, &upload).await.inspect_err(|e| {
            warn!(user_id = %user.id, %path, error = %e, "avatar upload failed");
        })?;

        let update = ProfileUpdate {
            profile_pic: Some(url.clone()),
            ..Default::default()
        };
        self.api.update_profile(&user.id, &update).await.inspect_err(|e| {
            warn!(user_id = %user.id, error = %e, "avatar update failed");
        })?;

        self.apply_locally(&user.id, |u| u.avatar = Some(url.clone()))?;
        info!(user_id = %user.id, %url, "avatar updated");
        Ok(url)
    }

    fn current_user(&self) -> Result<User, ProfileError> {
        self.store
            .read()
            .user()
            .cloned()
            .ok_or(ProfileError::NotAuthenticated)
    }

    /// Mirrors an accepted change into the session snapshot.
    fn apply_locally(
        &self,
        user_id: &UserId,
        edit: impl FnOnce(&mut User),
    ) -> Result<(), ProfileError> {
        self.store.update_user(user_id, edit);
        if self.store.read().user_id() != Some(user_id) {
            return Err(ProfileError::SessionChanged);
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use sessiongate_types::AuthNotification;
    use tokio::sync::mpsc;

    use super::*;

    // -- Mocks ------------------------------------------------------------

    struct StubAuth {
        accept: bool,
    }

    impl AuthProvider for StubAuth {
        fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthNotification> {
            mpsc::unbounded_channel().1
        }

        async fn change_password(
            &self,
            _current: &str,
            _new: &str,
        ) -> Result<(), PasswordChangeError> {
            if self.accept {
                Ok(())
            } else {
                Err(PasswordChangeError::Rejected(
                    "current password is incorrect".into(),
                ))
            }
        }
    }

    #[derive(Default)]
    struct RecordingApi {
        updates: Mutex<Vec<(UserId, ProfileUpdate)>>,
        fail: bool,
    }

    impl ProfileApi for RecordingApi {
        async fn update_profile(
            &self,
            user_id: &UserId,
            update: &ProfileUpdate,
        ) -> Result<(), ProfileError> {
            if self.fail {
                return Err(ProfileError::Update("503".into()));
            }
            self.updates
                .lock()
                .unwrap()
                .push((user_id.clone(), update.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingMedia {
        paths: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MediaStore for RecordingMedia {
        async fn upload(
            &self,
            path: &str,
            _upload: &MediaUpload,
        ) -> Result<String, ProfileError> {
            if self.fail {
                return Err(ProfileError::Upload("bucket full".into()));
            }
            self.paths.lock().unwrap().push(path.to_string());
            Ok(format!("https://cdn.example/{path}"))
        }
    }

    struct Fixture {
        store: SessionStore,
        api: Arc<RecordingApi>,
        media: Arc<RecordingMedia>,
        service: ProfileService<StubAuth, RecordingApi, RecordingMedia>,
    }

    fn fixture_with(accept: bool, api: RecordingApi, media: RecordingMedia) -> Fixture {
        let store = SessionStore::new();
        store
            .apply(AuthNotification::signed_in(User::new("u-1", "alice")))
            .unwrap();
        let api = Arc::new(api);
        let media = Arc::new(media);
        let service = ProfileService::new(
            store.clone(),
            Arc::new(StubAuth { accept }),
            Arc::clone(&api),
            Arc::clone(&media),
        );
        Fixture {
            store,
            api,
            media,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(true, RecordingApi::default(), RecordingMedia::default())
    }

    fn jpeg() -> MediaUpload {
        MediaUpload {
            file_name: "me.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    // =====================================================================
    // change_password()
    // =====================================================================

    #[tokio::test]
    async fn test_change_password_accepted() {
        let f = fixture();
        assert_eq!(f.service.change_password("old", "new-secret").await, Ok(()));
    }

    #[tokio::test]
    async fn test_change_password_empty_field_is_rejected_locally() {
        let f = fixture();
        assert_eq!(
            f.service.change_password("", "new").await,
            Err(PasswordChangeError::MissingField)
        );
        assert_eq!(
            f.service.change_password("old", "").await,
            Err(PasswordChangeError::MissingField)
        );
    }

    #[tokio::test]
    async fn test_change_password_provider_reason_is_surfaced() {
        let f = fixture_with(false, RecordingApi::default(), RecordingMedia::default());

        let err = f.service.change_password("old", "new").await.unwrap_err();

        assert_eq!(err.reason(), "current password is incorrect");
    }

    #[tokio::test]
    async fn test_change_password_signed_out_is_not_authenticated() {
        let f = fixture();
        f.store.apply(AuthNotification::signed_out()).unwrap();

        assert_eq!(
            f.service.change_password("old", "new").await,
            Err(PasswordChangeError::NotAuthenticated)
        );
    }

    // =====================================================================
    // rename()
    // =====================================================================

    #[tokio::test]
    async fn test_rename_updates_api_and_session() {
        let f = fixture();

        let user = f.service.rename("  alice2  ").await.unwrap();

        assert_eq!(user.display_name, "alice2");
        assert_eq!(f.store.read().user().unwrap().display_name, "alice2");
        let updates = f.api.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.username.as_deref(), Some("alice2"));
        assert_eq!(updates[0].1.full_name.as_deref(), Some("alice2"));
        assert_eq!(updates[0].1.profile_pic, None);
    }

    #[tokio::test]
    async fn test_rename_blank_is_rejected_before_api_call() {
        let f = fixture();

        assert_eq!(f.service.rename("   ").await, Err(ProfileError::EmptyUsername));
        assert!(f.api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_api_failure_leaves_session_untouched() {
        let f = fixture_with(
            true,
            RecordingApi {
                fail: true,
                ..Default::default()
            },
            RecordingMedia::default(),
        );

        let result = f.service.rename("bob").await;

        assert_eq!(result, Err(ProfileError::Update("503".into())));
        assert_eq!(f.store.read().user().unwrap().display_name, "alice");
    }

    /// Profile API that signs a different user in while the request is
    /// in flight.
    struct SwitchingApi {
        store: SessionStore,
    }

    impl ProfileApi for SwitchingApi {
        async fn update_profile(
            &self,
            _user_id: &UserId,
            _update: &ProfileUpdate,
        ) -> Result<(), ProfileError> {
            self.store
                .apply(AuthNotification::signed_in(User::new("u-2", "bob")))
                .unwrap();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_rename_user_switched_mid_request_leaves_new_user_alone() {
        let store = SessionStore::new();
        store
            .apply(AuthNotification::signed_in(User::new("u-1", "alice")))
            .unwrap();
        let service = ProfileService::new(
            store.clone(),
            Arc::new(StubAuth { accept: true }),
            Arc::new(SwitchingApi {
                store: store.clone(),
            }),
            Arc::new(RecordingMedia::default()),
        );

        let result = service.rename("alice2").await;

        assert_eq!(result, Err(ProfileError::SessionChanged));
        let user = store.read().user().cloned().unwrap();
        assert_eq!(user.id, UserId::new("u-2"));
        assert_eq!(user.display_name, "bob");
    }

    // =====================================================================
    // set_avatar()
    // =====================================================================

    #[tokio::test]
    async fn test_set_avatar_uploads_then_updates_profile() {
        let f = fixture();

        let url = f.service.set_avatar(jpeg()).await.unwrap();

        assert_eq!(
            *f.media.paths.lock().unwrap(),
            vec!["u-1/images/profile_pic_aliceme.jpg".to_string()]
        );
        assert_eq!(url, "https://cdn.example/u-1/images/profile_pic_aliceme.jpg");
        assert_eq!(
            f.api.updates.lock().unwrap()[0].1.profile_pic.as_deref(),
            Some(url.as_str())
        );
        assert_eq!(f.store.read().user().unwrap().avatar.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn test_set_avatar_upload_failure_skips_profile_update() {
        let f = fixture_with(
            true,
            RecordingApi::default(),
            RecordingMedia {
                fail: true,
                ..Default::default()
            },
        );

        let result = f.service.set_avatar(jpeg()).await;

        assert!(matches!(result, Err(ProfileError::Upload(_))));
        assert!(f.api.updates.lock().unwrap().is_empty());
        assert_eq!(f.store.read().user().unwrap().avatar, None);
    }

    #[tokio::test]
    async fn test_set_avatar_empty_bytes_rejected() {
        let f = fixture();
        let upload = MediaUpload {
            bytes: Vec::new(),
            ..jpeg()
        };

        assert_eq!(f.service.set_avatar(upload).await, Err(ProfileError::EmptyUpload));
    }

    #[tokio::test]
    async fn test_set_avatar_signed_out_is_not_authenticated() {
        let f = fixture();
        f.store.apply(AuthNotification::signed_out()).unwrap();

        assert_eq!(
            f.service.set_avatar(jpeg()).await,
            Err(ProfileError::NotAuthenticated)
        );
    }

    #[test]
    fn test_profile_update_json_omits_unset_fields() {
        let update = ProfileUpdate {
            profile_pic: Some("https://cdn.example/x.png".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "profile_pic": "https://cdn.example/x.png" }));
    }
}
