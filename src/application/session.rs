//! Process-wide authenticated session.
//!
//! Every screen and the HTTP adapter read it; only [`AuthService`] writes it.
//!
//! [`AuthService`]: crate::application::auth::AuthService

use std::sync::{Arc, PoisonError, RwLock};

use quill_api_types::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn is_staff(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|session| session.user.is_staff)
    }

    pub(crate) fn replace(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub(crate) fn update_user(&self, user: User) {
        if let Some(session) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.user = user;
        }
    }

    /// Fold a profile answer into the signed-in user and return the result.
    /// The profile endpoint may leave out `id` and `is_staff`, so a zero id
    /// keeps the known one and staff access is never dropped by it.
    pub(crate) fn merge_profile(&self, profile: User) -> Option<User> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let user = &mut guard.as_mut()?.user;
        if profile.id != 0 {
            user.id = profile.id;
        }
        user.email = profile.email;
        user.username = profile.username.or(user.username.take());
        user.first_name = profile.first_name.or(user.first_name.take());
        user.last_name = profile.last_name.or(user.last_name.take());
        user.is_staff |= profile.is_staff;
        Some(user.clone())
    }

    pub(crate) fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
