//! Registration, sign-in and profile flow. The only writer of the session.

use std::sync::Arc;

use quill_api_types::{MessageResponse, User};
use tracing::{info, warn};

use crate::application::api::AuthApi;
use crate::application::error::AppError;
use crate::application::forms::{LoginForm, ProfileForm, RegisterForm, VerifyForm};
use crate::application::session::{Session, SessionStore};
use crate::domain::validation::{FieldErrors, check_email};

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionStore) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Re-install a session persisted by an earlier run.
    pub fn resume(&self, session: Session) {
        self.session.replace(session);
    }

    pub async fn register(&self, form: RegisterForm) -> Result<MessageResponse, AppError> {
        let request = form.into_request()?;
        let response = self.api.register(&request).await?;
        info!(email = %request.email, "registration submitted");
        Ok(response)
    }

    pub async fn request_otp(&self, email: &str) -> Result<MessageResponse, AppError> {
        ensure_email(email)?;
        Ok(self.api.request_otp(email.trim()).await?)
    }

    pub async fn verify_otp(&self, form: VerifyForm) -> Result<MessageResponse, AppError> {
        let request = form.into_request()?;
        Ok(self.api.verify_otp(&request).await?)
    }

    /// Exchange credentials for a session. When the login answer omits the
    /// user, the profile is fetched with the fresh token.
    pub async fn login(&self, form: LoginForm) -> Result<Session, AppError> {
        let request = form.into_request()?;
        let response = self.api.login(&request).await?;

        let mut session = Session {
            access_token: response.access,
            refresh_token: response.refresh,
            user: User {
                id: 0,
                email: request.email.clone(),
                username: None,
                first_name: None,
                last_name: None,
                is_staff: false,
            },
        };
        self.session.replace(session.clone());

        let user = match response.user {
            Some(user) => user,
            None => match self.api.profile().await {
                Ok(user) => user,
                Err(err) => {
                    self.session.clear();
                    return Err(err.into());
                }
            },
        };
        self.session.update_user(user.clone());
        session.user = user;

        info!(email = %request.email, staff = session.user.is_staff, "signed in");
        Ok(session)
    }

    /// Drop the local session even when the API refuses the logout call.
    pub async fn logout(&self) -> Result<(), AppError> {
        if !self.session.is_signed_in() {
            return Ok(());
        }
        let result = self.api.logout().await;
        self.session.clear();
        if let Err(err) = result {
            warn!(error = %err, "logout call failed; local session dropped");
            return Err(err.into());
        }
        info!("signed out");
        Ok(())
    }

    pub async fn profile(&self) -> Result<User, AppError> {
        if !self.session.is_signed_in() {
            return Err(AppError::LoginRequired);
        }
        let profile = self.api.profile().await?;
        self.session
            .merge_profile(profile)
            .ok_or(AppError::LoginRequired)
    }

    pub async fn update_profile(&self, form: ProfileForm) -> Result<User, AppError> {
        if !self.session.is_signed_in() {
            return Err(AppError::LoginRequired);
        }
        let request = form.into_request()?;
        let profile = self.api.update_profile(&request).await?;
        self.session
            .merge_profile(profile)
            .ok_or(AppError::LoginRequired)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, AppError> {
        ensure_email(email)?;
        Ok(self.api.forgot_password(email.trim()).await?)
    }

    pub async fn reset_password(&self, form: VerifyForm) -> Result<MessageResponse, AppError> {
        let request = form.into_reset_request()?;
        Ok(self.api.reset_password(&request).await?)
    }
}

fn ensure_email(email: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check("email", check_email(email));
    errors.into_result()
}
