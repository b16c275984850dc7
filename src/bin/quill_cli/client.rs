use std::num::NonZeroU32;
use std::sync::Arc;

use quill::application::api::{ApiError, BlogApi};
use quill::application::auth::AuthService;
use quill::application::error::AppError;
use quill::application::listing::{Outcome, ScreenStatus};
use quill::application::session::SessionStore;
use quill::config::{LoadError, Settings};
use quill::domain::validation::FieldErrors;
use quill::infra::error::InfraError;
use quill::infra::http::{ApiClient, HttpApi};
use quill::infra::session_file;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] LoadError),
    #[error("{0}")]
    Infra(#[from] InfraError),
    #[error("{0}")]
    Api(#[from] ApiError),
    /// The screen's own static error string.
    #[error("{0}")]
    Screen(&'static str),
    #[error("{summary}: {0}", summary = .0.presentation_message())]
    App(AppError),
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    #[error("Please log in to continue")]
    LoginRequired,
    #[error("Staff access required")]
    Forbidden,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<AppError> for CliError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(errors) => Self::Validation(errors),
            AppError::LoginRequired => Self::LoginRequired,
            other => Self::App(other),
        }
    }
}

impl From<FieldErrors> for CliError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Turn a finished screen action into the command's result.
pub fn settle(outcome: Outcome, status: &ScreenStatus) -> Result<(), CliError> {
    match outcome {
        Outcome::Applied | Outcome::Idle | Outcome::Pending | Outcome::Cancelled => Ok(()),
        Outcome::Failed => Err(CliError::Screen(status.error.unwrap_or("Request failed"))),
        Outcome::LoginRequired => Err(CliError::LoginRequired),
        Outcome::Forbidden => Err(CliError::Forbidden),
        Outcome::Rejected => Err(CliError::InvalidInput("form rejected".into())),
    }
}

pub struct Ctx {
    pub settings: Settings,
    pub session: SessionStore,
    pub api: Arc<HttpApi>,
    pub auth: AuthService,
}

impl Ctx {
    /// Wire the HTTP adapter and restore any session saved by an earlier run.
    pub async fn new(settings: Settings) -> Result<Self, CliError> {
        let session = SessionStore::new();
        let client = ApiClient::new(&settings.api, session.clone())?;
        let api = Arc::new(HttpApi::new(client));
        let auth = AuthService::new(api.clone(), session.clone());
        if let Some(saved) = session_file::load(&settings.session.file).await? {
            auth.resume(saved);
        }
        Ok(Self {
            settings,
            session,
            api,
            auth,
        })
    }

    pub fn blog(&self) -> Arc<dyn BlogApi> {
        self.api.clone()
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.settings.api.page_size
    }

    /// Mirror the in-memory session to disk, removing the file when signed out.
    pub async fn persist_session(&self) -> Result<(), CliError> {
        let path = &self.settings.session.file;
        match self.session.current() {
            Some(session) => session_file::save(path, &session).await?,
            None => session_file::remove(path).await?,
        }
        Ok(())
    }
}
