use thiserror::Error;

use crate::application::api::ApiError;
use crate::domain::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("sign-in required")]
    LoginRequired,
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl AppError {
    /// The one line a person sees for this failure.
    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Api(ApiError::Unauthorized) | AppError::LoginRequired => {
                "Please log in to continue"
            }
            AppError::Api(ApiError::NotFound) => "Resource not found",
            AppError::Api(ApiError::Transport(_)) => "Could not reach the server",
            AppError::Api(_) => "Request failed",
            AppError::Validation(_) => "Please fix the highlighted fields",
        }
    }
}
