use std::fmt;

use post_api::ApiError;
use post_composition::{CompositionError, PickerError};

/// Central error type of the post editor
#[derive(Debug)]
pub enum AppError {
    /// Settings file could not be read or parsed
    Config(String),
    /// Backend call failed
    Api(ApiError),
    /// Rejected edit or incomplete post
    Composition(CompositionError),
    /// Image picking failed
    Picker(PickerError),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Validation error (e.g. invalid inputs)
    Validation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Api(e) => write!(f, "API error: {}", e),
            AppError::Composition(e) => write!(f, "Composition error: {}", e),
            AppError::Picker(e) => write!(f, "Picker error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<CompositionError> for AppError {
    fn from(e: CompositionError) -> Self {
        AppError::Composition(e)
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        AppError::Picker(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

/// User-friendly error messages for the UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(msg) => format!("The settings file is invalid: {}", msg),
            AppError::Api(_) => "Creating the post failed. Please try again.".to_string(),
            AppError::Composition(e) => e.user_message(),
            AppError::Picker(PickerError::PermissionDenied(_)) => {
                "Permission required to access your photos.".to_string()
            }
            AppError::Picker(e) => format!("Could not pick images: {}", e),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_composition::NotReadyReason;

    #[test]
    fn test_composition_errors_keep_their_notice() {
        let err: AppError = CompositionError::NotReady(NotReadyReason::NoCategory).into();
        assert_eq!(err.user_message(), "Choose a category.");
    }

    #[test]
    fn test_api_errors_hide_details() {
        let err: AppError = ApiError::ServerError("status 500".to_string()).into();
        assert!(!err.user_message().contains("500"));
        assert!(err.to_string().contains("500"));
    }
}
