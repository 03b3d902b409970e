// Error types shared across the crate

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote API error: {0}")]
    Remote(String),
}

impl AppError {
    /// The single message shown to the user when a search ends in failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Please enter a paper title.".to_string(),
            AppError::NotFound(_) => {
                "No search results. Try again with different keywords.".to_string()
            }
            AppError::Remote(detail) => format!(
                "Something went wrong while talking to Crossref ({}). Please try again.",
                detail
            ),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
