use thiserror::Error;

/// Application error, one variant per recovery class.
///
/// Operations return `Result<T, AppError>` and the presentation layer
/// decides how to render each variant; the menu loop never terminates on
/// anything except a startup configuration or connection failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_recovery_class() {
        let err = AppError::BadRequest(anyhow::anyhow!("quantity must be positive"));
        assert_eq!(err.to_string(), "Bad request: quantity must be positive");
    }
}
