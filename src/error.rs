use axum::{
    http::{
        header::{CACHE_CONTROL, WWW_AUTHENTICATE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized(err) => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, "Bearer"), (CACHE_CONTROL, "no-store")],
                err.to_string(),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = AppError::from(AuthError::MissingPrincipal).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
        assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_unauthorized_body_is_auth_message() {
        let error = AppError::from(AuthError::TenantMismatch {
            expected: "t1".to_string(),
            actual: Some("t2".to_string()),
        });
        assert_eq!(
            error.to_string(),
            "Unauthorized - Only users from tenant t1 are allowed to access this application"
        );
    }
}
