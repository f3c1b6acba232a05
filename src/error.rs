use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Reason a local login was refused. The distinction between `NotFound`
/// and `BadPassword` is internal only; both surface as the same message
/// so the API cannot be used to enumerate accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    NotFound,
    Blocked,
    Unverified,
    BadPassword,
}

impl AuthFailure {
    pub fn status(self) -> StatusCode {
        match self {
            AuthFailure::NotFound | AuthFailure::BadPassword => StatusCode::BAD_REQUEST,
            AuthFailure::Blocked | AuthFailure::Unverified => StatusCode::FORBIDDEN,
        }
    }

    pub fn public_message(self) -> &'static str {
        match self {
            AuthFailure::NotFound | AuthFailure::BadPassword => "Credenciales inválidas",
            AuthFailure::Blocked => "Cuenta bloqueada",
            AuthFailure::Unverified => "Cuenta no verificada",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("authentication failed: {0:?}")]
    Auth(AuthFailure),

    #[error("invalid token: {0}")]
    Token(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error body shared by every endpoint: `{"success": false, "message": ...}`.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // the original surface reports duplicates as 400, not 409
            AppError::Validation(msg) | AppError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Auth(failure) => {
                (failure.status(), failure.public_message().to_string())
            }
            AppError::Token(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error en el servidor.".to_string(),
                )
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error en el servidor.".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// True when a sqlx error is a Postgres unique-constraint violation.
/// Duplicate registration is detected from this, not from a pre-check.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_bad_password_share_public_message() {
        assert_eq!(
            AuthFailure::NotFound.public_message(),
            AuthFailure::BadPassword.public_message()
        );
    }

    #[test]
    fn blocked_and_unverified_are_forbidden() {
        assert_eq!(AuthFailure::Blocked.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthFailure::Unverified.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthFailure::BadPassword.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            success: false,
            message: "Cuenta bloqueada".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Cuenta bloqueada"}"#);
    }
}
