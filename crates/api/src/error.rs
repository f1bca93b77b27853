use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::SlotError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A backend failure with the user-facing context it happened in.
    #[error("{context}: {detail}")]
    Backend {
        context: &'static str,
        detail: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Attaches a user-facing context to an internal failure.
    ///
    /// Client errors (not found, conflict, validation, ...) are kept as they are.
    pub fn in_context(self, context: &'static str) -> Self {
        match self {
            ApiError::Internal(detail) => ApiError::Backend { context, detail },
            other => other,
        }
    }
}

/// Adds a user-facing context to fallible backend calls.
pub trait ResultExt<T> {
    fn context(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_database(e, Some(context)))
    }
}

impl<T> ResultExt<T> for Result<T, ApiError> {
    fn context(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| e.in_context(context))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Backend { context, detail } => {
                tracing::error!(detail = %detail, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    context.to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Une erreur interne est survenue".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Maps a database error, naming the operation it failed in when known.
    ///
    /// Constraint violations become client errors; anything else is internal.
    fn from_database(err: sqlx::Error, context: Option<&'static str>) -> Self {
        let message = |text: &str| match context {
            Some(context) => format!("{} ({})", context, text.to_lowercase()),
            None => text.to_string(),
        };
        let internal = |detail: String| match context {
            Some(context) => ApiError::Backend { context, detail },
            None => ApiError::Internal(detail),
        };

        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound(message("Ressource introuvable")),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict(message("Ressource déjà existante")),
                Some("23503") => ApiError::NotFound(message("Ressource référencée introuvable")),
                Some("23514") => ApiError::Validation(message("Valeur refusée par la base")),
                _ => internal(format!("Database error: {}", db_err)),
            },
            _ => internal(format!("Database error: {}", err)),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from_database(err, None)
    }
}

impl From<SlotError> for ApiError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::InvalidSize(_) | SlotError::InvalidTotal(_) | SlotError::InvalidRange(_) => {
                ApiError::Validation(err.to_string())
            }
            SlotError::NoSlotAvailable(_) | SlotError::AlreadyTaken(_) => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        let message = match details.as_slice() {
            [] => errors.to_string(),
            [single] => single.message.clone(),
            _ => format!("{} erreurs de validation", details.len()),
        };

        ApiError::Validation(message)
    }
}
