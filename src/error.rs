use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Client input that cannot be applied to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: name, startDate, endDate")]
    MissingFields,
    #[error("End date cannot be before start date")]
    InvalidRange,
    #[error("Events must be an array")]
    EventsNotArray,
    #[error("Cannot add more than {allowed} days to this trip (trip duration: {allowed} days)")]
    TooManyDays { allowed: i64 },
    #[error("Invalid {field}: {value:?} is not an ISO-8601 date")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} cannot be null")]
    NullField { field: &'static str },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing-fields",
            ValidationError::InvalidRange => "invalid-range",
            ValidationError::EventsNotArray => "events-not-array",
            ValidationError::TooManyDays { .. } => "too-many-days",
            ValidationError::InvalidDate { .. } => "invalid-date",
            ValidationError::NullField { .. } => "null-field",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Trip not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Trip not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Trip(TripError::Validation(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Trip(TripError::NotFound) | AppError::NotFound => StatusCode::NOT_FOUND,
        };

        if status.is_server_error() {
            error!("request failed: {self:?}");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_days_message_interpolates_allowed_duration() {
        let err = ValidationError::TooManyDays { allowed: 4 };
        assert_eq!(
            err.to_string(),
            "Cannot add more than 4 days to this trip (trip duration: 4 days)"
        );
        assert_eq!(err.code(), "too-many-days");

        let null = ValidationError::NullField { field: "name" };
        assert_eq!(null.to_string(), "name cannot be null");
        assert_eq!(null.code(), "null-field");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let bad = AppError::from(TripError::from(ValidationError::MissingFields)).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let missing = AppError::from(TripError::NotFound).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let config = AppError::Config("nope".into()).into_response();
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
