use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hotelbook_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::BookingNotFound | BookingError::RoomNotFound => {
                AppError::NotFoundError(err.to_string())
            }
            BookingError::Forbidden(reason) => AppError::AuthorizationError(reason.to_string()),
            BookingError::Repository(inner) => AppError::InternalServerError(inner.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelbook_core::ForbiddenReason;

    #[test]
    fn test_booking_errors_map_to_statuses() {
        let cases = [
            (BookingError::BookingNotFound, StatusCode::NOT_FOUND),
            (BookingError::RoomNotFound, StatusCode::NOT_FOUND),
            (BookingError::Forbidden(ForbiddenReason::NoVacancy), StatusCode::FORBIDDEN),
            (BookingError::Forbidden(ForbiddenReason::RemoteTicket), StatusCode::FORBIDDEN),
            (BookingError::Repository("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
