//! Mapping of gateway failures onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polidoc_graph::GraphError;
use serde::Serialize;

/// Error returned by every API handler.
#[derive(Debug)]
pub struct ApiError(GraphError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GraphError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GraphError::NotFound(_) => StatusCode::NOT_FOUND,
            GraphError::DependencyFailure(_) | GraphError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(GraphError::invalid_input(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind(),
            detail: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GraphError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (GraphError::not_found("x"), StatusCode::NOT_FOUND),
            (GraphError::dependency("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (GraphError::Unexpected("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
