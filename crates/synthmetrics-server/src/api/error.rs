//! HTTP mapping for [`SynthError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use synthmetrics_core::error::{ClientCode, SynthError};

/// Handler error. Body shape: `{"err": <message>, "code": <CLIENT_CODE>}`.
#[derive(Debug)]
pub struct ApiError(pub SynthError);

impl From<SynthError> for ApiError {
    fn from(e: SynthError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest
            | ClientCode::UnknownMetricKind
            | ClientCode::UnsupportedVersion => {
                StatusCode::BAD_REQUEST
            }
            ClientCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::Store | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.client_code();
        if code.is_client_error() {
            tracing::debug!(error = %self.0, "request rejected");
        } else {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "err": self.0.to_string(),
            "code": code.as_str(),
        }));
        (status, body).into_response()
    }
}
