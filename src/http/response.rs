//! Conversion of relay outcomes into HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::relay::RelayResponse;

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
