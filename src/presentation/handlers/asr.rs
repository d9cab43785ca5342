use std::io;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, TryStreamExt};
use serde::Serialize;

use crate::application::ports::{InferenceError, StagingStoreError};
use crate::application::services::TranscriptionServiceError;
use crate::presentation::state::AppState;

const UPLOAD_FIELD: &str = "file";
const FALLBACK_FILENAME: &str = "upload";

#[derive(Serialize)]
pub struct AsrResponse {
    pub transcription: String,
    pub duration: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn status_for(error: &TranscriptionServiceError) -> StatusCode {
    match error {
        TranscriptionServiceError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TranscriptionServiceError::Inference(InferenceError::Timeout(_)) => {
            StatusCode::GATEWAY_TIMEOUT
        }
        TranscriptionServiceError::Inference(_) => StatusCode::BAD_GATEWAY,
        TranscriptionServiceError::Staging(StagingStoreError::TooLarge { .. }) => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        TranscriptionServiceError::Staging(StagingStoreError::Io(_)) => StatusCode::BAD_REQUEST,
        TranscriptionServiceError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn asr_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "ASR request is not multipart");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                tracing::warn!("ASR request with no file");
                return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(e.status(), format!("Failed to read multipart: {}", e));
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();

        tracing::debug!(filename = %filename, "Streaming upload into staging");

        let stream = field.map_err(io::Error::other).boxed();

        return match state
            .transcription_service
            .transcribe_stream(&filename, stream, None)
            .await
        {
            Ok(result) => (
                StatusCode::OK,
                Json(AsrResponse {
                    transcription: result.transcript().to_string(),
                    duration: result.formatted_duration(),
                }),
            )
                .into_response(),
            Err(e) => {
                let status = status_for(&e);
                tracing::warn!(error = %e, status = %status, filename = %filename, "ASR request failed");
                error_response(status, e.to_string())
            }
        };
    }
}
