use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse},
    Json,
};
use mib_core::{build_analysis_prompt, AnalysisRequest, AnalysisResult, Error, ValidatedImage};
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::envelope::{AnalysisEnvelope, HealthReport, ServiceInfo};
use crate::error::ApiError;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../templates/index.html");

pub const HEALTH_PROBE_PROMPT: &str = "Test connection - please respond with 'API Working'";

const FALLBACK_FILENAME: &str = "unnamed";

pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

pub async fn upload_and_query(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalysisEnvelope>, ApiError> {
    let span = tracing::info_span!("upload_and_query", request_id = %Uuid::new_v4());
    async move {
        let request = read_upload(multipart).await?;
        let result = analyze(&state, request).await?;
        Ok::<_, ApiError>(Json(AnalysisEnvelope::from(result)))
    }
    .instrument(span)
    .await
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let model = state.model.info();
    let api_configured = state.settings.api_configured;

    let probe = tokio::time::timeout(
        state.settings.analysis_timeout,
        state.model.probe(HEALTH_PROBE_PROMPT),
    )
    .await;

    let report = match probe {
        Ok(Ok(text)) => HealthReport::healthy(&model, api_configured, &text),
        Ok(Err(e)) => {
            error!("Health probe against {} failed: {}", model.provider, e);
            HealthReport::failed(api_configured, e.to_string())
        }
        Err(_) => {
            error!("Health probe against {} timed out", model.provider);
            HealthReport::failed(
                api_configured,
                format!("Health probe timed out after {:?}", state.settings.analysis_timeout),
            )
        }
    };
    Json(report)
}

pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(&state.model.info()))
}

async fn read_upload(mut multipart: Multipart) -> Result<AnalysisRequest, ApiError> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut query: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("image") => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(FALLBACK_FILENAME)
                    .to_string();
                let bytes = field.bytes().await?;
                image = Some((filename, bytes.to_vec()));
            }
            Some("query") => {
                query = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (filename, image_bytes) =
        image.ok_or_else(|| Error::MissingField("image".to_string()))?;
    let query = query.ok_or_else(|| Error::MissingField("query".to_string()))?;

    Ok(AnalysisRequest {
        image_bytes,
        filename,
        query,
    })
}

async fn analyze(state: &AppState, mut request: AnalysisRequest) -> Result<AnalysisResult, ApiError> {
    let bytes = std::mem::take(&mut request.image_bytes);
    let decoded = tokio::task::spawn_blocking(move || ValidatedImage::decode(bytes))
        .await
        .map_err(ApiError::unexpected)?;

    let image = match decoded {
        Ok(image) => {
            let (width, height) = image.dimensions();
            info!(
                "Image validated successfully: {} ({:?}, {}x{})",
                request.filename,
                image.format(),
                width,
                height
            );
            image
        }
        Err(e) => {
            error!("Invalid upload {}: {}", request.filename, e);
            return Err(e.into());
        }
    };

    let prompt = build_analysis_prompt(&request.query);
    let model = state.model.info();

    info!("Sending request to {}...", model.provider);
    let generated = tokio::time::timeout(
        state.settings.analysis_timeout,
        state.model.generate(&prompt, &image),
    )
    .await;

    let outcome = match generated {
        Ok(Ok(text)) if !text.is_empty() => Ok(text),
        Ok(Ok(_)) => Err(format!("Empty response from {}", model.provider)),
        Ok(Err(e)) => {
            let message = e.to_string();
            if message.is_empty() {
                Err(format!("Unknown error from {}", model.provider))
            } else {
                Err(message)
            }
        }
        Err(_) => Err(format!(
            "Analysis timed out after {:?}",
            state.settings.analysis_timeout
        )),
    };

    let result = match outcome {
        Ok(content) => {
            info!("{} medical analysis completed successfully", model.provider);
            AnalysisResult::completed(model, &request, content)
        }
        Err(message) => {
            error!("{} API error: {}", model.provider, message);
            AnalysisResult::failed(model, &request, message)
        }
    };
    Ok(result)
}
