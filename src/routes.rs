use std::collections::HashMap;
use std::path::PathBuf;

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use anyhow::anyhow;
use futures_util::TryStreamExt;
use log::info;

use crate::error::ServiceError;
use crate::models::{HealthResponse, PredictResponse};
use crate::pipeline;

/// Shared handler state: where the trained bundle lives on disk. The bundle
/// itself is never cached here; every predict re-reads it.
#[derive(Clone)]
pub struct AppState {
    pub model_path: PathBuf,
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

#[post("/train")]
pub async fn train(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let csv_bytes = read_dataset_part(payload).await?;
    let model_path = state.model_path.clone();

    // Fitting is CPU-bound; keep it off the worker threads.
    let report = web::block(move || pipeline::train_from_csv(&csv_bytes, &model_path))
        .await
        .map_err(|e| ServiceError::Internal(anyhow!("blocking task failed: {e}")))??;

    Ok(HttpResponse::Ok().json(report))
}

#[post("/predict")]
pub async fn predict(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let fields = parse_fields(&req, &body);
    let model_path = state.model_path.clone();

    let label = web::block(move || pipeline::predict_record(&fields, &model_path))
        .await
        .map_err(|e| ServiceError::Internal(anyhow!("blocking task failed: {e}")))??;

    info!("predicted label {label:?}");
    Ok(HttpResponse::Ok().json(PredictResponse { prediction: label }))
}

/// Pulls the bytes of the multipart field named `dataset` out of the upload.
async fn read_dataset_part(mut payload: Multipart) -> Result<Vec<u8>, ServiceError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ServiceError::CsvParse(e.to_string()))?
    {
        if field.content_disposition().get_name() != Some("dataset") {
            continue;
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ServiceError::CsvParse(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }
    Err(ServiceError::MissingDatasetPart)
}

/// Reads the predict payload as either a JSON object or urlencoded form
/// fields, whichever the content type says. Scalar JSON values count as
/// categorical strings; nulls and nested values count as absent, and an
/// unreadable body degrades to an empty record so that field validation
/// reports what is missing.
fn parse_fields(req: &HttpRequest, body: &[u8]) -> HashMap<String, String> {
    if req.content_type().starts_with("application/json") {
        let parsed: HashMap<String, serde_json::Value> =
            serde_json::from_slice(body).unwrap_or_default();
        parsed
            .into_iter()
            .filter_map(|(k, v)| {
                let s = match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((k, s))
            })
            .collect()
    } else {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }
}
