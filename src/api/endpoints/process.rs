//! Upload-and-process endpoint — one image in, six stage images out.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::pipeline::{self, PipelineError, PipelineOutput};

/// One pipeline stage rendered for the GUI.
#[derive(Debug, Serialize)]
pub struct StageImage {
    pub label: &'static str,
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub source_width: u32,
    pub source_height: u32,
    pub elapsed_ms: u64,
    pub resized: StageImage,
    pub grayscale: StageImage,
    pub denoised: StageImage,
    pub noise_removed: StageImage,
    pub enhanced: StageImage,
    pub edges: StageImage,
}

/// `POST /api/process` — run the six-stage pipeline on an uploaded image.
///
/// Expects a multipart form with a `file` field. The pipeline runs on a
/// blocking worker thread so CPU-bound work never stalls the accept loop.
pub async fn process(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
            file_bytes = Some(bytes.to_vec());
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    pipeline::validate_image_bytes(&bytes)?;

    let response = tokio::task::spawn_blocking(move || -> Result<ProcessResponse, PipelineError> {
        let started = Instant::now();
        let input = pipeline::decode_rgb(&bytes)?;
        let (source_width, source_height) = input.dimensions();
        let output = pipeline::run(&input);
        build_response(&output, source_width, source_height, started)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Pipeline task failed: {e}")))??;

    ctx.record_processed();
    tracing::info!(
        source = format!("{}x{}", response.source_width, response.source_height),
        elapsed_ms = response.elapsed_ms,
        "Image processed"
    );

    Ok(Json(response))
}

fn build_response(
    output: &PipelineOutput,
    source_width: u32,
    source_height: u32,
    started: Instant,
) -> Result<ProcessResponse, PipelineError> {
    let resized = rgb_stage("Resized Image", &output.resized)?;
    let grayscale = gray_stage("Grayscale Image", &output.grayscale)?;
    let denoised = gray_stage("Denoised Image", &output.denoised)?;
    let noise_removed = gray_stage("Noise Removed", &output.noise_removed)?;
    let enhanced = gray_stage("Enhanced Image (CLAHE)", &output.enhanced)?;
    let edges = gray_stage("Edge Detection", &output.edges)?;

    Ok(ProcessResponse {
        source_width,
        source_height,
        elapsed_ms: started.elapsed().as_millis() as u64,
        resized,
        grayscale,
        denoised,
        noise_removed,
        enhanced,
        edges,
    })
}

fn rgb_stage(label: &'static str, img: &image::RgbImage) -> Result<StageImage, PipelineError> {
    let png = pipeline::encode_rgb_png(img)?;
    Ok(StageImage {
        label,
        data_url: pipeline::to_data_url(&png),
        width: img.width(),
        height: img.height(),
    })
}

fn gray_stage(label: &'static str, img: &image::GrayImage) -> Result<StageImage, PipelineError> {
    let png = pipeline::encode_gray_png(img)?;
    Ok(StageImage {
        label,
        data_url: pipeline::to_data_url(&png),
        width: img.width(),
        height: img.height(),
    })
}
