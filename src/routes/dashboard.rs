use axum::{
    extract::{Multipart, Path, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::DashboardReport,
    services::{
        export::{CSV_CONTENT_TYPE, EXPORT_DISPOSITION},
        file_processor,
    },
};
use tower_http::cors::{CorsLayer, Any};

const FILE_FIELD: &str = "file";
const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/dashboard", post(upload_roster))
        .route("/dashboard/export", post(export_roster))
        .route("/exports/:key", get(download_export))
        .layer(cors)
}

struct Upload {
    file_name: String,
    data: Bytes,
}

/// Takes the `file` field, or failing that the first field carrying a file name.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?
    {
        let is_file = field.name() == Some(FILE_FIELD) || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.xlsx".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        check_extension(&file_name)?;
        if data.is_empty() {
            return Err(AppError::InvalidInput(format!("File {} is empty", file_name)));
        }

        tracing::info!("Received {} ({}KB)", file_name, data.len() / 1024);
        return Ok(Upload { file_name, data });
    }

    Err(AppError::InvalidInput("No file provided".to_string()))
}

fn check_extension(file_name: &str) -> Result<(), AppError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        tracing::error!("Unsupported file type: {}", file_name);
        Err(AppError::InvalidInput(format!(
            "Unsupported file type for {}, expected one of {}",
            file_name,
            SUPPORTED_EXTENSIONS.join(", ")
        )))
    }
}

fn csv_response(data: Bytes) -> Response {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, EXPORT_DISPOSITION),
        ],
        data,
    )
        .into_response()
}

async fn upload_roster(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DashboardReport>, AppError> {
    let upload = read_upload(multipart).await?;
    let (report, _) = file_processor::process_roster_file(upload.data, &state.exports)?;

    tracing::info!(
        "Dashboard for {}: {} rows across {} sheets",
        upload.file_name,
        report.rows.len(),
        report.sheet_names.len()
    );
    Ok(Json(report))
}

async fn export_roster(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?;
    let (_, data) = file_processor::process_roster_file(upload.data, &state.exports)?;

    Ok(csv_response(data))
}

async fn download_export(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let data = state
        .exports
        .get(&key)
        .ok_or_else(|| AppError::NotFound(format!("export {} is unknown or expired", key)))?;

    Ok(csv_response(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_spreadsheet_extensions_only() {
        assert!(check_extension("LYON 2024 Répartition classes.xlsx").is_ok());
        assert!(check_extension("classes.XLSX").is_ok());
        assert!(check_extension("classes.ods").is_ok());
        assert!(check_extension("classes.csv").is_err());
        assert!(check_extension("classes").is_err());
    }

    #[test]
    fn export_uses_download_file_name() {
        assert!(EXPORT_DISPOSITION.contains(crate::services::export::EXPORT_FILE_NAME));
    }
}
