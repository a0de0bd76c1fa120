//! Shared handling for CSV file uploads

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::AppError;

/// Form field carrying the file
pub const UPLOAD_FIELD: &str = "file";

/// An uploaded CSV file
#[derive(Debug)]
pub struct CsvUpload {
    pub file_name: String,
    pub contents: Bytes,
}

/// Whether a file name carries the `.csv` extension
pub fn is_csv_file_name(name: &str) -> bool {
    name.len() > 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".csv"))
}

/// Pull the `file` field out of a multipart form
pub async fn read_csv_upload(mut multipart: Multipart) -> Result<CsvUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::bad_request("No file selected"));
        }
        if !is_csv_file_name(&file_name) {
            return Err(AppError::bad_request(format!(
                "'{}' is not a .csv file",
                file_name
            )));
        }

        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Malformed upload: {}", e)))?;
        return Ok(CsvUpload {
            file_name,
            contents,
        });
    }

    Err(AppError::bad_request("No file selected"))
}
