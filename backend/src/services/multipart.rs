use crate::error::AppError;
use actix_multipart::Field;
use futures_util::StreamExt;

/// Name of the form part, from its `Content-Disposition`.
pub(crate) fn field_name(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_name().map(|n| n.to_string()))
}

pub(crate) fn file_name(field: &Field) -> String {
    field
        .content_disposition()
        .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
        .unwrap_or_default()
}

/// Reads the whole part into memory, failing once more than `limit` bytes
/// have arrived.
pub(crate) async fn read_bounded(field: &mut Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Upload part exceeds the limit of {} bytes",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Consumes a part the handler has no use for.
pub(crate) async fn skip(field: &mut Field) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
