//! Certificate intake for a verification session.
//!
//! The `file` part is type-checked before any byte is stored, then streamed
//! into a temporary file in the upload directory while its size and MD5 are
//! tracked. Crossing the 2 MiB limit aborts the upload and drops the
//! temporary file. Only a fully accepted file is renamed to
//! `{session}-{md5}.{ext}` and handed to the session; the copy it replaces is
//! deleted.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::intake::{
    check_certificate_size, check_certificate_type, discard_stored_copy, resolve_content_type,
    storage_key, IntakeError,
};
use crate::services::multipart::{field_name, file_name, skip};
use crate::services::verifications::sessions::session_not_found;
use crate::sessions::SessionsState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use certverify_common::model::session::{SelectedFile, SessionError};
use futures_util::StreamExt;
use log::{info, warn};
use md5::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub(crate) async fn process(
    session_id: web::Path<String>,
    payload: Multipart,
    sessions: web::Data<SessionsState>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let session_id = session_id.into_inner();
    match sessions.get(&session_id).await {
        None => return Err(session_not_found(&session_id)),
        Some(session) if session.loading => return Err(SessionError::Busy.into()),
        Some(_) => {}
    }

    let file = receive_certificate(payload, &session_id, &config.upload_dir)
        .await
        .inspect_err(|e| warn!("Certificate upload rejected for session {}: {}", session_id, e))?;
    info!(
        "Accepted '{}' ({} bytes, {}) for session {}",
        file.file_name, file.size, file.content_type, session_id
    );

    let key = file.storage_key.clone();
    let selected = sessions
        .update(&session_id, |s| match s.select_file(file.clone()) {
            Ok(replaced) => Ok((s.clone(), replaced)),
            Err(e) => Err((e, s.holds(&key))),
        })
        .await;
    match selected {
        Some(Ok((session, replaced))) => {
            if let Some(old) = replaced {
                discard_stored_copy(&config.upload_dir, &old);
            }
            Ok(HttpResponse::Ok().json(session))
        }
        Some(Err((e, in_use))) => {
            // A running job may be reading the same copy.
            if !in_use {
                discard_stored_copy(&config.upload_dir, &file);
            }
            Err(e.into())
        }
        None => {
            discard_stored_copy(&config.upload_dir, &file);
            Err(session_not_found(&session_id))
        }
    }
}

async fn receive_certificate(
    mut payload: Multipart,
    session_id: &str,
    upload_dir: &Path,
) -> Result<SelectedFile, AppError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        if field_name(&field).as_deref() != Some("file") {
            skip(&mut field).await?;
            continue;
        }

        let filename = file_name(&field);
        let declared = field.content_type().map(|mime| mime.essence_str().to_string());
        let content_type = resolve_content_type(declared.as_deref(), &filename);
        check_certificate_type(&content_type)?;

        fs::create_dir_all(upload_dir)?;
        let mut staged = NamedTempFile::new_in(upload_dir)?;
        let mut hasher = Context::new();
        let mut size: u64 = 0;
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            size += chunk.len() as u64;
            check_certificate_size(size)?;
            hasher.consume(&chunk);
            staged.write_all(&chunk)?;
        }
        staged.flush()?;

        let md5 = format!("{:x}", hasher.finalize());
        let key = storage_key(session_id, &md5, &content_type);
        staged
            .persist(upload_dir.join(&key))
            .map_err(|e| AppError::Io(e.error))?;

        return Ok(SelectedFile {
            file_name: filename,
            content_type,
            size,
            md5,
            storage_key: key,
        });
    }
    Err(IntakeError::MissingFile.into())
}
