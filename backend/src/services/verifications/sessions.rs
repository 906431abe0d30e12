use crate::config::AppConfig;
use crate::error::AppError;
use crate::intake::discard_stored_copy;
use crate::sessions::SessionsState;
use actix_web::{web, HttpResponse};
use certverify_common::requests::CreateSessionRequest;
use log::info;

pub(crate) fn session_not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("Session {} not found", session_id))
}

pub(crate) async fn create(
    sessions: web::Data<SessionsState>,
    req: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let verified_by = req.into_inner().verified_by;
    if verified_by.trim().is_empty() {
        return Err(AppError::BadRequest("verified_by must not be empty".into()));
    }
    let session = sessions.create(&verified_by).await;
    info!("Opened verification session {} for {}", session.id, session.verified_by);
    Ok(HttpResponse::Created().json(session))
}

pub(crate) async fn get(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, AppError> {
    let session_id = session_id.into_inner();
    match sessions.get(&session_id).await {
        Some(session) => Ok(HttpResponse::Ok().json(session)),
        None => Err(session_not_found(&session_id)),
    }
}

pub(crate) async fn reset(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let session_id = session_id.into_inner();
    let (session, released) = sessions
        .update(&session_id, |s| {
            let released = s.reset();
            (s.clone(), released)
        })
        .await
        .ok_or_else(|| session_not_found(&session_id))?;
    if let Some(file) = released {
        discard_stored_copy(&config.upload_dir, &file);
    }
    Ok(HttpResponse::Ok().json(session))
}
