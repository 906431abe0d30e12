use crate::error::AppError;
use crate::store::{Repository, Store};
use actix_web::{web, HttpResponse};
use certverify_common::filter::HistoryFilter;
use certverify_common::model::verification::VerificationRecord;
use certverify_common::requests::HistoryQuery;
use chrono::Utc;
use log::info;

pub(crate) async fn list(
    store: web::Data<Store>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let store = store.get_ref().clone();
    let records = web::block(move || store.history().list()).await??;
    let filter = HistoryFilter::from(query.into_inner());
    Ok(HttpResponse::Ok().json(filter.apply(records, Utc::now())))
}

async fn find_record(store: &Store, id: i64) -> Result<VerificationRecord, AppError> {
    let store = store.clone();
    web::block(move || store.history().get(id))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Verification {} not found", id)))
}

pub(crate) async fn get(
    record_id: web::Path<i64>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let record = find_record(&store, record_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// "Send Alert Email" for an invalid verification. There is no mail backend,
/// so an existing record is answered with `501`.
pub(crate) async fn alert(
    record_id: web::Path<i64>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let record = find_record(&store, record_id.into_inner()).await?;
    info!(
        "Alert requested for verification {} ({}, {})",
        record.id, record.certificate_id, record.status
    );
    Err(AppError::NotImplemented(
        "Alert e-mails are not available yet".into(),
    ))
}
