use crate::error::AppError;
use crate::store::{Repository, Store};
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    dataset_id: web::Path<i64>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let id = dataset_id.into_inner();
    let store = store.get_ref().clone();
    match web::block(move || store.datasets().get(id)).await?? {
        Some(dataset) => Ok(HttpResponse::Ok().json(dataset)),
        None => Err(AppError::NotFound(format!("Dataset {} not found", id))),
    }
}
