use crate::error::AppError;
use crate::store::{Repository, Store};
use actix_web::{web, HttpResponse};
use log::info;

pub(crate) async fn process(
    dataset_id: web::Path<i64>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let id = dataset_id.into_inner();
    let store = store.get_ref().clone();
    if web::block(move || store.datasets().delete(id)).await?? {
        info!("Deleted dataset {}", id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("Dataset {} not found", id)))
    }
}
