use crate::error::AppError;
use crate::store::{Repository, Store};
use actix_web::{web, HttpResponse};
use certverify_common::filter::filter_by_term;
use certverify_common::requests::DatasetQuery;

pub(crate) async fn process(
    store: web::Data<Store>,
    query: web::Query<DatasetQuery>,
) -> Result<HttpResponse, AppError> {
    let store = store.get_ref().clone();
    let datasets = web::block(move || store.datasets().list()).await??;
    let term = query.into_inner().search.unwrap_or_default();
    Ok(HttpResponse::Ok().json(filter_by_term(datasets, &term)))
}
